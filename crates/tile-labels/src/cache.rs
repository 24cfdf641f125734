//! Recently displayed tiles kept around after they leave the view

use crate::tile::{Tile, TileId};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Read-only tile lookup used for proxy transitions
pub trait TileCache {
    /// Look a tile up without touching recency
    fn get(&self, source_id: i32, id: TileId) -> Option<&Tile>;
}

/// No cache at all
impl TileCache for () {
    fn get(&self, _source_id: i32, _id: TileId) -> Option<&Tile> {
        None
    }
}

/// Least-recently-used tile cache keyed by source and tile address
pub struct LruTileCache {
    tiles: LruCache<(i32, TileId), Tile>,
}

impl LruTileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tiles: LruCache::new(capacity),
        }
    }

    /// Insert a tile, returning the one evicted to make room (if any)
    pub fn put(&mut self, tile: Tile) -> Option<Tile> {
        let key = (tile.source_id(), tile.id());
        match self.tiles.push(key, tile) {
            // `push` hands back the old value when replacing the same key
            Some((evicted_key, evicted)) if evicted_key != key => {
                tracing::trace!(tile = %evicted_key.1, "Evicted tile from cache");
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Remove a tile so it can be displayed again
    pub fn take(&mut self, source_id: i32, id: TileId) -> Option<Tile> {
        self.tiles.pop(&(source_id, id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.tiles.cap().get()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

impl TileCache for LruTileCache {
    fn get(&self, source_id: i32, id: TileId) -> Option<&Tile> {
        self.tiles.peek(&(source_id, id))
    }
}

impl std::fmt::Debug for LruTileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruTileCache")
            .field("len", &self.tiles.len())
            .field("capacity", &self.tiles.cap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn tile(x: u32) -> Tile {
        Tile::new(TileId::new(x, 0, 3), 0, Mat4::IDENTITY)
    }

    #[test]
    fn test_get_and_take() {
        let mut cache = LruTileCache::new(4);
        assert!(cache.put(tile(1)).is_none());
        assert!(cache.get(0, TileId::new(1, 0, 3)).is_some());
        assert!(cache.get(1, TileId::new(1, 0, 3)).is_none());

        let taken = cache.take(0, TileId::new(1, 0, 3)).unwrap();
        assert_eq!(taken.id(), TileId::new(1, 0, 3));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_order() {
        let mut cache = LruTileCache::new(2);
        cache.put(tile(1));
        cache.put(tile(2));
        // Peeking does not refresh tile 1
        cache.get(0, TileId::new(1, 0, 3));
        let evicted = cache.put(tile(3)).unwrap();
        assert_eq!(evicted.id(), TileId::new(1, 0, 3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_replacing_same_tile_evicts_nothing() {
        let mut cache = LruTileCache::new(2);
        cache.put(tile(1));
        assert!(cache.put(tile(1)).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = LruTileCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_unit_cache_is_empty() {
        assert!(().get(0, TileId::new(0, 0, 0)).is_none());
    }
}
