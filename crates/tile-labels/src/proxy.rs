//! Transition skipping between tiles and their proxies on zoom change
//!
//! When the integer zoom changes, a freshly visible tile usually carries the
//! same labels its parent (zooming in) or children (zooming out) were showing.
//! Those labels are marked to appear without a fade so they do not flicker.

use crate::cache::TileCache;
use crate::label::LabelState;
use crate::resolver::LabelRef;
use crate::tile::{Style, Tile, TileId};

/// Find a tile by source and id, cached tiles first
pub(crate) fn find_proxy<'a>(
    source_id: i32,
    id: TileId,
    tiles: &'a [Tile],
    cache: &'a dyn TileCache,
) -> Option<&'a Tile> {
    cache.get(source_id, id).or_else(|| {
        tiles
            .iter()
            .find(|tile| tile.id() == id && tile.source_id() == source_id)
    })
}

/// Collect the labels of visible tiles that must skip their transition
pub(crate) fn skip_transitions(
    styles: &[Style],
    tiles: &[Tile],
    cache: &dyn TileCache,
    zooming_in: bool,
    marks: &mut Vec<LabelRef>,
) {
    #[cfg(feature = "profiling")]
    profiling::scope!("labels::skip_transitions");

    for (tile_index, tile) in tiles.iter().enumerate() {
        let id = tile.id();
        if zooming_in {
            if let Some(proxy) = id
                .parent()
                .and_then(|parent| find_proxy(tile.source_id(), parent, tiles, cache))
            {
                match_labels(styles, tile_index, tile, proxy, marks);
            }
        } else {
            for child in id.children(tile.max_source_zoom()) {
                if let Some(proxy) = find_proxy(tile.source_id(), child, tiles, cache) {
                    match_labels(styles, tile_index, tile, proxy, marks);
                }
            }
        }
    }
}

/// Mark labels of `tile` waiting for occlusion that have a visible twin in `proxy`
fn match_labels(
    styles: &[Style],
    tile_index: usize,
    tile: &Tile,
    proxy: &Tile,
    marks: &mut Vec<LabelRef>,
) {
    for style in styles.iter().filter(|style| style.kind.is_proxy_candidate()) {
        let Some(mesh_index) = tile.meshes().iter().position(|(id, _)| *id == style.id) else {
            continue;
        };
        let Some(proxy_mesh) = proxy.mesh(style.id) else {
            continue;
        };
        let mesh = &tile.meshes()[mesh_index].1;

        for (label_index, l0) in mesh.labels().iter().enumerate() {
            let group = l0.options().repeat_group;
            if !l0.can_occlude() || l0.state() != LabelState::WaitOcclusion || group == 0 {
                continue;
            }

            let radius = l0.dimension().max_element();
            let position = l0.transform().state.screen_pos;
            let twin = proxy_mesh.labels().iter().any(|l1| {
                l1.visible_state()
                    && l1.can_occlude()
                    && l1.options().repeat_group == group
                    && l1.transform().state.screen_pos.distance(position) < radius
            });

            if twin {
                marks.push(LabelRef {
                    tile: tile_index,
                    mesh: mesh_index,
                    label: label_index,
                });
            }
        }
    }
}
