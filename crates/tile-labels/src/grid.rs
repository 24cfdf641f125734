//! Uniform grid broad phase over screen space
//!
//! Extents are bucketed into the cells they cover. Every pair of overlapping
//! extents is reported exactly once: only by the cell holding the maximum of
//! the two minimum corners, which both extents are guaranteed to cover.

use crate::geometry::Aabb;
use geo::{Coord, Intersects, Rect};
use glam::Vec2;
use smallvec::SmallVec;

/// Entries per cell kept inline before spilling to the heap
const INLINE_CELL_ENTRIES: usize = 8;

type Cell = SmallVec<[u32; INLINE_CELL_ENTRIES]>;

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    bounds: Aabb,
    split: [usize; 2],
    cell_size: Vec2,
    cells: Vec<Cell>,
    extents: Vec<Aabb>,
    /// Minimum cell of each entry
    min_cells: Vec<[usize; 2]>,
    pairs: Vec<(usize, usize)>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(Vec2::ONE, 1.0)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SpatialIndex {
    /// Grid over `[0, screen_size]` with roughly square cells of `cell_size`
    pub fn new(screen_size: Vec2, cell_size: f32) -> Self {
        let mut index = Self {
            bounds: Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }),
            split: [1, 1],
            cell_size: Vec2::ONE,
            cells: vec![Cell::new()],
            extents: Vec::new(),
            min_cells: Vec::new(),
            pairs: Vec::new(),
        };
        index.resize(screen_size, cell_size);
        index
    }

    /// Rebuild the grid for a new screen size, dropping all entries
    ///
    /// The screen is split into `floor(size / cell_size)` cells per axis, at
    /// least one.
    pub fn resize(&mut self, screen_size: Vec2, cell_size: f32) {
        let size = screen_size.max(Vec2::ONE);
        let cell_size = if cell_size > 0.0 { cell_size } else { size.max_element() };
        let split = [
            ((size.x / cell_size) as usize).max(1),
            ((size.y / cell_size) as usize).max(1),
        ];

        self.bounds = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: size.x, y: size.y });
        self.cell_size = size / Vec2::new(split[0] as f32, split[1] as f32);
        if split != self.split || self.cells.len() != split[0] * split[1] {
            self.split = split;
            self.cells = vec![Cell::new(); split[0] * split[1]];
        }
        self.clear();
    }

    /// Remove all entries, keeping allocations
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.extents.clear();
        self.min_cells.clear();
        self.pairs.clear();
    }

    /// Number of cells along x and y
    #[inline]
    pub fn split(&self) -> [usize; 2] {
        self.split
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Insert an extent and return its entry index
    ///
    /// Extents reaching outside the grid are clamped to its border cells.
    pub fn insert(&mut self, extent: Aabb) -> usize {
        let index = self.extents.len();
        let min = self.cell_of(extent.min());
        let max = self.cell_of(extent.max());

        for y in min[1]..=max[1] {
            for x in min[0]..=max[0] {
                let cell_index = y * self.split[0] + x;
                for &other in &self.cells[cell_index] {
                    let other = other as usize;
                    let other_min = self.min_cells[other];
                    // Report each pair from a single shared cell
                    if [min[0].max(other_min[0]), min[1].max(other_min[1])] != [x, y] {
                        continue;
                    }
                    if self.extents[other].intersects(&extent) {
                        self.pairs.push((other, index));
                    }
                }
                self.cells[cell_index].push(index as u32);
            }
        }

        self.extents.push(extent);
        self.min_cells.push(min);
        index
    }

    /// Overlapping entry pairs `(a, b)` with `a < b`, in ascending order
    pub fn pairs(&mut self) -> &[(usize, usize)] {
        self.pairs.sort_unstable();
        &self.pairs
    }

    /// Cell coordinates containing a point, clamped to the grid
    fn cell_of(&self, point: Coord<f32>) -> [usize; 2] {
        let cell = |v: f32, origin: f32, size: f32, split: usize| {
            let i = ((v - origin) / size).floor();
            if i.is_nan() || i < 0.0 {
                0
            } else {
                (i as usize).min(split - 1)
            }
        };
        [
            cell(point.x, self.bounds.min().x, self.cell_size.x, self.split[0]),
            cell(point.y, self.bounds.min().y, self.cell_size.y, self.split[1]),
        ]
    }
}
