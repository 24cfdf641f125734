//! Labels - Per-frame label resolver and hit-test query
//!
//! This module provides the top-level API run once per rendered frame over the
//! visible tiles: collect and project labels, skip transitions across proxy
//! tiles on zoom change, resolve collisions, filter repeat groups, then advance
//! every label's fade and commit the survivors to their meshes.

use crate::cache::TileCache;
use crate::collision::{self, Yield};
use crate::debug::DebugOverlay;
use crate::fade::Transition;
use crate::geometry::{self, Obb};
use crate::grid::SpatialIndex;
use crate::label::{Label, LabelOptions, LabelState};
use crate::proxy;
use crate::repeat::RepeatGroups;
use crate::tile::{Style, Tile};
use crate::touch::TouchItem;

use glam::{Mat4, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Camera state for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// View-projection matrix, combined with each tile's model matrix
    pub view_projection: Mat4,
    /// Viewport size in screen units
    pub size: Vec2,
    /// Fractional zoom level
    pub zoom: f32,
}

impl View {
    pub fn new(view_projection: Mat4, size: Vec2, zoom: f32) -> Self {
        Self {
            view_projection,
            size,
            zoom,
        }
    }

    /// View whose world units are screen units, origin at the top-left corner
    pub fn screen(width: f32, height: f32, zoom: f32) -> Self {
        Self::new(
            geometry::screen_projection(width, height),
            Vec2::new(width, height),
            zoom,
        )
    }

    /// Fractional part of the zoom level
    #[inline]
    pub fn zoom_fraction(&self) -> f32 {
        self.zoom - self.zoom.floor()
    }

    /// Model-view-projection of a tile
    #[inline]
    pub fn tile_mvp(&self, tile: &Tile) -> Mat4 {
        self.view_projection * *tile.model_matrix()
    }
}

/// Configuration for the label resolver
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelsConfig {
    /// Target edge of a broad-phase grid cell in screen units (default 256)
    pub grid_cell_size: f32,
    /// Edge of the square searched by hit-test queries (default 50)
    pub touch_size: f32,
    /// Record debug primitives in [`Labels::draw_debug`] (default off)
    pub debug_overlay: bool,
    /// Show/hide/select transition given to new labels (linear, 0.2 s)
    pub default_transition: Transition,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: 256.0,
            touch_size: 50.0,
            debug_overlay: false,
            default_transition: Transition::default(),
        }
    }
}

impl LabelsConfig {
    /// Label options carrying the configured transitions
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            show_transition: self.default_transition,
            hide_transition: self.default_transition,
            select_transition: self.default_transition,
            ..Default::default()
        }
    }
}

/// Counters of the last [`Labels::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameStats {
    /// Labels that entered collision processing
    pub collected: usize,
    /// Candidate pairs from the broad phase
    pub pairs: usize,
    /// Labels occluded by the narrow phase
    pub occluded: usize,
    /// Labels occluded by repeat groups
    pub repeat_dropped: usize,
    /// Labels set to skip their transition by the proxy pass
    pub proxy_skips: usize,
}

/// Position of a label inside the tile list: tile, mesh slot and label index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct LabelRef {
    pub tile: usize,
    pub mesh: usize,
    pub label: usize,
}

impl LabelRef {
    /// Resolve against the tiles this reference was built from
    #[inline]
    pub fn get(self, tiles: &[Tile]) -> &Label {
        &tiles[self.tile].meshes()[self.mesh].1.labels()[self.label]
    }

    #[inline]
    pub fn get_mut(self, tiles: &mut [Tile]) -> &mut Label {
        &mut tiles[self.tile].meshes_mut()[self.mesh].1.labels_mut()[self.label]
    }

    /// Resolve against tiles that may have changed since
    pub fn try_get(self, tiles: &[Tile]) -> Option<&Label> {
        tiles
            .get(self.tile)?
            .meshes()
            .get(self.mesh)?
            .1
            .labels()
            .get(self.label)
    }
}

/// Per-frame label resolver
///
/// Holds no label state of its own: labels live in the tiles' meshes. Only the
/// working buffers of the pipeline are kept and reused across frames.
#[derive(Debug)]
pub struct Labels {
    config: LabelsConfig,
    /// Colliding labels collected this frame
    working: Vec<LabelRef>,
    index: SpatialIndex,
    repeat_groups: RepeatGroups,
    proxy_marks: Vec<LabelRef>,
    touch_items: Vec<TouchItem>,
    last_zoom: Option<f32>,
    needs_update: bool,
    stats: FrameStats,
}

impl Default for Labels {
    fn default() -> Self {
        Self::new(LabelsConfig::default())
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Labels {
    pub fn new(config: LabelsConfig) -> Self {
        Self {
            config,
            working: Vec::new(),
            index: SpatialIndex::default(),
            repeat_groups: RepeatGroups::default(),
            proxy_marks: Vec::new(),
            touch_items: Vec::new(),
            last_zoom: None,
            needs_update: false,
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LabelsConfig {
        &self.config
    }

    /// Whether any label changed state or alpha in the last update
    ///
    /// A redraw is needed even if the camera did not move.
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Run the full placement pipeline for one frame
    ///
    /// # Arguments
    /// * `view` - Camera of this frame
    /// * `dt` - Seconds elapsed since the previous frame
    /// * `styles` - Active styles, only those carrying labels are inspected
    /// * `tiles` - Visible tiles; label state is updated in place
    /// * `cache` - Retained tiles looked up for proxy transitions
    pub fn update(
        &mut self,
        view: &View,
        dt: f32,
        styles: &[Style],
        tiles: &mut [Tile],
        cache: &dyn TileCache,
    ) {
        self.working.clear();
        self.needs_update = false;
        self.stats = FrameStats::default();

        self.update_labels(view, dt, styles, tiles);
        self.stats.collected = self.working.len();

        if let Some(last_zoom) = self.last_zoom
            && last_zoom.floor() != view.zoom.floor()
        {
            self.proxy_marks.clear();
            let zooming_in = last_zoom < view.zoom;
            proxy::skip_transitions(styles, tiles, cache, zooming_in, &mut self.proxy_marks);
            for &r in &self.proxy_marks {
                let label = r.get_mut(tiles);
                tracing::trace!(id = ?label.id(), "Skipping transition of proxied label");
                label.skip_transitions();
            }
            self.stats.proxy_skips = self.proxy_marks.len();
        }

        self.resolve_collisions(view, tiles);

        self.stats.repeat_dropped = self.repeat_groups.filter(tiles, &self.working);

        for &r in &self.working {
            self.needs_update |= r.get_mut(tiles).eval_state(dt);
        }
        for &r in &self.working {
            if r.get(tiles).is_rendered() {
                tiles[r.tile].meshes_mut()[r.mesh].1.commit(r.label);
            }
        }

        self.last_zoom = Some(view.zoom);

        tracing::debug!(
            collected = self.stats.collected,
            pairs = self.stats.pairs,
            occluded = self.stats.occluded,
            repeat_dropped = self.stats.repeat_dropped,
            proxy_skips = self.stats.proxy_skips,
            needs_update = self.needs_update,
            "Resolved labels"
        );
    }

    /// Project every label of the visible tiles and collect colliding ones
    ///
    /// Non-colliding labels are evaluated and committed straight away.
    fn update_labels(&mut self, view: &View, dt: f32, styles: &[Style], tiles: &mut [Tile]) {
        let zoom_fraction = view.zoom_fraction();

        for (tile_index, tile) in tiles.iter_mut().enumerate() {
            let mvp = view.tile_mvp(tile);
            let proxy = tile.is_proxy();

            for style in styles.iter().filter(|style| style.kind.has_labels()) {
                let Some(mesh_index) = tile.meshes().iter().position(|(id, _)| *id == style.id)
                else {
                    continue;
                };
                let mesh = &mut tile.meshes_mut()[mesh_index].1;
                mesh.begin_frame();

                for label_index in 0..mesh.labels().len() {
                    let label = &mut mesh.labels_mut()[label_index];
                    label.set_proxy(proxy);
                    if !label.update(&mvp, view.size, zoom_fraction) {
                        continue;
                    }

                    if label.can_occlude() {
                        self.working.push(LabelRef {
                            tile: tile_index,
                            mesh: mesh_index,
                            label: label_index,
                        });
                        continue;
                    }

                    self.needs_update |= label.eval_state(dt);
                    if label.is_rendered() {
                        mesh.commit(label_index);
                    }
                }
            }
        }
    }

    /// Broad phase on axis-aligned extents, narrow phase and tie-break
    fn resolve_collisions(&mut self, view: &View, tiles: &mut [Tile]) {
        self.index.resize(view.size, self.config.grid_cell_size);
        for &r in &self.working {
            self.index.insert(r.get(tiles).aabb());
        }

        let pairs = self.index.pairs();
        self.stats.pairs = pairs.len();

        for &(a, b) in pairs {
            let (ra, rb) = (self.working[a], self.working[b]);
            let (la, lb) = (ra.get(tiles), rb.get(tiles));

            // One of the pair already gave way: conflict solved
            if la.is_occluded() || lb.is_occluded() {
                continue;
            }
            if !collision::collide(la, lb) {
                continue;
            }

            let loser = match collision::resolve_pair(la, lb) {
                Yield::First => ra,
                Yield::Second => rb,
            };
            loser.get_mut(tiles).occlude();
            self.stats.occluded += 1;
        }
    }

    /// Interactive labels whose shape intersects a square around `(x, y)`
    ///
    /// With `visible_only`, only labels currently showing are considered and
    /// their shape from the last update is used. Otherwise the shape of every
    /// interactive label is recomputed for `view`, so hidden labels can be
    /// picked too. Label state is never modified.
    ///
    /// Results are sorted by distance to the point and stay valid until the
    /// next query.
    pub fn query_at(
        &mut self,
        view: &View,
        styles: &[Style],
        tiles: &[Tile],
        x: f32,
        y: f32,
        visible_only: bool,
    ) -> &[TouchItem] {
        self.touch_items.clear();

        let point = Vec2::new(x, y);
        let region = Obb::square(point, self.config.touch_size);
        let zoom_fraction = view.zoom_fraction();

        for tile in tiles {
            let mvp = view.tile_mvp(tile);

            for style in styles.iter().filter(|style| style.kind.has_labels()) {
                let Some(mesh) = tile.mesh(style.id) else {
                    continue;
                };

                for label in mesh.labels() {
                    if !label.options().interactive || label.state() == LabelState::Dead {
                        continue;
                    }

                    let obb = if visible_only {
                        if !label.visible_state() {
                            continue;
                        }
                        *label.obb()
                    } else {
                        match label.probe_obb(&mvp, view.size, zoom_fraction) {
                            Some(obb) => obb,
                            None => continue,
                        }
                    };

                    if obb.intersects(&region) {
                        let center = obb.centre();
                        self.touch_items.push(TouchItem {
                            properties: label.options().properties.clone(),
                            position: center.to_array(),
                            distance: center.distance(point),
                        });
                    }
                }
            }
        }

        self.touch_items.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        tracing::debug!(x, y, visible_only, hits = self.touch_items.len(), "Hit-test query");
        &self.touch_items
    }

    /// Record the collision boxes of the last update and the broad-phase grid
    ///
    /// `tiles` must be the tiles given to the last [`Labels::update`]. Does
    /// nothing unless [`LabelsConfig::debug_overlay`] is set.
    pub fn draw_debug(&self, view: &View, tiles: &[Tile], overlay: &mut DebugOverlay) {
        overlay.clear();
        if !self.config.debug_overlay {
            return;
        }

        for label in self.working.iter().filter_map(|r| r.try_get(tiles)) {
            if label.can_occlude() {
                overlay.label(label);
            }
        }

        let mut grid = SpatialIndex::default();
        grid.resize(view.size, self.config.grid_cell_size);
        overlay.grid(grid.split(), grid.cell_size());
    }
}
