//! JSON scene description and its conversion into tiles, styles and a cache
//!
//! World coordinates span one unit per zoom-0 tile. A tile `z/x/y` covers the
//! square `[x, x+1] / 2^z` and its labels are placed in tile-local `0..1`
//! coordinates, so a tile is `256 * 2^(zoom - z)` screen units wide at the
//! view zoom.

use crate::error::{Result, SimError};
use glam::{Mat4, Vec2, Vec3};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tile_labels::{
    Anchor, GlyphQuad, Label, LabelKind, LabelsConfig, LruTileCache, Properties, SpriteLabels,
    SpriteQuad, Style, StyleId, StyleKind, StyleMesh, TextLabels, Tile, TileId, View,
};

/// Screen units covered by one tile at its own zoom level
pub const TILE_SIZE: f32 = 256.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub view: ViewDesc,
    pub styles: Vec<StyleDesc>,
    #[serde(default)]
    pub tiles: Vec<TileDesc>,
    /// Zoom per frame, the last one holds for the remaining frames
    #[serde(default)]
    pub zooms: Vec<f32>,
    #[serde(default)]
    pub config: LabelsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDesc {
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
    /// World position at the centre of the viewport
    #[serde(default = "default_center")]
    pub center: [f32; 2],
}

fn default_center() -> [f32; 2] {
    [0.5, 0.5]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDesc {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileDesc {
    pub x: u32,
    pub y: u32,
    pub z: u8,
    #[serde(default)]
    pub max_zoom: Option<u8>,
    #[serde(default)]
    pub source: i32,
    #[serde(default)]
    pub proxy: bool,
    /// Retired tile, only reachable through the cache
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub labels: Vec<LabelDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelDesc {
    pub style: String,
    #[serde(default = "default_kind")]
    pub kind: LabelKind,
    /// Tile-local anchor position
    pub position: [f32; 2],
    /// Second anchor of line labels
    #[serde(default)]
    pub end: Option<[f32; 2]>,
    /// Screen-space width and height
    pub size: [f32; 2],
    /// Glyph quads of text labels
    #[serde(default = "default_quads")]
    pub quads: usize,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub collide: Option<bool>,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub repeat_group: u64,
    #[serde(default)]
    pub repeat_distance: f32,
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default)]
    pub buffer: f32,
    /// Sprite extrusion
    #[serde(default)]
    pub extrude: f32,
    #[serde(default)]
    pub properties: Properties,
}

fn default_kind() -> LabelKind {
    LabelKind::Point
}

fn default_quads() -> usize {
    1
}

/// Everything the resolver needs, built from a [`Scene`]
#[derive(Debug)]
pub struct World {
    pub styles: Vec<Style>,
    pub tiles: Vec<Tile>,
    pub cache: LruTileCache,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(text)?;
        if !(scene.view.width > 0.0 && scene.view.height > 0.0) {
            return Err(SimError::Scene(format!(
                "view size must be positive, got {}x{}",
                scene.view.width, scene.view.height
            )));
        }
        Ok(scene)
    }

    /// Zoom of `frame` from the scene's own sequence
    pub fn zoom_at(&self, frame: usize) -> f32 {
        self.zooms
            .get(frame)
            .or(self.zooms.last())
            .copied()
            .unwrap_or(self.view.zoom)
    }

    /// Orthographic y-down camera centred on the scene centre at `zoom`
    pub fn view(&self, zoom: f32) -> View {
        let scale = TILE_SIZE * zoom.exp2();
        let half = Vec2::new(self.view.width, self.view.height) * 0.5 / scale;
        let [cx, cy] = self.view.center;
        let view_projection =
            Mat4::orthographic_rh(cx - half.x, cx + half.x, cy + half.y, cy - half.y, -1.0, 1.0);
        View::new(
            view_projection,
            Vec2::new(self.view.width, self.view.height),
            zoom,
        )
    }

    #[profiling::function]
    pub fn build(&self, config: &LabelsConfig) -> Result<World> {
        let styles = self
            .styles
            .iter()
            .enumerate()
            .map(|(i, desc)| -> Result<Style> {
                let kind: StyleKind = desc.kind.parse()?;
                Ok(Style::new(StyleId(i as u32), desc.name.clone(), kind))
            })
            .collect::<Result<Vec<_>>>()?;

        let cached = self.tiles.iter().filter(|t| t.cached).count();
        let mut cache = LruTileCache::new(cached);
        let mut tiles = Vec::with_capacity(self.tiles.len() - cached);

        for desc in &self.tiles {
            let tile = build_tile(desc, &styles, config)?;
            if desc.cached {
                cache.put(tile);
            } else {
                tiles.push(tile);
            }
        }

        tracing::info!(
            styles = styles.len(),
            tiles = tiles.len(),
            cached = cache.len(),
            "Scene built"
        );
        Ok(World {
            styles,
            tiles,
            cache,
        })
    }
}

/// Model matrix mapping tile-local `0..1` coordinates of a displayed tile into world space
pub fn tile_matrix(id: TileId) -> Mat4 {
    let size = (-f32::from(id.z)).exp2();
    Mat4::from_translation(Vec3::new(id.x as f32 * size, id.y as f32 * size, 0.0))
        * Mat4::from_scale(Vec3::new(size, size, 1.0))
}

fn build_tile(desc: &TileDesc, styles: &[Style], config: &LabelsConfig) -> Result<Tile> {
    let max_zoom = desc.max_zoom.unwrap_or(desc.z);
    let display = TileId::new(desc.x, desc.y, desc.z);
    let id = display.with_max_source_zoom(max_zoom);
    let mut tile = Tile::new(id, desc.source, tile_matrix(display)).with_max_source_zoom(max_zoom);
    tile.set_proxy(desc.proxy);

    for style in styles.iter().filter(|s| s.kind.has_labels()) {
        let descs: Vec<_> = desc.labels.iter().filter(|l| l.style == style.name).collect();
        if descs.is_empty() {
            continue;
        }

        let mesh = if style.kind == StyleKind::Point {
            let mut set = SpriteLabels::new();
            for label in descs {
                let range = set.push_quads([SpriteQuad::default()]);
                let position = Vec2::from(label.position);
                let sprite = Label::sprite(position, Vec2::from(label.size), label.extrude);
                set.push_label(configure(sprite, label, config)?.with_vertices(range))?;
            }
            StyleMesh::Point(set)
        } else {
            let mut set = TextLabels::new();
            for label in descs {
                let range = set.push_quads(std::iter::repeat_n(GlyphQuad::default(), label.quads));
                let text = Label::text(label.kind, Vec2::from(label.position), Vec2::from(label.size));
                set.push_label(configure(text, label, config)?.with_vertices(range))?;
            }
            StyleMesh::Text(set)
        };
        tile.set_mesh(style.id, mesh);
    }

    if let Some(orphan) = desc
        .labels
        .iter()
        .find(|l| !styles.iter().any(|s| s.name == l.style && s.kind.has_labels()))
    {
        return Err(SimError::Scene(format!(
            "tile {id}: label style '{}' is not a label style of this scene",
            orphan.style
        )));
    }

    Ok(tile)
}

fn configure(label: Label, desc: &LabelDesc, config: &LabelsConfig) -> Result<Label> {
    let mut options = config.label_options();
    if let Some(priority) = desc.priority {
        options.priority = priority;
    }
    if let Some(collide) = desc.collide {
        options.collide = collide;
    }
    options.interactive = desc.interactive;
    options.repeat_group = desc.repeat_group;
    options.repeat_distance = desc.repeat_distance;
    options.offset = Vec2::from(desc.offset);
    options.buffer = desc.buffer;
    if !desc.properties.is_empty() {
        options.properties = Some(Arc::new(desc.properties.clone()));
    }

    let mut label = label.with_options(options);
    if let Some(anchor) = &desc.anchor {
        label = label.with_anchor(anchor.parse::<Anchor>()?);
    }
    if desc.kind == LabelKind::Line {
        let end = desc.end.ok_or_else(|| {
            SimError::Scene(format!("line label of style '{}' has no end", desc.style))
        })?;
        label = label.with_line_end(Vec2::from(end));
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = include_str!("../scenes/crossing.json");

    fn minimal(labels: &str) -> String {
        format!(
            r#"{{
                "view": {{ "width": 512, "height": 512, "zoom": 1 }},
                "styles": [
                    {{ "name": "roads", "kind": "polyline" }},
                    {{ "name": "places", "kind": "text" }},
                    {{ "name": "pois", "kind": "point" }}
                ],
                "tiles": [{{ "x": 0, "y": 0, "z": 1, "labels": {labels} }}]
            }}"#
        )
    }

    #[test]
    fn test_demo_scene_builds() {
        let scene = Scene::from_json(DEMO).unwrap();
        let world = scene.build(&scene.config).unwrap();
        assert!(!world.tiles.is_empty());
        assert_eq!(world.cache.len(), scene.tiles.iter().filter(|t| t.cached).count());
    }

    #[test]
    fn test_labels_grouped_by_style() {
        let json = minimal(
            r#"[
                { "style": "places", "position": [0.5, 0.5], "size": [40, 12], "quads": 4 },
                { "style": "pois", "position": [0.2, 0.2], "size": [16, 16], "extrude": 1.5 },
                { "style": "places", "position": [0.1, 0.9], "size": [30, 12], "anchor": "top-left" }
            ]"#,
        );
        let scene = Scene::from_json(&json).unwrap();
        let world = scene.build(&LabelsConfig::default()).unwrap();
        let tile = &world.tiles[0];

        assert_eq!(tile.mesh(StyleId(0)).map(|m| m.labels().len()), None);
        let places = tile.mesh(StyleId(1)).unwrap();
        assert_eq!(places.labels().len(), 2);
        assert_eq!(places.labels()[0].vertices(), 0..4);
        assert!(matches!(tile.mesh(StyleId(2)), Some(StyleMesh::Point(_))));
    }

    #[test]
    fn test_tile_matrix_places_tile_in_world() {
        let id = TileId::new(3, 1, 2);
        let origin = tile_matrix(id).transform_point3(Vec3::ZERO);
        let corner = tile_matrix(id).transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((origin - Vec3::new(0.75, 0.25, 0.0)).length() < 1e-6);
        assert!((corner - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_view_scale_matches_zoom() {
        let json = minimal("[]");
        let scene = Scene::from_json(&json).unwrap();
        let view = scene.view(1.0);

        // Zoom-1 tile is 256 screen units wide at zoom 1
        let mvp = view.view_projection * tile_matrix(TileId::new(0, 0, 1));
        let a = tile_labels::geometry::project(&mvp, Vec2::ZERO, view.size).unwrap();
        let b = tile_labels::geometry::project(&mvp, Vec2::new(1.0, 1.0), view.size).unwrap();
        assert!((b - a - Vec2::splat(256.0)).length() < 1e-3);
        assert!((b - Vec2::splat(256.0)).length() < 1e-3);
    }

    #[test]
    fn test_zoom_sequence() {
        let mut scene = Scene::from_json(&minimal("[]")).unwrap();
        assert_eq!(scene.zoom_at(4), 1.0);
        scene.zooms = vec![2.0, 2.5];
        assert_eq!(scene.zoom_at(0), 2.0);
        assert_eq!(scene.zoom_at(9), 2.5);
    }

    #[test]
    fn test_deep_overzoom_tile_builds() {
        let json = r#"{
            "view": { "width": 256, "height": 256, "zoom": 40 },
            "styles": [{ "name": "places", "kind": "text" }],
            "tiles": [{ "x": 3, "y": 5, "z": 40, "max_zoom": 2, "labels": [
                { "style": "places", "position": [0.5, 0.5], "size": [20, 10] }
            ] }]
        }"#;
        let scene = Scene::from_json(json).unwrap();
        let world = scene.build(&LabelsConfig::default()).unwrap();
        assert_eq!(world.tiles[0].id(), TileId::overzoomed(0, 0, 2, 40));
        assert_eq!(world.tiles[0].label_count(), 1);
    }

    #[test]
    fn test_invalid_scenes() {
        let unknown_style = minimal(r#"[{ "style": "rivers", "position": [0, 0], "size": [1, 1] }]"#);
        let scene = Scene::from_json(&unknown_style).unwrap();
        assert!(matches!(scene.build(&LabelsConfig::default()), Err(SimError::Scene(_))));

        let geometry_style = minimal(r#"[{ "style": "roads", "position": [0, 0], "size": [1, 1] }]"#);
        let scene = Scene::from_json(&geometry_style).unwrap();
        assert!(matches!(scene.build(&LabelsConfig::default()), Err(SimError::Scene(_))));

        let bad_anchor = minimal(
            r#"[{ "style": "places", "position": [0, 0], "size": [1, 1], "anchor": "middle" }]"#,
        );
        let scene = Scene::from_json(&bad_anchor).unwrap();
        assert!(matches!(scene.build(&LabelsConfig::default()), Err(SimError::Label(_))));

        let line_without_end =
            minimal(r#"[{ "style": "places", "kind": "line", "position": [0, 0], "size": [1, 1] }]"#);
        let scene = Scene::from_json(&line_without_end).unwrap();
        assert!(matches!(scene.build(&LabelsConfig::default()), Err(SimError::Scene(_))));

        assert!(matches!(Scene::from_json("{"), Err(SimError::Json(_))));
        let flat = r#"{ "view": { "width": 0, "height": 10, "zoom": 1 }, "styles": [] }"#;
        assert!(matches!(Scene::from_json(flat), Err(SimError::Scene(_))));
    }
}
