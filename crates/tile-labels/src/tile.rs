//! Map tiles, their addresses and the styles their meshes are built with

use crate::label_set::StyleMesh;
use crate::LabelError;
use glam::Mat4;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Address of a tile in the quadtree pyramid
///
/// `z` is the zoom of the data, `s` the zoom the tile is displayed at. They
/// differ for overzoomed tiles, whose data comes from a lower source zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub z: u8,
    pub s: u8,
}

impl TileId {
    pub const fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z, s: z }
    }

    /// Tile at `s` reusing data from source zoom `z`
    pub const fn overzoomed(x: u32, y: u32, z: u8, s: u8) -> Self {
        Self { x, y, z, s }
    }

    /// Tile one display level up, `None` at the root
    pub fn parent(&self) -> Option<TileId> {
        if self.s == 0 {
            return None;
        }
        if self.s > self.z {
            return Some(TileId { s: self.s - 1, ..*self });
        }
        Some(TileId {
            x: self.x >> 1,
            y: self.y >> 1,
            z: self.z - 1,
            s: self.s - 1,
        })
    }

    /// One of the four tiles one display level down
    ///
    /// `index` bit 0 selects the column and bit 1 the row. Children beyond
    /// `max_source_zoom` reuse the data of this tile.
    pub fn child(&self, index: u8, max_source_zoom: u8) -> TileId {
        let child = TileId {
            x: (self.x << 1) + u32::from(index & 1),
            y: (self.y << 1) + u32::from((index >> 1) & 1),
            z: self.z.saturating_add(1),
            s: self.s.saturating_add(1),
        };
        child.with_max_source_zoom(max_source_zoom)
    }

    /// All four children
    pub fn children(&self, max_source_zoom: u8) -> [TileId; 4] {
        std::array::from_fn(|i| self.child(i as u8, max_source_zoom))
    }

    /// Clamp the data zoom to what the source provides
    pub fn with_max_source_zoom(self, max_source_zoom: u8) -> TileId {
        if self.z <= max_source_zoom {
            return self;
        }
        let over = u32::from(self.z - max_source_zoom);
        TileId {
            x: self.x.checked_shr(over).unwrap_or(0),
            y: self.y.checked_shr(over).unwrap_or(0),
            z: max_source_zoom,
            s: self.s,
        }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)?;
        if self.s != self.z {
            write!(f, "@{}", self.s)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleId(pub u32);

/// What a style draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StyleKind {
    Polygon,
    Polyline,
    Text,
    DebugText,
    Point,
    Raster,
}

impl StyleKind {
    /// Styles whose meshes carry labels
    pub fn has_labels(self) -> bool {
        matches!(self, StyleKind::Text | StyleKind::DebugText | StyleKind::Point)
    }

    /// Styles whose labels may stand in for labels of another tile
    pub fn is_proxy_candidate(self) -> bool {
        matches!(self, StyleKind::Text | StyleKind::Point)
    }
}

impl FromStr for StyleKind {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polygon" => Ok(StyleKind::Polygon),
            "polyline" => Ok(StyleKind::Polyline),
            "text" => Ok(StyleKind::Text),
            "debug-text" => Ok(StyleKind::DebugText),
            "point" => Ok(StyleKind::Point),
            "raster" => Ok(StyleKind::Raster),
            other => Err(LabelError::UnknownStyleKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    pub id: StyleId,
    pub name: String,
    pub kind: StyleKind,
}

impl Style {
    pub fn new(id: StyleId, name: impl Into<String>, kind: StyleKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }
}

/// One map tile as seen by the label resolver
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    source_id: i32,
    max_source_zoom: u8,
    proxy: bool,
    model_matrix: Mat4,
    meshes: Vec<(StyleId, StyleMesh)>,
}

impl Tile {
    pub fn new(id: TileId, source_id: i32, model_matrix: Mat4) -> Self {
        Self {
            id,
            source_id,
            max_source_zoom: u8::MAX,
            proxy: false,
            model_matrix,
            meshes: Vec::new(),
        }
    }

    pub fn with_max_source_zoom(mut self, zoom: u8) -> Self {
        self.max_source_zoom = zoom;
        self
    }

    pub fn with_mesh(mut self, style: StyleId, mesh: StyleMesh) -> Self {
        self.set_mesh(style, mesh);
        self
    }

    /// Attach the mesh of a style, replacing any previous one
    pub fn set_mesh(&mut self, style: StyleId, mesh: StyleMesh) {
        match self.meshes.iter_mut().find(|(id, _)| *id == style) {
            Some((_, slot)) => *slot = mesh,
            None => self.meshes.push((style, mesh)),
        }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    pub fn source_id(&self) -> i32 {
        self.source_id
    }

    #[inline]
    pub fn max_source_zoom(&self) -> u8 {
        self.max_source_zoom
    }

    /// Whether the tile stands in for a missing tile of another zoom
    #[inline]
    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    #[inline]
    pub fn set_proxy(&mut self, proxy: bool) {
        self.proxy = proxy;
    }

    #[inline]
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    #[inline]
    pub fn set_model_matrix(&mut self, matrix: Mat4) {
        self.model_matrix = matrix;
    }

    pub fn mesh(&self, style: StyleId) -> Option<&StyleMesh> {
        self.meshes
            .iter()
            .find(|(id, _)| *id == style)
            .map(|(_, mesh)| mesh)
    }

    pub fn mesh_mut(&mut self, style: StyleId) -> Option<&mut StyleMesh> {
        self.meshes
            .iter_mut()
            .find(|(id, _)| *id == style)
            .map(|(_, mesh)| mesh)
    }

    #[inline]
    pub fn meshes(&self) -> &[(StyleId, StyleMesh)] {
        &self.meshes
    }

    #[inline]
    pub fn meshes_mut(&mut self) -> &mut [(StyleId, StyleMesh)] {
        &mut self.meshes
    }

    /// Number of labels across all meshes
    pub fn label_count(&self) -> usize {
        self.meshes.iter().map(|(_, mesh)| mesh.labels().len()).sum()
    }
}
