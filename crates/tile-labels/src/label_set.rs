//! Per-style label storage and the vertices committed each frame
//!
//! Quads are built once by the style pipeline and indexed by label through a
//! range. Each frame the vertex buffer is rebuilt from the labels that are
//! still rendered, with their current screen state baked into every vertex.

use crate::label::{Label, LabelContent, ScreenState, TextAttributes};
use crate::{LabelError, Result};
use std::ops::Range;

/// Screen state packed into the fixed-point layout uploaded with each vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexState {
    /// Screen position in quarter pixels
    pub screen_pos: [i16; 2],
    pub alpha: u8,
    /// Rotation in radians scaled by 4096
    pub rotation: i16,
}

impl VertexState {
    pub const POSITION_SCALE: f32 = 4.0;
    pub const ALPHA_SCALE: f32 = 255.0;
    pub const ROTATION_SCALE: f32 = 4096.0;

    pub fn new(state: &ScreenState) -> Self {
        let pack = |v: f32, scale: f32| {
            (v * scale)
                .round()
                .clamp(i16::MIN as f32, i16::MAX as f32) as i16
        };
        Self {
            screen_pos: [
                pack(state.screen_pos.x, Self::POSITION_SCALE),
                pack(state.screen_pos.y, Self::POSITION_SCALE),
            ],
            alpha: (state.alpha.clamp(0.0, 1.0) * Self::ALPHA_SCALE).round() as u8,
            rotation: pack(state.rotation, Self::ROTATION_SCALE),
        }
    }
}

/// A quad type that knows how to expand into four vertices
pub trait LabelQuad: Clone + std::fmt::Debug {
    type Vertex: Clone + std::fmt::Debug;

    fn vertices(&self, label: &Label, state: VertexState) -> [Self::Vertex; 4];
}

/// One glyph: corner offsets relative to the label origin and atlas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphQuad {
    pub corners: [[i16; 2]; 4],
    pub uvs: [[u16; 2]; 4],
    /// Index of the glyph atlas texture
    pub atlas: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphVertex {
    pub pos: [i16; 2],
    pub uv: [u16; 2],
    pub fill: u32,
    pub stroke: u32,
    pub font_scale: u8,
    pub state: VertexState,
}

impl LabelQuad for GlyphQuad {
    type Vertex = GlyphVertex;

    fn vertices(&self, label: &Label, state: VertexState) -> [GlyphVertex; 4] {
        let attributes = match label.content() {
            LabelContent::Text(attributes) => *attributes,
            LabelContent::Sprite { .. } => TextAttributes::default(),
        };
        std::array::from_fn(|i| GlyphVertex {
            pos: self.corners[i],
            uv: self.uvs[i],
            fill: attributes.fill,
            stroke: attributes.stroke,
            font_scale: attributes.font_scale,
            state,
        })
    }
}

/// One icon quad with its per-corner zoom extrusion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteQuad {
    pub corners: [[i16; 2]; 4],
    pub uvs: [[u16; 2]; 4],
    pub extrude: [[i16; 2]; 4],
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteVertex {
    pub pos: [i16; 2],
    pub uv: [u16; 2],
    pub extrude: [i16; 2],
    pub color: u32,
    pub state: VertexState,
}

impl LabelQuad for SpriteQuad {
    type Vertex = SpriteVertex;

    fn vertices(&self, _label: &Label, state: VertexState) -> [SpriteVertex; 4] {
        std::array::from_fn(|i| SpriteVertex {
            pos: self.corners[i],
            uv: self.uvs[i],
            extrude: self.extrude[i],
            color: self.color,
            state,
        })
    }
}

/// Labels of one style mesh together with their quads
#[derive(Debug)]
pub struct LabelSet<Q: LabelQuad> {
    labels: Vec<Label>,
    quads: Vec<Q>,
    vertices: Vec<Q::Vertex>,
}

pub type TextLabels = LabelSet<GlyphQuad>;
pub type SpriteLabels = LabelSet<SpriteQuad>;

impl<Q: LabelQuad> Default for LabelSet<Q> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            quads: Vec::new(),
            vertices: Vec::new(),
        }
    }
}

impl<Q: LabelQuad> LabelSet<Q> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append quads and return their index range, to be given to a label
    pub fn push_quads(&mut self, quads: impl IntoIterator<Item = Q>) -> Range<usize> {
        let start = self.quads.len();
        self.quads.extend(quads);
        start..self.quads.len()
    }

    /// Append a label whose vertex range refers to quads already pushed
    ///
    /// Labels with an empty collision area are kept but never placed.
    pub fn push_label(&mut self, mut label: Label) -> Result<usize> {
        label.validate()?;
        let range = label.vertices();
        if range.start > range.end || range.end > self.quads.len() {
            return Err(LabelError::VertexRange {
                range,
                available: self.quads.len(),
            });
        }

        let dimension = label.dimension();
        if dimension.x == 0.0 || dimension.y == 0.0 {
            tracing::warn!(id = ?label.id(), "Label has an empty area, it will never be placed");
            label.kill();
        }

        self.labels.push(label);
        Ok(self.labels.len() - 1)
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline]
    pub fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.labels
    }

    #[inline]
    pub fn quads(&self) -> &[Q] {
        &self.quads
    }

    /// Vertices committed since the last [`LabelSet::begin_frame`]
    #[inline]
    pub fn vertices(&self) -> &[Q::Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Drop the vertices of the previous frame
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
    }

    /// Write the vertices of label `index` with its current screen state
    pub fn commit(&mut self, index: usize) {
        let Some(label) = self.labels.get(index) else {
            return;
        };
        let state = VertexState::new(&label.transform().state);
        let range = label.vertices();
        for quad in &self.quads[range] {
            self.vertices.extend(quad.vertices(label, state));
        }
    }
}

/// Mesh without labels, e.g. polygons and lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryMesh {
    pub vertex_count: usize,
}

/// Renderable output of one style for one tile
#[derive(Debug)]
pub enum StyleMesh {
    Text(TextLabels),
    Point(SpriteLabels),
    Geometry(GeometryMesh),
}

impl StyleMesh {
    pub fn labels(&self) -> &[Label] {
        match self {
            StyleMesh::Text(set) => set.labels(),
            StyleMesh::Point(set) => set.labels(),
            StyleMesh::Geometry(_) => &[],
        }
    }

    pub fn labels_mut(&mut self) -> &mut [Label] {
        match self {
            StyleMesh::Text(set) => set.labels_mut(),
            StyleMesh::Point(set) => set.labels_mut(),
            StyleMesh::Geometry(_) => &mut [],
        }
    }

    /// Whether the mesh holds labels
    pub fn has_labels(&self) -> bool {
        !matches!(self, StyleMesh::Geometry(_))
    }

    pub fn begin_frame(&mut self) {
        match self {
            StyleMesh::Text(set) => set.begin_frame(),
            StyleMesh::Point(set) => set.begin_frame(),
            StyleMesh::Geometry(_) => {}
        }
    }

    pub fn commit(&mut self, index: usize) {
        match self {
            StyleMesh::Text(set) => set.commit(index),
            StyleMesh::Point(set) => set.commit(index),
            StyleMesh::Geometry(_) => {}
        }
    }

    /// Number of vertices committed this frame
    pub fn committed_vertices(&self) -> usize {
        match self {
            StyleMesh::Text(set) => set.vertices().len(),
            StyleMesh::Point(set) => set.vertices().len(),
            StyleMesh::Geometry(_) => 0,
        }
    }
}
