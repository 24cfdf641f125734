//! Tile Labels - Label Placement for Tile-Based Vector Map Rendering
//!
//! Every frame, the labels (text and icons) carried by the visible map tiles
//! are projected to screen space, contested for room, filtered by repeat
//! groups and faded in or out. The survivors write their per-vertex screen
//! state into the owning style meshes.
//!
//! # Architecture
//!
//! - **[`Label`]**: One placeable annotation and its fade state machine
//! - **[`LabelSet`]**: A style mesh's labels, their quads and the vertices committed this frame
//! - **[`Tile`]**: Labels of one map tile, grouped by style, plus its model matrix
//! - **[`TileCache`]**: Recently used tiles, consulted for proxy transitions
//! - **[`SpatialIndex`]**: Uniform grid broad phase emitting candidate pairs
//! - **[`Labels`]**: The per-frame resolver and hit-test query
//!
//! # Frame Pipeline
//!
//! 1. Update: project labels, build collision shapes, admit sleeping labels
//! 2. Proxy marking: on integer zoom change, hide duplicates from proxy tiles
//! 3. Broad phase: grid-bucket axis-aligned extents into candidate pairs
//! 4. Narrow phase: oriented overlap test and tie-break (proxy, priority, history, id)
//! 5. Repeat groups: suppress same-group labels closer than their repeat distance
//! 6. Evaluate: advance fade states and commit vertices of rendered labels

mod cache;
mod collision;
pub mod debug;
mod fade;
pub mod geometry;
mod grid;
mod label;
mod label_set;
mod property;
mod proxy;
mod repeat;
mod resolver;
mod tile;
mod touch;

// Public API exports
pub use cache::{LruTileCache, TileCache};
pub use collision::{Yield, collide, resolve_pair};
pub use debug::{DebugOverlay, DebugPrimitive};
pub use fade::{FadeEffect, Interpolation, Transition};
pub use grid::SpatialIndex;
pub use label::{
    Label, LabelContent, LabelId, LabelKind, LabelOptions, LabelState, LabelTransform,
    Properties, ScreenState, TextAttributes,
};
pub use label_set::{
    GeometryMesh, GlyphQuad, GlyphVertex, LabelQuad, LabelSet, SpriteLabels, SpriteQuad,
    SpriteVertex, StyleMesh, TextLabels, VertexState,
};
pub use property::Anchor;
pub use resolver::{FrameStats, Labels, LabelsConfig, View};
pub use tile::{Style, StyleId, StyleKind, Tile, TileId};
pub use touch::TouchItem;

use std::ops::Range;

/// Error types for label construction and configuration
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("Unknown anchor: {0}")]
    UnknownAnchor(String),

    #[error("Unknown interpolation: {0}")]
    UnknownInterpolation(String),

    #[error("Unknown style kind: {0}")]
    UnknownStyleKind(String),

    #[error("Vertex range {range:?} out of bounds for {available} quads")]
    VertexRange {
        range: Range<usize>,
        available: usize,
    },

    #[error("Invalid label dimension: {width}x{height}")]
    InvalidDimension { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, LabelError>;
