//! Diagnostic overlay of collision shapes and the broad-phase grid
//!
//! Primitives are plain screen-space shapes with a `0xRRGGBB` color, left to
//! the caller to rasterize.

use crate::label::{Label, LabelState};
use glam::Vec2;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const SLEEP_COLOR: u32 = 0x00ff00;
pub const VISIBLE_COLOR: u32 = 0x000000;
pub const WAIT_OCCLUSION_COLOR: u32 = 0x0000ff;
pub const FADING_COLOR: u32 = 0xffff00;
pub const DEAD_COLOR: u32 = 0xff0000;
pub const OFFSET_COLOR: u32 = 0x000000;
pub const ANCHOR_COLOR: u32 = 0x0000ff;
pub const GRID_COLOR: u32 = 0x7ef586;

/// Segments of a repeat-distance circle
pub const CIRCLE_SEGMENTS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugPrimitive {
    /// Closed outline
    Polygon { points: [Vec2; 4], color: u32 },
    Line { from: Vec2, to: Vec2, color: u32 },
    /// Axis-aligned outline
    Rect { min: Vec2, max: Vec2, color: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    primitives: Vec<DebugPrimitive>,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    #[inline]
    pub fn primitives(&self) -> &[DebugPrimitive] {
        &self.primitives
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn polygon(&mut self, points: [Vec2; 4], color: u32) {
        self.primitives.push(DebugPrimitive::Polygon { points, color });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: u32) {
        self.primitives.push(DebugPrimitive::Line { from, to, color });
    }

    pub fn rect(&mut self, min: Vec2, max: Vec2, color: u32) {
        self.primitives.push(DebugPrimitive::Rect { min, max, color });
    }

    /// Collision box, offset, anchor and repeat circle of one label
    pub fn label(&mut self, label: &Label) {
        self.polygon(*label.obb().quad(), state_color(label.state()));

        let state = label.transform().state;
        let offset = Vec2::from_angle(state.rotation).rotate(label.options().offset);
        self.line(state.screen_pos, state.screen_pos - offset, OFFSET_COLOR);
        self.rect(
            state.screen_pos - Vec2::ONE,
            state.screen_pos + Vec2::ONE,
            ANCHOR_COLOR,
        );

        let options = label.options();
        if options.repeat_group != 0 && label.state() == LabelState::Visible {
            let color = group_color(options.repeat_group);
            let center = label.center();
            let radius = options.repeat_distance;
            self.line(center, center + Vec2::new(radius, 0.0), color);

            let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
            for i in 0..CIRCLE_SEGMENTS {
                let a0 = step * i as f32;
                let p0 = center + Vec2::from_angle(a0) * radius;
                let p1 = center + Vec2::from_angle(a0 + step) * radius;
                self.line(p0, p1, color);
            }
        }
    }

    /// Outline of every cell of a `split[0]` x `split[1]` grid
    pub fn grid(&mut self, split: [usize; 2], cell_size: Vec2) {
        for y in 0..split[1] {
            for x in 0..split[0] {
                let min = Vec2::new(x as f32, y as f32) * cell_size;
                self.rect(min, min + cell_size, GRID_COLOR);
            }
        }
    }
}

pub fn state_color(state: LabelState) -> u32 {
    match state {
        LabelState::Sleep => SLEEP_COLOR,
        LabelState::Visible => VISIBLE_COLOR,
        LabelState::WaitOcclusion => WAIT_OCCLUSION_COLOR,
        LabelState::FadingIn | LabelState::FadingOut => FADING_COLOR,
        LabelState::Dead => DEAD_COLOR,
    }
}

/// Stable 24-bit color of a repeat group
pub fn group_color(group: u64) -> u32 {
    let mut hasher = DefaultHasher::new();
    group.hash(&mut hasher);
    (hasher.finish() & 0xff_ffff) as u32
}
