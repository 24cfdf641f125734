//! A single placeable annotation and its per-frame lifecycle
//!
//! A label is built once by the style pipeline and then driven every frame by
//! the resolver through two calls:
//!
//! - [`Label::update`] projects the anchor(s) to screen space, rebuilds the
//!   collision shape and admits sleeping labels into the pipeline.
//! - [`Label::eval_state`] advances the fade state machine by one step once the
//!   collision and repeat-group passes have decided whether it is occluded.

use crate::fade::{FadeEffect, Transition};
use crate::geometry::{self, Aabb, Obb};
use crate::property::Anchor;
use crate::{LabelError, Result};
use glam::{Mat4, Vec2};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feature properties returned by hit-test queries
pub type Properties = BTreeMap<String, String>;

static NEXT_LABEL_ID: AtomicU64 = AtomicU64::new(1);

/// Unique handle of a label, increasing in construction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelId(pub u64);

impl LabelId {
    fn next() -> Self {
        LabelId(NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How the screen anchor of a label is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabelKind {
    /// Anchored on one model position
    Point,
    /// Anchored on the midpoint of two model positions, rotated along them
    Line,
    /// Point label produced by debug styles
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LabelState {
    Sleep,
    WaitOcclusion,
    Visible,
    FadingIn,
    FadingOut,
    Dead,
}

/// Static placement configuration resolved by the style pipeline
#[derive(Debug, Clone)]
pub struct LabelOptions {
    /// Lower value wins collisions
    pub priority: u32,
    /// Take part in collision and repeat-group filtering
    pub collide: bool,
    /// Reported by hit-test queries
    pub interactive: bool,
    /// Repeat group id, 0 = none
    pub repeat_group: u64,
    /// Minimum screen distance between members of the repeat group, 0 disables
    pub repeat_distance: f32,
    /// Screen-space offset from the projected anchor
    pub offset: Vec2,
    /// Shrinks the collision box of text labels
    pub buffer: f32,
    pub show_transition: Transition,
    pub hide_transition: Transition,
    pub select_transition: Transition,
    /// Identity of the style parameters, stable across tile rebuilds
    pub param_hash: u64,
    pub properties: Option<Arc<Properties>>,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            priority: u32::MAX,
            collide: true,
            interactive: false,
            repeat_group: 0,
            repeat_distance: 0.0,
            offset: Vec2::ZERO,
            buffer: 0.0,
            show_transition: Transition::default(),
            hide_transition: Transition::default(),
            select_transition: Transition::default(),
            param_hash: 0,
            properties: None,
        }
    }
}

/// Screen-space state at the current frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenState {
    pub screen_pos: Vec2,
    /// Radians
    pub rotation: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelTransform {
    pub model_position1: Vec2,
    /// Second anchor, only used by line labels
    pub model_position2: Vec2,
    pub state: ScreenState,
}

/// Per-label attributes copied into every glyph vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextAttributes {
    pub fill: u32,
    pub stroke: u32,
    pub font_scale: u8,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            fill: 0xff00_0000,
            stroke: 0xffff_ffff,
            font_scale: 64,
        }
    }
}

/// What the label draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelContent {
    Text(TextAttributes),
    Sprite {
        /// Screen units the sprite grows by per zoom level
        extrude_scale: f32,
    },
}

#[derive(Debug)]
pub struct Label {
    id: LabelId,
    kind: LabelKind,
    content: LabelContent,
    dimension: Vec2,
    /// Shift derived from the anchor property
    anchor: Vec2,
    options: LabelOptions,
    state: LabelState,
    transform: LabelTransform,
    fade: FadeEffect,
    obb: Obb,
    aabb: Aabb,
    /// Quads of the owning label set drawn by this label
    vertices: Range<usize>,
    proxy: bool,
    occluded: bool,
    occluded_last_frame: bool,
    skip_transition: bool,
}

impl Label {
    /// Create a text label of the given kind at a model-space position
    pub fn text(kind: LabelKind, position: Vec2, dimension: Vec2) -> Self {
        Self::new(
            kind,
            LabelContent::Text(TextAttributes::default()),
            position,
            dimension,
        )
    }

    /// Create a point sprite (icon) label
    pub fn sprite(position: Vec2, dimension: Vec2, extrude_scale: f32) -> Self {
        Self::new(
            LabelKind::Point,
            LabelContent::Sprite { extrude_scale },
            position,
            dimension,
        )
    }

    fn new(kind: LabelKind, content: LabelContent, position: Vec2, dimension: Vec2) -> Self {
        let obb = Obb::new(0.0, 0.0, 0.0, dimension.x, dimension.y);
        Self {
            id: LabelId::next(),
            kind,
            content,
            dimension,
            anchor: Vec2::ZERO,
            options: LabelOptions::default(),
            state: LabelState::Sleep,
            transform: LabelTransform {
                model_position1: position,
                model_position2: position,
                state: ScreenState::default(),
            },
            fade: FadeEffect::default(),
            aabb: obb.extent(),
            obb,
            vertices: 0..0,
            proxy: false,
            occluded: false,
            occluded_last_frame: false,
            skip_transition: false,
        }
    }

    pub fn with_options(mut self, options: LabelOptions) -> Self {
        self.options = options;
        self
    }

    /// Shift point labels so that the given side sits on the anchor point
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor.offset(self.dimension);
        self
    }

    /// Second model-space anchor of a line label
    pub fn with_line_end(mut self, position: Vec2) -> Self {
        self.transform.model_position2 = position;
        self
    }

    /// Glyph colors and scale; ignored for sprites
    pub fn with_text_attributes(mut self, attributes: TextAttributes) -> Self {
        if let LabelContent::Text(attrs) = &mut self.content {
            *attrs = attributes;
        }
        self
    }

    pub fn with_vertices(mut self, range: Range<usize>) -> Self {
        self.vertices = range;
        self
    }

    /// Check the static configuration
    pub fn validate(&self) -> Result<()> {
        let finite = self.dimension.is_finite()
            && self.transform.model_position1.is_finite()
            && self.transform.model_position2.is_finite();
        if !finite || self.dimension.min_element() < 0.0 {
            return Err(LabelError::InvalidDimension {
                width: self.dimension.x,
                height: self.dimension.y,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn id(&self) -> LabelId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    #[inline]
    pub fn content(&self) -> &LabelContent {
        &self.content
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.content, LabelContent::Text(_))
    }

    #[inline]
    pub fn dimension(&self) -> Vec2 {
        self.dimension
    }

    #[inline]
    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    #[inline]
    pub fn state(&self) -> LabelState {
        self.state
    }

    #[inline]
    pub fn transform(&self) -> &LabelTransform {
        &self.transform
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.transform.state.alpha
    }

    /// Collision shape, valid after a successful [`Label::update`] this frame
    #[inline]
    pub fn obb(&self) -> &Obb {
        &self.obb
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Screen-space centre of the collision shape
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.obb.centre()
    }

    #[inline]
    pub fn vertices(&self) -> Range<usize> {
        self.vertices.clone()
    }

    /// Whether this label takes part in collision processing
    #[inline]
    pub fn can_occlude(&self) -> bool {
        self.options.collide
    }

    #[inline]
    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    #[inline]
    pub fn set_proxy(&mut self, proxy: bool) {
        self.proxy = proxy;
    }

    #[inline]
    pub fn is_occluded(&self) -> bool {
        self.occluded
    }

    #[inline]
    pub fn occluded_last_frame(&self) -> bool {
        self.occluded_last_frame
    }

    /// Suppress this label for the current frame
    #[inline]
    pub fn occlude(&mut self) {
        self.occluded = true;
    }

    /// Snap the next state transition instead of fading
    #[inline]
    pub fn skip_transitions(&mut self) {
        self.skip_transition = true;
    }

    #[inline]
    pub fn is_skipping_transition(&self) -> bool {
        self.skip_transition
    }

    /// Showing or about to show without a fade
    #[inline]
    pub fn visible_state(&self) -> bool {
        matches!(self.state, LabelState::Visible | LabelState::FadingIn) || self.skip_transition
    }

    /// Whether the label writes vertices this frame
    #[inline]
    pub fn is_rendered(&self) -> bool {
        matches!(
            self.state,
            LabelState::Visible | LabelState::FadingIn | LabelState::FadingOut
        )
    }

    /// Permanently drop the label from every pass
    pub fn kill(&mut self) {
        self.enter_state(LabelState::Dead, 0.0);
    }

    /// Recompute the screen transform and collision shape
    ///
    /// Returns `false` when the label must be ignored for this frame: it is
    /// dead, its anchor is behind the camera, a line label no longer fits its
    /// segment, or it lies outside the viewport. Such labels fall asleep.
    pub fn update(&mut self, mvp: &Mat4, screen_size: Vec2, zoom_fraction: f32) -> bool {
        self.occluded_last_frame = self.occluded;
        self.occluded = false;

        if self.state == LabelState::Dead {
            return false;
        }

        let Some((screen_pos, rotation)) = self.screen_transform(mvp, screen_size, true) else {
            self.enter_state(LabelState::Sleep, 0.0);
            return false;
        };

        self.transform.state.screen_pos = screen_pos;
        self.transform.state.rotation = rotation;
        self.obb = self.collision_shape(screen_pos, rotation, zoom_fraction);
        self.aabb = self.obb.extent();

        if !geo::Intersects::intersects(&self.aabb, &geometry::viewport(screen_size)) {
            self.enter_state(LabelState::Sleep, 0.0);
            return false;
        }

        if self.state == LabelState::Sleep {
            if self.options.collide {
                self.enter_state(LabelState::WaitOcclusion, 0.0);
            } else {
                self.fade = FadeEffect::from_transition(true, self.options.show_transition);
                self.enter_state(LabelState::FadingIn, 0.0);
            }
        }

        true
    }

    /// Collision shape at the current view without touching label state
    ///
    /// Ignores the line-fit rule so that hidden interactive labels can still be
    /// picked. Returns `None` when an anchor is behind the camera.
    pub fn probe_obb(&self, mvp: &Mat4, screen_size: Vec2, zoom_fraction: f32) -> Option<Obb> {
        self.screen_transform(mvp, screen_size, false)
            .map(|(pos, rotation)| self.collision_shape(pos, rotation, zoom_fraction))
    }

    /// Advance the fade state machine by at most one step
    ///
    /// Returns whether the label changed on screen, i.e. whether a redraw is
    /// needed.
    pub fn eval_state(&mut self, dt: f32) -> bool {
        let skip = std::mem::take(&mut self.skip_transition);
        let was_rendered = self.is_rendered();
        let previous_alpha = self.transform.state.alpha;

        match self.state {
            LabelState::Dead | LabelState::Sleep => {}
            LabelState::WaitOcclusion => {
                if self.occluded {
                    self.enter_state(LabelState::Sleep, 0.0);
                } else {
                    self.fade = FadeEffect::from_transition(true, self.options.show_transition);
                    let alpha = if skip { 1.0 } else { self.fade.update(dt) };
                    self.enter_state(LabelState::Visible, alpha);
                }
            }
            LabelState::Visible => {
                if self.occluded {
                    self.fade = FadeEffect::from_transition(false, self.options.hide_transition)
                        .starting_at(previous_alpha);
                    let alpha = if skip { 0.0 } else { self.fade.update(dt) };
                    self.enter_state(LabelState::FadingOut, alpha);
                } else if skip {
                    self.transform.state.alpha = 1.0;
                } else if self.fade.is_fade_in() && previous_alpha < 1.0 {
                    self.transform.state.alpha = self.fade.update(dt);
                }
            }
            LabelState::FadingIn => {
                if self.occluded {
                    self.fade = FadeEffect::from_transition(false, self.options.hide_transition)
                        .starting_at(previous_alpha);
                    let alpha = self.fade.update(dt);
                    self.enter_state(LabelState::FadingOut, alpha);
                } else if skip {
                    self.enter_state(LabelState::Visible, 1.0);
                } else {
                    self.transform.state.alpha = self.fade.update(dt);
                    if self.fade.is_finished() {
                        self.enter_state(LabelState::Visible, 1.0);
                    }
                }
            }
            LabelState::FadingOut => {
                if !self.occluded {
                    // Won its contest again: fade back in from the current alpha
                    self.fade = FadeEffect::from_transition(true, self.options.show_transition)
                        .starting_at(previous_alpha);
                    let alpha = self.fade.update(dt);
                    self.enter_state(LabelState::Visible, alpha);
                } else if skip {
                    self.enter_state(LabelState::Sleep, 0.0);
                } else {
                    let alpha = self.fade.update(dt);
                    if self.fade.is_finished() || alpha <= 0.0 {
                        self.enter_state(LabelState::Sleep, 0.0);
                    } else {
                        self.transform.state.alpha = alpha;
                    }
                }
            }
        }

        // Waiting labels that lose go back to sleep without ever being drawn
        self.is_rendered() != was_rendered || self.transform.state.alpha != previous_alpha
    }

    fn enter_state(&mut self, state: LabelState, alpha: f32) {
        self.state = state;
        self.transform.state.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Screen position and rotation of the label, `None` if it cannot be placed
    fn screen_transform(
        &self,
        mvp: &Mat4,
        screen_size: Vec2,
        test_visibility: bool,
    ) -> Option<(Vec2, f32)> {
        match self.kind {
            LabelKind::Point | LabelKind::Debug => {
                let position = geometry::project(mvp, self.transform.model_position1, screen_size)?;
                Some((position + self.options.offset + self.anchor, 0.0))
            }
            LabelKind::Line => {
                let p1 = geometry::project(mvp, self.transform.model_position1, screen_size)?;
                let p2 = geometry::project(mvp, self.transform.model_position2, screen_size)?;

                // Keep text upright: always read left to right
                let direction = if p1.x <= p2.x { p2 - p1 } else { p1 - p2 };
                let length = direction.length();
                if test_visibility && length < self.dimension.x {
                    return None;
                }

                let rotation = if length > f32::EPSILON {
                    direction.y.atan2(direction.x)
                } else {
                    0.0
                };
                let offset = Vec2::from_angle(rotation).rotate(self.options.offset);
                Some(((p1 + p2) * 0.5 + offset, rotation))
            }
        }
    }

    fn collision_shape(&self, screen_pos: Vec2, rotation: f32, zoom_fraction: f32) -> Obb {
        let size = match self.content {
            LabelContent::Text(_) => self.dimension - Vec2::splat(self.options.buffer),
            LabelContent::Sprite { extrude_scale } => {
                self.dimension + Vec2::splat(extrude_scale * 2.0 * zoom_fraction)
            }
        }
        .max(Vec2::ZERO);
        Obb::new(screen_pos.x, screen_pos.y, rotation, size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::screen_projection;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn mvp() -> Mat4 {
        screen_projection(SCREEN.x, SCREEN.y)
    }

    fn point_label(x: f32, y: f32) -> Label {
        Label::text(LabelKind::Point, Vec2::new(x, y), Vec2::new(40.0, 10.0))
    }

    #[test]
    fn test_new_label_sleeps() {
        let label = point_label(10.0, 10.0);
        assert_eq!(label.state(), LabelState::Sleep);
        assert_eq!(label.alpha(), 0.0);
        assert!(!label.is_rendered());
    }

    #[test]
    fn test_label_ids_are_unique_and_increasing() {
        let a = point_label(0.0, 0.0);
        let b = point_label(0.0, 0.0);
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_update_admits_colliding_label() {
        let mut label = point_label(100.0, 100.0);
        assert!(label.update(&mvp(), SCREEN, 0.0));
        assert_eq!(label.state(), LabelState::WaitOcclusion);
        assert!((label.center() - Vec2::new(100.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn test_update_admits_non_colliding_label_into_fade_in() {
        let mut label = point_label(100.0, 100.0).with_options(LabelOptions {
            collide: false,
            ..Default::default()
        });
        assert!(label.update(&mvp(), SCREEN, 0.0));
        assert_eq!(label.state(), LabelState::FadingIn);
    }

    #[test]
    fn test_offscreen_label_is_dropped() {
        let mut label = point_label(-500.0, 100.0);
        assert!(!label.update(&mvp(), SCREEN, 0.0));
        assert_eq!(label.state(), LabelState::Sleep);
    }

    #[test]
    fn test_dead_label_never_updates() {
        let mut label = point_label(100.0, 100.0);
        label.kill();
        assert!(!label.update(&mvp(), SCREEN, 0.0));
        assert!(!label.eval_state(0.1));
        assert_eq!(label.state(), LabelState::Dead);
    }

    #[test]
    fn test_anchor_and_offset_shift_position() {
        let mut label = point_label(100.0, 100.0)
            .with_anchor(Anchor::Left)
            .with_options(LabelOptions {
                offset: Vec2::new(0.0, 5.0),
                ..Default::default()
            });
        label.update(&mvp(), SCREEN, 0.0);
        assert!((label.center() - Vec2::new(80.0, 105.0)).length() < 1e-3);
    }

    #[test]
    fn test_line_label_midpoint_and_rotation() {
        let mut label = Label::text(LabelKind::Line, Vec2::new(100.0, 100.0), Vec2::new(20.0, 8.0))
            .with_line_end(Vec2::new(200.0, 200.0));
        assert!(label.update(&mvp(), SCREEN, 0.0));
        assert!((label.center() - Vec2::new(150.0, 150.0)).length() < 1e-3);
        assert!((label.obb().angle() - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn test_line_label_too_short_is_dropped() {
        let mut label = Label::text(LabelKind::Line, Vec2::new(100.0, 100.0), Vec2::new(80.0, 8.0))
            .with_line_end(Vec2::new(110.0, 100.0));
        assert!(!label.update(&mvp(), SCREEN, 0.0));
        // The hit-test probe ignores the fit rule
        assert!(label.probe_obb(&mvp(), SCREEN, 0.0).is_some());
    }

    #[test]
    fn test_line_label_with_one_anchor_behind_camera_is_dropped() {
        // Clip w falls below zero past x = 150
        let mut behind = mvp();
        behind.x_axis.w = -1.0 / 150.0;

        let mut label = Label::text(LabelKind::Line, Vec2::new(100.0, 100.0), Vec2::new(20.0, 8.0))
            .with_line_end(Vec2::new(200.0, 100.0));
        assert!(!label.update(&behind, SCREEN, 0.0));
        assert_eq!(label.state(), LabelState::Sleep);
        assert!(label.probe_obb(&behind, SCREEN, 0.0).is_none());
    }

    #[test]
    fn test_text_buffer_shrinks_and_sprite_extrusion_grows() {
        let mut text = point_label(100.0, 100.0).with_options(LabelOptions {
            buffer: 4.0,
            ..Default::default()
        });
        text.update(&mvp(), SCREEN, 0.5);
        assert!((text.obb().width() - 36.0).abs() < 1e-4);

        let mut sprite = Label::sprite(Vec2::new(100.0, 100.0), Vec2::new(16.0, 16.0), 4.0);
        sprite.update(&mvp(), SCREEN, 0.5);
        assert!((sprite.obb().width() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_fade_in_then_out() {
        let mut label = point_label(100.0, 100.0);
        label.update(&mvp(), SCREEN, 0.0);
        assert!(label.eval_state(0.1));
        assert_eq!(label.state(), LabelState::Visible);
        assert!((label.alpha() - 0.5).abs() < 1e-4);

        label.update(&mvp(), SCREEN, 0.0);
        assert!(label.eval_state(0.2));
        assert_eq!(label.alpha(), 1.0);

        // Settled: nothing changes
        label.update(&mvp(), SCREEN, 0.0);
        assert!(!label.eval_state(0.1));

        label.update(&mvp(), SCREEN, 0.0);
        label.occlude();
        assert!(label.eval_state(0.1));
        assert_eq!(label.state(), LabelState::FadingOut);
        assert!((label.alpha() - 0.5).abs() < 1e-4);

        label.update(&mvp(), SCREEN, 0.0);
        assert!(label.occluded_last_frame());
        label.occlude();
        label.eval_state(0.2);
        assert_eq!(label.state(), LabelState::Sleep);
        assert_eq!(label.alpha(), 0.0);
    }

    #[test]
    fn test_occluded_waiting_label_sleeps() {
        let mut label = point_label(100.0, 100.0);
        label.update(&mvp(), SCREEN, 0.0);
        label.occlude();
        label.eval_state(0.1);
        assert_eq!(label.state(), LabelState::Sleep);
        assert!(!label.is_rendered());
    }

    #[test]
    fn test_skip_transition_snaps_alpha_once() {
        let mut label = point_label(100.0, 100.0);
        label.update(&mvp(), SCREEN, 0.0);
        label.skip_transitions();
        assert!(label.visible_state());
        label.eval_state(0.01);
        assert_eq!(label.state(), LabelState::Visible);
        assert_eq!(label.alpha(), 1.0);
        assert!(!label.is_skipping_transition());
    }

    #[test]
    fn test_fading_out_label_reverses_when_free() {
        let mut label = point_label(100.0, 100.0);
        label.update(&mvp(), SCREEN, 0.0);
        label.eval_state(1.0);
        label.update(&mvp(), SCREEN, 0.0);
        label.occlude();
        label.eval_state(0.1);
        assert_eq!(label.state(), LabelState::FadingOut);
        let alpha = label.alpha();

        label.update(&mvp(), SCREEN, 0.0);
        label.eval_state(0.05);
        assert_eq!(label.state(), LabelState::Visible);
        assert!(label.alpha() > alpha);
    }

    #[test]
    fn test_non_colliding_label_fades_in_to_visible() {
        let mut label = point_label(100.0, 100.0).with_options(LabelOptions {
            collide: false,
            ..Default::default()
        });
        label.update(&mvp(), SCREEN, 0.0);
        label.eval_state(0.1);
        assert_eq!(label.state(), LabelState::FadingIn);
        label.update(&mvp(), SCREEN, 0.0);
        label.eval_state(0.2);
        assert_eq!(label.state(), LabelState::Visible);
        assert_eq!(label.alpha(), 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_dimension() {
        let label = Label::text(LabelKind::Point, Vec2::ZERO, Vec2::new(-1.0, 4.0));
        assert!(matches!(
            label.validate(),
            Err(LabelError::InvalidDimension { .. })
        ));
        let label = Label::text(LabelKind::Point, Vec2::ZERO, Vec2::new(f32::NAN, 4.0));
        assert!(label.validate().is_err());
        assert!(point_label(0.0, 0.0).validate().is_ok());
    }
}
