//! Screen-space shapes and projection helpers shared by the label pipeline

use geo::{Coord, Intersects, LineString, Polygon, Rect};
use glam::{Mat4, Vec2, Vec4};

/// Axis-aligned bounding box in screen units, used by the broad phase
pub type Aabb = Rect<f32>;

/// Smallest clip-space `w` still considered in front of the camera plane
const MIN_CLIP_W: f32 = 1e-6;

/// Oriented bounding box in screen space
///
/// Defined by its centre, a rotation angle (radians, counter-clockwise in
/// y-down screen space as produced by [`f32::atan2`]) and its full width and
/// height. The four corners are computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    centre: Vec2,
    angle: f32,
    width: f32,
    height: f32,
    quad: [Vec2; 4],
}

impl Obb {
    /// Create an OBB centred on `(x, y)`
    pub fn new(x: f32, y: f32, angle: f32, width: f32, height: f32) -> Self {
        let centre = Vec2::new(x, y);
        let axis = Vec2::from_angle(angle);
        let half_x = axis * (width * 0.5);
        let half_y = axis.perp() * (height * 0.5);

        Self {
            centre,
            angle,
            width,
            height,
            quad: [
                centre - half_x - half_y,
                centre + half_x - half_y,
                centre + half_x + half_y,
                centre - half_x + half_y,
            ],
        }
    }

    /// Axis-aligned square of edge `size` centred on a point
    pub fn square(centre: Vec2, size: f32) -> Self {
        Self::new(centre.x, centre.y, 0.0, size, size)
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        self.centre
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Corners in winding order
    #[inline]
    pub fn quad(&self) -> &[Vec2; 4] {
        &self.quad
    }

    /// Axis-aligned extent of the four corners
    pub fn extent(&self) -> Aabb {
        let mut min = self.quad[0];
        let mut max = self.quad[0];
        for corner in &self.quad[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        Rect::new(to_coord(min), to_coord(max))
    }

    /// Exact overlap test between two oriented boxes
    pub fn intersects(&self, other: &Obb) -> bool {
        // Cheap reject before building polygons
        if !self.extent().intersects(&other.extent()) {
            return false;
        }
        self.to_polygon().intersects(&other.to_polygon())
    }

    /// The box as a closed `geo` polygon
    pub fn to_polygon(&self) -> Polygon<f32> {
        let ring: Vec<Coord<f32>> = self.quad.iter().map(|c| to_coord(*c)).collect();
        Polygon::new(LineString::from(ring), vec![])
    }
}

/// Convert a glam vector into a `geo` coordinate
#[inline(always)]
pub fn to_coord(v: Vec2) -> Coord<f32> {
    Coord { x: v.x, y: v.y }
}

/// Viewport rectangle `[0, size]`
#[inline]
pub fn viewport(screen_size: Vec2) -> Aabb {
    Rect::new(Coord { x: 0.0, y: 0.0 }, to_coord(screen_size))
}

/// Transform a model-space position into clip space
#[inline(always)]
pub fn to_clip_space(mvp: &Mat4, position: Vec2) -> Vec4 {
    *mvp * Vec4::new(position.x, position.y, 0.0, 1.0)
}

/// Whether a clip-space position lies behind the camera plane
#[inline(always)]
pub fn is_clipped(clip: Vec4) -> bool {
    clip.w <= MIN_CLIP_W
}

/// Perspective divide and viewport transform (y grows downward)
#[inline(always)]
pub fn clip_to_screen(clip: Vec4, screen_size: Vec2) -> Vec2 {
    let ndc = Vec2::new(clip.x, clip.y) / clip.w;
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * screen_size.x,
        (1.0 - ndc.y) * 0.5 * screen_size.y,
    )
}

/// Project a model-space position to screen space
///
/// Returns `None` when the position is behind the camera plane.
#[inline]
pub fn project(mvp: &Mat4, position: Vec2, screen_size: Vec2) -> Option<Vec2> {
    let clip = to_clip_space(mvp, position);
    if is_clipped(clip) {
        return None;
    }
    Some(clip_to_screen(clip, screen_size))
}

/// Orthographic view-projection mapping screen units 1:1 with a y-down origin
/// at the top-left corner of the viewport
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_obb_extent_axis_aligned() {
        let obb = Obb::new(10.0, 20.0, 0.0, 8.0, 4.0);
        let extent = obb.extent();
        assert!((extent.min().x - 6.0).abs() < 1e-5);
        assert!((extent.min().y - 18.0).abs() < 1e-5);
        assert!((extent.max().x - 14.0).abs() < 1e-5);
        assert!((extent.max().y - 22.0).abs() < 1e-5);
    }

    #[test]
    fn test_obb_extent_rotated() {
        // A quarter turn swaps the width and height of the extent
        let obb = Obb::new(0.0, 0.0, FRAC_PI_2, 8.0, 4.0);
        let extent = obb.extent();
        assert!((extent.width() - 4.0).abs() < 1e-4);
        assert!((extent.height() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_obb_intersects() {
        let a = Obb::new(0.0, 0.0, 0.0, 10.0, 10.0);
        let b = Obb::new(8.0, 0.0, 0.0, 10.0, 10.0);
        let c = Obb::new(30.0, 0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rotated_obbs_with_overlapping_extents_can_miss() {
        // Two thin diagonal boxes whose AABBs overlap but whose shapes do not
        let angle = std::f32::consts::FRAC_PI_4;
        let a = Obb::new(0.0, 0.0, angle, 40.0, 2.0);
        let b = Obb::new(12.0, -12.0, angle, 40.0, 2.0);
        assert!(a.extent().intersects(&b.extent()));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_obb_contained() {
        let outer = Obb::new(0.0, 0.0, 0.0, 100.0, 100.0);
        let inner = Obb::new(5.0, 5.0, 0.3, 4.0, 4.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_project_screen_projection() {
        let mvp = screen_projection(800.0, 600.0);
        let screen = Vec2::new(800.0, 600.0);

        let p = project(&mvp, Vec2::new(100.0, 50.0), screen).unwrap();
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_behind_camera() {
        // Flip w negative
        let mvp = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::new(0.0, 0.0, 0.0, -1.0));
        assert!(project(&mvp, Vec2::new(1.0, 1.0), Vec2::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_viewport() {
        let vp = viewport(Vec2::new(640.0, 480.0));
        assert_eq!(vp.width(), 640.0);
        assert_eq!(vp.height(), 480.0);
    }
}
