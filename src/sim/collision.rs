//! Collision detection and bounce response for rectangular geometry
//!
//! Continuous-space games test a circle against axis-aligned rectangles:
//! clamp the circle center to the rectangle and compare squared distance
//! to squared radius, so no square root is paid per test.

use glam::Vec2;

/// An axis-aligned rectangle, stored as min/max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a top-left corner and a size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Which velocity component a bounce inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Struck a left/right face: invert x
    Horizontal,
    /// Struck a top/bottom face: invert y
    Vertical,
}

/// Circle-vs-rectangle overlap test
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let clamped = center.clamp(rect.min, rect.max);
    (center - clamped).length_squared() <= radius * radius
}

/// Choose the bounce axis from where the circle center sat *before* the
/// step: beyond the left/right edges means a side hit, above/below means a
/// face hit. A corner tie (beyond both, or neither) defaults to vertical.
pub fn bounce_axis(prev_center: Vec2, rect: &Aabb) -> BounceAxis {
    let beyond_x = prev_center.x < rect.min.x || prev_center.x > rect.max.x;
    let beyond_y = prev_center.y < rect.min.y || prev_center.y > rect.max.y;
    if beyond_x && !beyond_y {
        BounceAxis::Horizontal
    } else {
        BounceAxis::Vertical
    }
}

/// Reflect the velocity component perpendicular to the struck surface
pub fn apply_bounce(vel: Vec2, axis: BounceAxis) -> Vec2 {
    match axis {
        BounceAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        BounceAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Aabb {
        Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(40.0, 20.0))
    }

    #[test]
    fn test_overlap_clamped_distance() {
        let r = rect();
        // Center left of the rect, within radius of the near edge
        assert!(circle_rect_overlap(Vec2::new(95.0, 110.0), 6.0, &r));
        // Same spot, smaller radius: miss
        assert!(!circle_rect_overlap(Vec2::new(95.0, 110.0), 4.0, &r));
        // Center inside the rect always overlaps
        assert!(circle_rect_overlap(Vec2::new(120.0, 110.0), 1.0, &r));
    }

    #[test]
    fn test_overlap_uses_squared_distance_at_corner() {
        let r = rect();
        // Diagonal from the (100,100) corner: dx=3, dy=4 -> dist 5
        let center = Vec2::new(97.0, 96.0);
        assert!(circle_rect_overlap(center, 5.0, &r));
        assert!(!circle_rect_overlap(center, 4.9, &r));
    }

    #[test]
    fn test_bounce_axis_side_vs_face() {
        let r = rect();
        // Approached from the left: invert x
        assert_eq!(
            bounce_axis(Vec2::new(90.0, 110.0), &r),
            BounceAxis::Horizontal
        );
        // Approached from above: invert y
        assert_eq!(
            bounce_axis(Vec2::new(120.0, 90.0), &r),
            BounceAxis::Vertical
        );
    }

    #[test]
    fn test_bounce_axis_corner_tie_is_vertical() {
        let r = rect();
        // Beyond both edges (true corner approach)
        assert_eq!(
            bounce_axis(Vec2::new(90.0, 90.0), &r),
            BounceAxis::Vertical
        );
    }

    #[test]
    fn test_apply_bounce() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(apply_bounce(v, BounceAxis::Horizontal), Vec2::new(-3.0, -4.0));
        assert_eq!(apply_bounce(v, BounceAxis::Vertical), Vec2::new(3.0, 4.0));
    }
}
