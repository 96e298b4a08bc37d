//! Collision detection between the ball and the rectangular hitboxes
//!
//! All overlap tests are strict on both sides: a ball edge exactly touching a
//! hitbox edge is not a collision. This keeps a tangent frame from counting
//! twice.

use glam::Vec2;

/// Axis-aligned rectangle on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from its center and full size
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Bounding box of a circle moving along y from `from_y` to `to_y`
    pub fn swept_circle_y(x: f32, from_y: f32, to_y: f32, radius: f32) -> Self {
        Self {
            min: Vec2::new(x - radius, from_y.min(to_y) - radius),
            max: Vec2::new(x + radius, from_y.max(to_y) + radius),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps_open(self.min.x, self.max.x, other.min.x, other.max.x)
            && overlaps_open(self.min.y, self.max.y, other.min.y, other.max.y)
    }
}

/// Open-interval overlap of `[a_min, a_max]` and `[b_min, b_max]`
#[inline]
pub fn overlaps_open(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max > b_min && a_min < b_max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tangent_is_not_overlap() {
        let wall = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // Ball whose right edge sits exactly on the wall's left edge
        let ball = Aabb::around_circle(Vec2::new(-4.0, 5.0), 4.0);
        assert!(!wall.overlaps(&ball));
        assert!(!ball.overlaps(&wall));

        let ball = Aabb::around_circle(Vec2::new(-3.9, 5.0), 4.0);
        assert!(wall.overlaps(&ball));
    }

    #[test]
    fn test_from_center_round_trips_geometry() {
        let bat = Aabb::from_center(Vec2::new(195.0, 80.0), Vec2::new(98.0, 200.0));
        assert_eq!(bat.min, Vec2::new(146.0, -20.0));
        assert_eq!(bat.max, Vec2::new(244.0, 180.0));
        assert_eq!(bat.center(), Vec2::new(195.0, 80.0));
        assert_eq!(bat.size(), Vec2::new(98.0, 200.0));
    }

    #[test]
    fn test_swept_box_covers_both_endpoints() {
        let swept = Aabb::swept_circle_y(200.0, 300.0, -50.0, 8.0);
        assert_eq!(swept.min.y, -58.0);
        assert_eq!(swept.max.y, 308.0);

        // A thin target between the endpoints is caught by the sweep only
        let target = Aabb::new(Vec2::new(190.0, 100.0), Vec2::new(210.0, 110.0));
        assert!(swept.overlaps(&target));
        assert!(!Aabb::around_circle(Vec2::new(200.0, -50.0), 8.0).overlaps(&target));
    }
}
