//! Pure drag-to-launch math, free of ECS so it can be tested headless.
//!
//! A gesture runs from pickup (origin frozen at the marble position) to
//! release. The launch direction is origin minus pointer: pulling away from
//! the marble fires it the opposite way, slingshot style.

use bevy::math::Vec2;

/// Transient pointer interaction between pickup and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    /// Marble position at pickup.
    pub origin: Vec2,
    /// Latest pointer position.
    pub current: Vec2,
}

impl DragGesture {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            current: origin,
        }
    }

    /// Unclamped launch direction: origin minus current pointer.
    pub fn raw_vector(&self) -> Vec2 {
        self.origin - self.current
    }
}

/// Direction-preserving, magnitude-clamped launch vector. Both the applied
/// impulse and the rendered preview derive from this single value, so the
/// preview always matches what release will do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchVector {
    clamped: Vec2,
}

impl LaunchVector {
    /// `None` for a zero-length drag: no force, no velocity reset.
    pub fn from_drag(gesture: &DragGesture, max_drag_distance: f32) -> Option<Self> {
        let raw = gesture.raw_vector();
        let len = raw.length();
        if len <= f32::EPSILON {
            return None;
        }
        let scale = (max_drag_distance / len).min(1.0);
        Some(Self {
            clamped: raw * scale,
        })
    }

    pub fn clamped(&self) -> Vec2 {
        self.clamped
    }

    /// Impulse handed to the physics engine.
    pub fn impulse(&self, force_multiplier: f32) -> Vec2 {
        self.clamped * force_multiplier
    }

    /// Endpoint of the launcher preview line.
    pub fn preview_end(&self, origin: Vec2) -> Vec2 {
        origin + self.clamped
    }
}

/// Pickup test: pointer within the marble radius plus a fixed tolerance.
pub fn within_pickup(pointer: Vec2, marble_pos: Vec2, radius: f32, tolerance: f32) -> bool {
    let r = radius + tolerance;
    pointer.distance_squared(marble_pos) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(origin: Vec2, current: Vec2) -> DragGesture {
        DragGesture { origin, current }
    }

    #[test]
    fn below_clamp_keeps_raw_magnitude() {
        let g = gesture(Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0));
        let lv = LaunchVector::from_drag(&g, 200.0).unwrap();
        assert_eq!(lv.clamped(), Vec2::new(-50.0, 0.0));
        let imp = lv.impulse(0.0025);
        assert!((imp.x - -0.125).abs() < 1e-6);
        assert_eq!(imp.y, 0.0);
    }

    #[test]
    fn at_clamp_boundary_unchanged() {
        // clamp boundary: a 200px drag at multiplier 0.0025 yields (-0.5, 0)
        let g = gesture(Vec2::new(100.0, 100.0), Vec2::new(300.0, 100.0));
        let lv = LaunchVector::from_drag(&g, 200.0).unwrap();
        assert_eq!(lv.clamped(), Vec2::new(-200.0, 0.0));
        let imp = lv.impulse(0.0025);
        assert!((imp.x - -0.5).abs() < 1e-6);
        assert_eq!(imp.y, 0.0);
    }

    #[test]
    fn above_clamp_magnitude_capped_direction_kept() {
        let g = gesture(Vec2::ZERO, Vec2::new(-300.0, -400.0)); // raw (300,400), len 500
        let lv = LaunchVector::from_drag(&g, 200.0).unwrap();
        let clamped = lv.clamped();
        assert!((clamped.length() - 200.0).abs() < 1e-3);
        let dir = clamped.normalize();
        let raw_dir = Vec2::new(300.0, 400.0).normalize();
        assert!((dir - raw_dir).length() < 1e-5);
    }

    #[test]
    fn zero_length_drag_is_none() {
        let g = gesture(Vec2::new(42.0, 7.0), Vec2::new(42.0, 7.0));
        assert!(LaunchVector::from_drag(&g, 200.0).is_none());
    }

    #[test]
    fn preview_matches_impulse_direction() {
        let g = gesture(Vec2::new(10.0, 10.0), Vec2::new(400.0, 10.0));
        let lv = LaunchVector::from_drag(&g, 200.0).unwrap();
        let end = lv.preview_end(g.origin);
        // preview endpoint = origin + clamped, same vector scaled for impulse
        assert_eq!(end, Vec2::new(-190.0, 10.0));
        assert_eq!(lv.impulse(1.0), end - g.origin);
    }

    #[test]
    fn pickup_respects_radius_plus_tolerance() {
        let marble = Vec2::new(0.0, 0.0);
        assert!(within_pickup(Vec2::new(29.0, 0.0), marble, 15.0, 15.0));
        assert!(within_pickup(Vec2::new(30.0, 0.0), marble, 15.0, 15.0));
        assert!(!within_pickup(Vec2::new(30.1, 0.0), marble, 15.0, 15.0));
    }
}
