//! Landmark projector: turns a hand into a pixel-space pointer.
//!
//! Two tracked landmarks are scaled to the frame; their distance is the
//! pinch distance and their midpoint is the pointer position.

use crate::landmarks::{Hand, Landmark};

/// Pinch distance reported when no hand is present.  Never within any
/// click threshold.
pub const NO_PINCH: f32 = f32::INFINITY;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self { Point { x, y } }
}

/// Per-frame pointer derived from the tracked pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    /// Midpoint of the two tips; `None` when no hand is present.
    pub point: Option<Point>,
    /// The two projected tips, kept for on-screen feedback.
    pub tips: Option<[Point; 2]>,
    pub pinch_distance: f32,
}

impl Pointer {
    pub fn absent() -> Self {
        Pointer { point: None, tips: None, pinch_distance: NO_PINCH }
    }

    pub fn is_present(&self) -> bool { self.point.is_some() }
}

impl Default for Pointer {
    fn default() -> Self { Pointer::absent() }
}

/// Pixel coordinates are clamped to `±PIXEL_LIMIT`, so sums and differences
/// of two points stay well inside `i32`.
pub const PIXEL_LIMIT: i32 = 1 << 16;

/// Scale a normalised landmark to pixels, rounding to nearest.
pub fn to_pixel(lm: Landmark, width: u32, height: u32) -> Point {
    let scale = |n: f32, size: u32| {
        let px = (n * size as f32).round();
        if px.is_nan() { 0 } else { px.clamp(-PIXEL_LIMIT as f32, PIXEL_LIMIT as f32) as i32 }
    };
    Point::new(scale(lm.x, width), scale(lm.y, height))
}

/// Project `hand` onto a `width`×`height` frame using the `tracked` pair.
///
/// A missing hand, or a hand lacking either tracked landmark, yields
/// [`Pointer::absent`].
pub fn project(hand: Option<&Hand>, width: u32, height: u32, tracked: [usize; 2]) -> Pointer {
    let (a, b) = match hand.and_then(|h| Some((h.get(tracked[0])?, h.get(tracked[1])?))) {
        Some(pair) => pair,
        None       => return Pointer::absent(),
    };

    let p1 = to_pixel(a, width, height);
    let p2 = to_pixel(b, width, height);

    let dx = (p1.x - p2.x) as f32;
    let dy = (p1.y - p2.y) as f32;

    Pointer {
        point: Some(Point::new(
            (p1.x + p2.x).div_euclid(2),
            (p1.y + p2.y).div_euclid(2),
        )),
        tips: Some([p1, p2]),
        pinch_distance: dx.hypot(dy),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{DEFAULT_TRACKED, INDEX_TIP, MIDDLE_TIP};

    #[test]
    fn absent_hand() {
        let p = project(None, 1280, 720, DEFAULT_TRACKED);
        assert_eq!(p.point, None);
        assert_eq!(p.pinch_distance, NO_PINCH);
        assert!(p.pinch_distance > 1.0e9);
    }

    #[test]
    fn missing_tracked_landmark_is_absent() {
        let h = Hand::new().with(INDEX_TIP, 0.5, 0.5);
        assert!(!project(Some(&h), 1280, 720, DEFAULT_TRACKED).is_present());
    }

    #[test]
    fn distance_and_midpoint() {
        // (0.5, 0.5) → (640, 360); (0.525, 0.55) → (672, 396)
        let h = Hand::new()
            .with(INDEX_TIP,  0.5,   0.5)
            .with(MIDDLE_TIP, 0.525, 0.55);
        let p = project(Some(&h), 1280, 720, DEFAULT_TRACKED);
        assert_eq!(p.tips, Some([Point::new(640, 360), Point::new(672, 396)]));
        assert_eq!(p.point, Some(Point::new(656, 378)));
        let expected = (32.0f32 * 32.0 + 36.0 * 36.0).sqrt();
        assert!((p.pinch_distance - expected).abs() < 1e-4);
    }

    #[test]
    fn projection_rounds_to_nearest() {
        // 0.1004 * 1000 = 100.4 → 100; 0.1006 * 1000 = 100.6 → 101
        let h = Hand::new()
            .with(INDEX_TIP,  0.1004, 0.0)
            .with(MIDDLE_TIP, 0.1006, 0.0);
        let p = project(Some(&h), 1000, 1000, DEFAULT_TRACKED);
        assert_eq!(p.tips, Some([Point::new(100, 0), Point::new(101, 0)]));
    }

    #[test]
    fn extreme_coordinates_are_clamped() {
        let h = Hand::new()
            .with(INDEX_TIP,  1.0e30,  -1.0e30)
            .with(MIDDLE_TIP, 1.0e30,   1.0e30);
        let p = project(Some(&h), 1280, 720, DEFAULT_TRACKED);
        assert_eq!(
            p.tips,
            Some([Point::new(PIXEL_LIMIT, -PIXEL_LIMIT), Point::new(PIXEL_LIMIT, PIXEL_LIMIT)])
        );
        assert_eq!(p.point, Some(Point::new(PIXEL_LIMIT, 0)));
        assert_eq!(p.pinch_distance, 2.0 * PIXEL_LIMIT as f32);

        let h = Hand::new()
            .with(INDEX_TIP,  f32::NAN,      0.5)
            .with(MIDDLE_TIP, f32::INFINITY, 0.5);
        let p = project(Some(&h), 1280, 720, DEFAULT_TRACKED);
        assert_eq!(p.tips, Some([Point::new(0, 360), Point::new(PIXEL_LIMIT, 360)]));
    }

    #[test]
    fn midpoint_floors() {
        let h = Hand::new()
            .with(INDEX_TIP,  0.100, 0.0)
            .with(MIDDLE_TIP, 0.103, 0.0);
        let p = project(Some(&h), 1000, 1000, DEFAULT_TRACKED);
        // (100 + 103) / 2 = 101.5 → 101
        assert_eq!(p.point, Some(Point::new(101, 0)));

        // Landmarks can stray slightly outside the frame.
        let h = Hand::new()
            .with(INDEX_TIP,  -0.003, 0.0)
            .with(MIDDLE_TIP,  0.000, 0.0);
        let p = project(Some(&h), 1000, 1000, DEFAULT_TRACKED);
        assert_eq!(p.point, Some(Point::new(-2, 0)));
    }

    #[test]
    fn distance_is_non_negative_and_symmetric() {
        let h = Hand::new()
            .with(INDEX_TIP,  0.7, 0.2)
            .with(MIDDLE_TIP, 0.3, 0.8);
        let p = project(Some(&h), 1280, 720, DEFAULT_TRACKED);
        let q = project(Some(&h), 1280, 720, [MIDDLE_TIP, INDEX_TIP]);
        assert!(p.pinch_distance >= 0.0);
        assert_eq!(p.pinch_distance, q.pinch_distance);
        assert_eq!(p.point, q.point);
    }
}
