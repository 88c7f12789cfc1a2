//! Hand landmark data as delivered by a landmark source.
//!
//! Coordinates are normalised to the frame: `(0, 0)` is the top-left corner,
//! `(1, 1)` the bottom-right.  Indices follow the common 21-point hand model.

use std::collections::BTreeMap;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// The pair whose pinch acts as a click: index and middle fingertips.
pub const DEFAULT_TRACKED: [usize; 2] = [INDEX_TIP, MIDDLE_TIP];

/// Skeleton bones, for drawing.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark / Hand / LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// One normalised 2D landmark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self { Landmark { x, y } }
}

/// The landmarks reported for one hand, keyed by landmark index.
///
/// Sources may report a subset of the 21 points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    points: BTreeMap<usize, Landmark>,
}

impl Hand {
    pub fn new() -> Self { Self::default() }

    /// Builder form of [`Hand::set`].
    pub fn with(mut self, index: usize, x: f32, y: f32) -> Self {
        self.set(index, Landmark::new(x, y));
        self
    }

    pub fn set(&mut self, index: usize, lm: Landmark) {
        self.points.insert(index, lm);
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(&index).copied()
    }

    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Landmark)> + '_ {
        self.points.iter().map(|(&i, &lm)| (i, lm))
    }
}

/// Everything the detector reported for one camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub hands: Vec<Hand>,
}

impl LandmarkFrame {
    /// A frame in which no hand was detected.
    pub fn empty() -> Self { Self::default() }

    pub fn single(hand: Hand) -> Self { LandmarkFrame { hands: vec![hand] } }

    /// Only the first reported hand drives the calculator.
    pub fn first_hand(&self) -> Option<&Hand> { self.hands.first() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_lookup() {
        let h = Hand::new().with(INDEX_TIP, 0.25, 0.5);
        assert_eq!(h.get(INDEX_TIP), Some(Landmark::new(0.25, 0.5)));
        assert_eq!(h.get(MIDDLE_TIP), None);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn first_hand_wins() {
        let a = Hand::new().with(WRIST, 0.1, 0.1);
        let b = Hand::new().with(WRIST, 0.9, 0.9);
        let f = LandmarkFrame { hands: vec![a.clone(), b] };
        assert_eq!(f.first_hand(), Some(&a));
        assert_eq!(LandmarkFrame::empty().first_hand(), None);
    }

    #[test]
    fn connections_reference_valid_indices() {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}
