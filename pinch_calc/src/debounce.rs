//! Click debouncer: turns a per-frame pinch stream into discrete clicks.
//!
//! A held pinch spans many frames.  Once a click fires, the debouncer locks
//! for a fixed number of frames and ignores the pointer entirely; it does not
//! wait for the pinch to be released.
//!
//! ```text
//!            hit && d <= threshold
//!  Unlocked ───────────────────────▶ Locked { remaining: lock_frames }
//!     ▲                                   │ one frame: remaining -= 1
//!     └────────── remaining == 0 ─────────┘
//! ```

use crate::layout::{Layout, Region};
use crate::projector::Pointer;

/// Maximum pinch distance (pixels) that counts as a press.
pub const CLICK_THRESHOLD: f32 = 35.0;

/// Frames during which further clicks are suppressed.
pub const LOCK_DURATION: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickState {
    Unlocked,
    Locked { remaining: u32 },
}

/// An accepted press on `region`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    /// Position of the region in the layout.
    pub index:  usize,
    pub region: Region,
}

#[derive(Clone, Debug)]
pub struct ClickDebouncer {
    state:       ClickState,
    threshold:   f32,
    lock_frames: u32,
}

impl Default for ClickDebouncer {
    fn default() -> Self { ClickDebouncer::new(CLICK_THRESHOLD, LOCK_DURATION) }
}

impl ClickDebouncer {
    pub fn new(threshold: f32, lock_frames: u32) -> Self {
        ClickDebouncer { state: ClickState::Unlocked, threshold, lock_frames }
    }

    pub fn state(&self)     -> ClickState { self.state }
    pub fn is_locked(&self) -> bool { matches!(self.state, ClickState::Locked { .. }) }

    /// Whether `pointer` is pinched tightly enough to press.
    pub fn is_pressing(&self, pointer: &Pointer) -> bool {
        pointer.pinch_distance <= self.threshold
    }

    /// Advance one frame.  Emits at most one click.
    pub fn advance(&mut self, pointer: &Pointer, layout: &Layout) -> Option<ClickEvent> {
        match self.state {
            ClickState::Locked { remaining } => {
                let remaining = remaining.saturating_sub(1);
                self.state = if remaining == 0 {
                    ClickState::Unlocked
                } else {
                    ClickState::Locked { remaining }
                };
                None
            }
            ClickState::Unlocked => {
                let index = layout.hit_index(pointer.point)?;
                if !self.is_pressing(pointer) {
                    return None;
                }
                if self.lock_frames > 0 {
                    self.state = ClickState::Locked { remaining: self.lock_frames };
                }
                let region = layout.get(index)?.clone();
                Some(ClickEvent { index, region })
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{build_layout, LayoutSpec};
    use crate::projector::Point;

    fn layout() -> Layout { build_layout(&LayoutSpec::default()) }

    fn at(x: i32, y: i32, d: f32) -> Pointer {
        Pointer { point: Some(Point::new(x, y)), tips: None, pinch_distance: d }
    }

    #[test]
    fn absent_pointer_never_clicks() {
        let l = layout();
        let mut db = ClickDebouncer::default();
        for _ in 0..100 {
            assert_eq!(db.advance(&Pointer::absent(), &l), None);
        }
        assert_eq!(db.state(), ClickState::Unlocked);
    }

    #[test]
    fn pinch_over_button_clicks() {
        let l = layout();
        let mut db = ClickDebouncer::default();
        let ev = db.advance(&at(640, 240, 20.0), &l).expect("click");
        assert_eq!(ev.region.value(), "7");
        assert_eq!(ev.index, 0);
        assert_eq!(db.state(), ClickState::Locked { remaining: LOCK_DURATION });
    }

    #[test]
    fn threshold_is_inclusive() {
        let l = layout();
        assert!(ClickDebouncer::default().advance(&at(640, 240, 35.0), &l).is_some());
        assert!(ClickDebouncer::default().advance(&at(640, 240, 35.01), &l).is_none());
    }

    #[test]
    fn open_hand_does_not_click() {
        let l = layout();
        let mut db = ClickDebouncer::default();
        assert_eq!(db.advance(&at(640, 240, 80.0), &l), None);
        assert!(!db.is_locked());
    }

    #[test]
    fn pinch_outside_layout_does_not_click() {
        let l = layout();
        let mut db = ClickDebouncer::default();
        assert_eq!(db.advance(&at(100, 100, 0.0), &l), None);
        assert!(!db.is_locked());
    }

    #[test]
    fn lock_suppresses_exactly_lock_duration_frames() {
        let l = layout();
        let mut db = ClickDebouncer::default();
        let held = at(640, 240, 10.0);

        assert!(db.advance(&held, &l).is_some());
        for frame in 1..=LOCK_DURATION {
            assert_eq!(db.advance(&held, &l), None, "frame {} should be locked", frame);
        }
        assert!(db.advance(&held, &l).is_some(), "lock should have expired");
    }

    #[test]
    fn lock_ignores_pointer_changes() {
        let l = layout();
        let mut db = ClickDebouncer::new(CLICK_THRESHOLD, 3);
        assert!(db.advance(&at(640, 240, 10.0), &l).is_some());
        // Release and press a different button while locked.
        assert_eq!(db.advance(&Pointer::absent(), &l), None);
        assert_eq!(db.advance(&at(720, 240, 10.0), &l), None);
        assert_eq!(db.advance(&at(720, 240, 10.0), &l), None);
        let ev = db.advance(&at(720, 240, 10.0), &l).expect("unlocked");
        assert_eq!(ev.region.value(), "8");
    }

    #[test]
    fn countdown_states() {
        let l = layout();
        let mut db = ClickDebouncer::new(CLICK_THRESHOLD, 2);
        db.advance(&at(640, 240, 0.0), &l);
        assert_eq!(db.state(), ClickState::Locked { remaining: 2 });
        db.advance(&Pointer::absent(), &l);
        assert_eq!(db.state(), ClickState::Locked { remaining: 1 });
        db.advance(&Pointer::absent(), &l);
        assert_eq!(db.state(), ClickState::Unlocked);
    }

    #[test]
    fn zero_lock_frames_never_locks() {
        let l = layout();
        let mut db = ClickDebouncer::new(CLICK_THRESHOLD, 0);
        assert!(db.advance(&at(640, 240, 0.0), &l).is_some());
        assert!(db.advance(&at(640, 240, 0.0), &l).is_some());
    }
}
