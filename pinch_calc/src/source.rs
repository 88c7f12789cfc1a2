//! Landmark sources: LeapMotion hardware or mouse simulation.
//!
//! The public interface is [`LandmarkFrame`] delivered over a `mpsc` channel.
//! The run loop doesn't need to know whether frames came from real hardware
//! or the mouse simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::debug;

use crate::landmarks::{Hand, LandmarkFrame, INDEX_TIP, MIDDLE_TIP};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap reports millimetres relative to the device, x to the right and y
/// up.  The interaction box below is stretched over the whole frame, with
/// y flipped so that raising the hand moves the pointer up.  The device
/// already sees the user's left as left, so no mirroring is needed.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
const LEAP_X_RANGE: (f32, f32) = (-200.0, 200.0);  // mm, left → right
#[cfg(feature = "leap")]
const LEAP_Y_RANGE: (f32, f32) = (80.0, 400.0);    // mm above the device

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        use leaprs::{Connection, ConnectionConfig, Event};
        use tracing::{error, info};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => { error!("failed to create LeapC connection: {:?}", e); return; }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<Hand> = frame.hands().map(|h| leap_hand(&h)).collect();
                if tx.send(LandmarkFrame { hands }).is_err() { return; }
            }
        }
    }
}

/// Map a Leap hand onto the 21-point model.  Per digit (thumb → pinky):
/// knuckle = 4d+1, last joint = 4d+3, tip = 4d+4; the palm stands in for
/// the wrist.
#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> Hand {
    use crate::landmarks::WRIST;

    let norm = |x: f32, y: f32| {
        let nx = (x - LEAP_X_RANGE.0) / (LEAP_X_RANGE.1 - LEAP_X_RANGE.0);
        let ny = 1.0 - (y - LEAP_Y_RANGE.0) / (LEAP_Y_RANGE.1 - LEAP_Y_RANGE.0);
        crate::landmarks::Landmark::new(nx, ny)
    };

    let mut out = Hand::new();
    let palm = hand.palm().position();
    out.set(WRIST, norm(palm.x, palm.y));

    for (d, digit) in hand.digits().enumerate().take(5) {
        let knuckle = digit.metacarpal().next_joint();
        let dip     = digit.distal().prev_joint();
        let tip     = digit.distal().next_joint();
        out.set(4 * d + 1, norm(knuckle.x, knuckle.y));
        out.set(4 * d + 3, norm(dip.x, dip.y));
        out.set(4 * d + 4, norm(tip.x, tip.y));
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Tip spacing (pixels) of the simulated hand when relaxed.
pub const SIM_OPEN_SPREAD: f32 = 70.0;
/// Tip spacing (pixels) while the mouse button is held.
pub const SIM_PINCH_SPREAD: f32 = 10.0;

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor position in frame pixels; `pinched` while the left button is down.
    Pointer { x: f32, y: f32, pinched: bool },
    /// Cursor left the window.
    PointerLeft,
    Quit,
}

/// Landmark source driven by [`SimInput`] events (from the visualizer's
/// window).  The cursor plays the part of the midpoint between the index
/// and middle fingertips.
pub struct SimLandmarkSource {
    pub rx:     Receiver<SimInput>,
    pub width:  u32,
    pub height: u32,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, width: u32, height: u32) -> Self {
        SimLandmarkSource { rx, width, height }
    }

    /// The synthetic hand for a cursor at pixel `(x, y)`.
    pub fn hand_at(&self, x: f32, y: f32, pinched: bool) -> Hand {
        let spread = if pinched { SIM_PINCH_SPREAD } else { SIM_OPEN_SPREAD };
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Hand::new()
            .with(INDEX_TIP,  (x - spread / 2.0) / w, y / h)
            .with(MIDDLE_TIP, (x + spread / 2.0) / w, y / h)
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        for input in self.rx.iter() {
            let frame = match input {
                SimInput::Pointer { x, y, pinched } =>
                    LandmarkFrame::single(self.hand_at(x, y, pinched)),
                SimInput::PointerLeft => LandmarkFrame::empty(),
                SimInput::Quit => {
                    debug!("simulated source stopping");
                    return;
                }
            };
            if tx.send(frame).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::DEFAULT_TRACKED;
    use crate::projector::{project, Point};

    #[test]
    fn sim_hand_centres_on_cursor() {
        let (_tx, rx) = mpsc::channel();
        let src = SimLandmarkSource::new(rx, 1280, 720);

        let open = src.hand_at(640.0, 240.0, false);
        let p = project(Some(&open), 1280, 720, DEFAULT_TRACKED);
        assert_eq!(p.point, Some(Point::new(640, 240)));
        assert_eq!(p.pinch_distance, SIM_OPEN_SPREAD);

        let pinched = src.hand_at(640.0, 240.0, true);
        let p = project(Some(&pinched), 1280, 720, DEFAULT_TRACKED);
        assert_eq!(p.pinch_distance, SIM_PINCH_SPREAD);
    }

    #[test]
    fn sim_spreads_straddle_default_threshold() {
        use crate::debounce::CLICK_THRESHOLD;
        assert!(SIM_PINCH_SPREAD <= CLICK_THRESHOLD);
        assert!(SIM_OPEN_SPREAD > CLICK_THRESHOLD);
    }

    #[test]
    fn sim_source_translates_inputs() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_landmark_source(SimLandmarkSource::new(sim_rx, 1280, 720));

        sim_tx.send(SimInput::Pointer { x: 100.0, y: 100.0, pinched: false }).unwrap();
        sim_tx.send(SimInput::PointerLeft).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();

        let first = rx.recv().unwrap();
        assert_eq!(first.hands.len(), 1);
        let second = rx.recv().unwrap();
        assert!(second.first_hand().is_none());
        // Quit ends the source, closing the channel.
        assert!(rx.recv().is_err());
    }
}
