//! Top-level application state and run loop.
//!
//! `AppState` owns the [`Calculator`] and the latest landmark frame.  Each
//! window frame it advances the calculator once and keeps what the
//! visualizer needs to draw.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use calc_expr::Expression;
use tracing::{error, info};

use crate::debounce::{ClickEvent, CLICK_THRESHOLD, LOCK_DURATION};
use crate::error::AppError;
use crate::frame::{Calculator, FrameOutcome};
use crate::landmarks::{Hand, LandmarkFrame, DEFAULT_TRACKED, LANDMARK_COUNT};
use crate::layout::{build_layout, Layout, LayoutSpec};
use crate::projector::Pointer;
use crate::source::{spawn_landmark_source, SimInput};
use crate::visualizer::Visualizer;

/// Frames a pressed button stays highlighted.
pub const FLASH_FRAMES: u32 = 6;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub frame_width:     u32,
    pub frame_height:    u32,
    /// Pinch distance (pixels) at or below which a hover becomes a press.
    pub click_threshold: f32,
    /// Frames suppressed after each accepted click.
    pub lock_frames:     u32,
    /// Landmark indices whose pinch is tracked.
    pub tracked:         [usize; 2],
    pub layout:          LayoutSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            frame_width:     1280,
            frame_height:    720,
            click_threshold: CLICK_THRESHOLD,
            lock_frames:     LOCK_DURATION,
            tracked:         DEFAULT_TRACKED,
            layout:          LayoutSpec::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AppError::Config(format!(
                "frame size {}x{} must be non-zero", self.frame_width, self.frame_height
            )));
        }
        let (w, h) = (self.frame_width, self.frame_height);
        let layout = build_layout(&self.layout);
        if let Some(r) = layout.regions().iter().find(|r| !r.rect().fits_within(w, h)) {
            return Err(AppError::Config(format!(
                "button {:?} at {:?} does not fit a {}x{} frame", r.value(), r.rect(), w, h
            )));
        }
        if !layout.display().fits_within(w, h) {
            return Err(AppError::Config(format!(
                "display strip at {:?} does not fit a {}x{} frame", layout.display(), w, h
            )));
        }
        if self.click_threshold.is_nan() || self.click_threshold <= 0.0 {
            return Err(AppError::Config(format!(
                "click threshold {} must be positive", self.click_threshold
            )));
        }
        if self.lock_frames == 0 {
            return Err(AppError::Config("lock duration must be at least one frame".into()));
        }
        let [a, b] = self.tracked;
        if a == b || a >= LANDMARK_COUNT || b >= LANDMARK_COUNT {
            return Err(AppError::Config(format!(
                "tracked landmarks ({}, {}) must be two distinct indices below {}",
                a, b, LANDMARK_COUNT
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// A button being highlighted after a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flash {
    pub index:       usize,
    pub frames_left: u32,
}

pub struct AppState {
    calc:  Calculator,
    /// Most recent detector output; reused until a newer one arrives.
    frame: LandmarkFrame,
    last:  FrameOutcome,
    flash: Option<Flash>,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        AppState {
            calc:  Calculator::new(cfg),
            frame: LandmarkFrame::empty(),
            last:  FrameOutcome { pointer: Pointer::absent(), hovered: None, click: None },
            flash: None,
            status: "Ready: pinch over a button".to_string(),
        }
    }

    /// Replace the current detector output.
    pub fn handle_frame(&mut self, frame: LandmarkFrame) {
        self.frame = frame;
    }

    /// Take everything the source has sent, keeping the newest frame.
    /// Returns how many frames arrived; a source whose thread has ended is
    /// an error.
    pub fn drain(&mut self, rx: &Receiver<LandmarkFrame>) -> Result<usize, AppError> {
        let mut received = 0;
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    self.handle_frame(frame);
                    received += 1;
                }
                Err(TryRecvError::Empty) => return Ok(received),
                Err(TryRecvError::Disconnected) => {
                    return Err(AppError::Source("channel closed".into()));
                }
            }
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Advance one frame; returns the click accepted this frame, if any.
    pub fn tick(&mut self) -> Option<ClickEvent> {
        if let Some(f) = self.flash.as_mut() {
            f.frames_left = f.frames_left.saturating_sub(1);
            if f.frames_left == 0 { self.flash = None; }
        }

        let outcome = self.calc.advance(self.frame.first_hand());

        if let Some(ev) = &outcome.click {
            self.flash = Some(Flash { index: ev.index, frames_left: FLASH_FRAMES });
            self.status = format!("Pressed {}", ev.region.value());
        }

        let click = outcome.click.clone();
        self.last = outcome;
        click
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn layout(&self)     -> &Layout     { self.calc.layout() }
    pub fn expression(&self) -> &Expression { self.calc.expression() }
    pub fn pointer(&self)    -> &Pointer    { &self.last.pointer }
    pub fn hovered(&self)    -> Option<usize> { self.last.hovered }
    pub fn flash(&self)      -> Option<Flash> { self.flash }
    pub fn hand(&self)       -> Option<&Hand> { self.frame.first_hand() }

    /// Whether the current pointer is pinched within the click threshold.
    pub fn is_pressing(&self) -> bool {
        self.calc.debouncer().is_pressing(&self.last.pointer)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer and the landmark source (mouse simulation by
/// default, hardware with `--features leap`) and drives the
/// frame/render loop until `Esc` or the window closes.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;
    info!(
        width = cfg.frame_width,
        height = cfg.frame_height,
        threshold = cfg.click_threshold,
        lock_frames = cfg.lock_frames,
        "starting pinch calculator"
    );

    // ── Landmark source ───────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(not(feature = "leap"))]
    let frame_rx = spawn_landmark_source(crate::source::SimLandmarkSource::new(
        sim_rx, cfg.frame_width, cfg.frame_height,
    ));

    #[cfg(feature = "leap")]
    let frame_rx = {
        drop(sim_rx);
        spawn_landmark_source(crate::source::LeapLandmarkSource)
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx, cfg.frame_width as usize, cfg.frame_height as usize)?;

    let mut app = AppState::new(&cfg);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input; false means quit
        if !vis.poll_input() { break; }

        // 2. Keep the newest detector output
        if let Err(e) = app.drain(&frame_rx) {
            error!("{}", e);
            return Err(e);
        }

        // 3. One pipeline step
        app.tick();

        // 4. Render
        vis.render(&app)?;
    }

    info!(display = app.expression().text(), "quit");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
