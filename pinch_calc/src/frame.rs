//! Per-frame pipeline: hand → pointer → debounced click → expression edit.
//!
//! [`Calculator::advance`] is the only mutation point for the debouncer and
//! the expression.  The run loop calls it exactly once per camera frame.

use calc_expr::{apply, Expression};
use tracing::info;

use crate::app::AppConfig;
use crate::debounce::{ClickDebouncer, ClickEvent};
use crate::landmarks::Hand;
use crate::layout::{build_layout, Layout};
use crate::projector::{project, Pointer};

/// What happened during one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutcome {
    pub pointer: Pointer,
    /// Region under the pointer, whether or not it was pressed.
    pub hovered: Option<usize>,
    pub click:   Option<ClickEvent>,
}

pub struct Calculator {
    layout:     Layout,
    debouncer:  ClickDebouncer,
    expression: Expression,
    width:      u32,
    height:     u32,
    tracked:    [usize; 2],
}

impl Calculator {
    pub fn new(cfg: &AppConfig) -> Self {
        Calculator {
            layout:     build_layout(&cfg.layout),
            debouncer:  ClickDebouncer::new(cfg.click_threshold, cfg.lock_frames),
            expression: Expression::new(),
            width:      cfg.frame_width,
            height:     cfg.frame_height,
            tracked:    cfg.tracked,
        }
    }

    /// Run one frame of the pipeline for the first detected hand (if any).
    pub fn advance(&mut self, hand: Option<&Hand>) -> FrameOutcome {
        let pointer = project(hand, self.width, self.height, self.tracked);
        let hovered = self.layout.hit_index(pointer.point);
        let click   = self.debouncer.advance(&pointer, &self.layout);

        if let Some(ev) = &click {
            self.expression = apply(&self.expression, ev.region.value());
            info!(
                button  = ev.region.value(),
                display = self.expression.text(),
                error   = self.expression.is_error(),
                "click"
            );
        }

        FrameOutcome { pointer, hovered, click }
    }

    pub fn layout(&self)     -> &Layout         { &self.layout }
    pub fn debouncer(&self)  -> &ClickDebouncer { &self.debouncer }
    pub fn expression(&self) -> &Expression     { &self.expression }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
