//! # pinch_calc
//!
//! Hand-tracked virtual calculator.  A hand tracker reports fingertip
//! landmarks every frame; pinching the index and middle fingertips together
//! over an on-screen button presses it, and the presses drive the
//! [`calc_expr`] expression engine.
//!
//! ## Frame pipeline
//!
//! | Stage | Module | Output |
//! |---|---|---|
//! | Landmark source | [`source`] | [`landmarks::LandmarkFrame`] per frame |
//! | Projection | [`projector`] | pointer pixel + pinch distance |
//! | Hit-test | [`layout`] | region under the pointer |
//! | Debounce | [`debounce`] | at most one click per lock period |
//! | Edit | [`frame`] | updated [`calc_expr::Expression`] |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**, the mouse stands in for the hand.
//! * `leap`: **Hardware mode**, polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Move mouse | Move the fingertip midpoint |
//! | Hold left button | Pinch |
//! | `Escape` | Quit |

pub mod landmarks;
pub mod projector;
pub mod layout;
pub mod debounce;
pub mod frame;
pub mod source;
pub mod error;
pub mod visualizer;
pub mod app;
