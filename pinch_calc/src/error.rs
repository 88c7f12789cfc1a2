//! Errors surfaced by the application shell.
//!
//! The calculator core has no fatal paths: a missing hand is a normal frame
//! and a bad expression becomes the `error` display.  Only the window, the
//! configuration or a lost landmark source can stop the program.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("landmark source stopped: {0}")]
    Source(String),
}
