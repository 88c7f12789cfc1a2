//! # calc_expr
//!
//! The button-driven side of the pinch calculator: an [`Expression`] that
//! accumulates button presses, and an arithmetic-only evaluator behind `=`.
//!
//! ## Button → edit mapping
//!
//! | Button | Effect |
//! |---|---|
//! | `0`–`9` `.` `+` `-` `*` `/` `(` `)` | Append (wipes a prior `error` first) |
//! | `^` | Append the power token `**` (wipes a prior `error` first) |
//! | `DEL` | Drop the last character; empty or `error` → reset |
//! | `CLEAR` | Reset |
//! | `=` | Evaluate; failure shows `error` until the next edit |
//!
//! ## Quick start
//!
//! ```rust
//! use calc_expr::{apply, Expression};
//!
//! let e = ["2", "^", "3", "+", "1", "="]
//!     .iter()
//!     .fold(Expression::new(), |e, v| apply(&e, v));
//! assert_eq!(e.text(), "9");
//! ```

pub mod engine;
pub mod eval;
pub mod number;

pub use engine::{apply, EditAction, Expression, ERROR_TEXT, POWER_TOKEN};
pub use eval::{evaluate, EvalError};
pub use number::Number;
