//! Expression engine: maps button values onto edits of the display text.
//!
//! The engine is a pure state transition: `Expression` in, `Expression` out.
//! A failed evaluation leaves the sentinel text [`ERROR_TEXT`] with the error
//! flag set; the next append-style edit wipes it before applying itself.

use tracing::{debug, warn};

use crate::eval::evaluate;

/// Text shown after a failed evaluation.
pub const ERROR_TEXT: &str = "error";

/// What the `^` button appends.
pub const POWER_TOKEN: &str = "**";

// ════════════════════════════════════════════════════════════════════════════
// EditAction
// ════════════════════════════════════════════════════════════════════════════

/// An accepted button press, decoded from its symbolic value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Digit, `.`, `+`, `-`, `*`, `/`, `(` or `)`.
    Append(char),
    /// `^`: append the power token.
    Power,
    /// `DEL`: drop the last character.
    Delete,
    /// `CLEAR`: reset unconditionally.
    Clear,
    /// `=`: evaluate the text.
    Evaluate,
}

impl EditAction {
    /// Decode a button value.  Returns `None` for anything outside the
    /// calculator's button set.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "DEL"   => Some(EditAction::Delete),
            "CLEAR" => Some(EditAction::Clear),
            "="     => Some(EditAction::Evaluate),
            "^"     => Some(EditAction::Power),
            _ => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if is_appendable(c) => Some(EditAction::Append(c)),
                    _ => None,
                }
            }
        }
    }
}

fn is_appendable(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')')
}

// ════════════════════════════════════════════════════════════════════════════
// Expression
// ════════════════════════════════════════════════════════════════════════════

/// The accumulated display text plus the "last evaluation failed" flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expression {
    text:  String,
    error: bool,
}

impl Expression {
    pub fn new() -> Self { Self::default() }

    /// An expression holding `text`, not in the error state.
    pub fn with_text(text: &str) -> Self {
        Expression { text: text.to_string(), error: false }
    }

    /// The sentinel state left by a failed evaluation.
    pub fn errored() -> Self {
        Expression { text: ERROR_TEXT.to_string(), error: true }
    }

    /// Text for the display strip.
    pub fn text(&self)     -> &str { &self.text }
    pub fn is_error(&self) -> bool { self.error }

    /// Apply one edit, returning the new state.
    pub fn apply(&self, action: EditAction) -> Expression {
        match action {
            EditAction::Clear => Expression::new(),

            EditAction::Delete => {
                if self.error || self.text.is_empty() {
                    Expression::new()
                } else {
                    let mut text = self.text.clone();
                    text.pop();
                    Expression { text, error: false }
                }
            }

            EditAction::Evaluate => {
                if self.error || self.text.is_empty() {
                    return Expression::new();
                }
                match evaluate(&self.text) {
                    Ok(n) => {
                        let text = n.to_string();
                        debug!(input = %self.text, result = %text, "evaluated");
                        Expression { text, error: false }
                    }
                    Err(e) => {
                        debug!(input = %self.text, error = %e, "evaluation failed");
                        Expression::errored()
                    }
                }
            }

            EditAction::Power     => self.appended(POWER_TOKEN),
            EditAction::Append(c) => self.appended(&c.to_string()),
        }
    }

    fn appended(&self, s: &str) -> Expression {
        let mut text = if self.error { String::new() } else { self.text.clone() };
        text.push_str(s);
        Expression { text, error: false }
    }
}

/// Apply a raw button value.  Unknown values leave the expression unchanged.
pub fn apply(expr: &Expression, value: &str) -> Expression {
    match EditAction::from_value(value) {
        Some(action) => expr.apply(action),
        None => {
            warn!(value, "ignoring unknown button value");
            expr.clone()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: &Expression, presses: &[&str]) -> Expression {
        presses.iter().fold(start.clone(), |e, v| apply(&e, v))
    }

    // ── decoding ─────────────────────────────────────────────────────────
    #[test]
    fn decodes_button_values() {
        assert_eq!(EditAction::from_value("7"),     Some(EditAction::Append('7')));
        assert_eq!(EditAction::from_value("("),     Some(EditAction::Append('(')));
        assert_eq!(EditAction::from_value("^"),     Some(EditAction::Power));
        assert_eq!(EditAction::from_value("DEL"),   Some(EditAction::Delete));
        assert_eq!(EditAction::from_value("CLEAR"), Some(EditAction::Clear));
        assert_eq!(EditAction::from_value("="),     Some(EditAction::Evaluate));
        assert_eq!(EditAction::from_value("x"),     None);
        assert_eq!(EditAction::from_value("77"),    None);
        assert_eq!(EditAction::from_value(""),      None);
    }

    #[test]
    fn unknown_value_is_a_no_op() {
        let e = Expression::with_text("12");
        assert_eq!(apply(&e, "sqrt"), e);
    }

    // ── CLEAR ────────────────────────────────────────────────────────────
    #[test]
    fn clear_from_any_state() {
        for start in [Expression::new(), Expression::with_text("1+2"), Expression::errored()] {
            assert_eq!(apply(&start, "CLEAR"), Expression::new());
        }
    }

    // ── = ────────────────────────────────────────────────────────────────
    #[test]
    fn evaluate_empty_is_no_op() {
        assert_eq!(apply(&Expression::new(), "="), Expression::new());
    }

    #[test]
    fn evaluate_sum() {
        assert_eq!(apply(&Expression::with_text("2+3"), "="), Expression::with_text("5"));
    }

    #[test]
    fn evaluate_division_by_zero_sets_error() {
        let e = apply(&Expression::with_text("5/0"), "=");
        assert_eq!(e.text(), "error");
        assert!(e.is_error());
    }

    #[test]
    fn evaluate_in_error_state_clears() {
        assert_eq!(apply(&Expression::errored(), "="), Expression::new());
    }

    #[test]
    fn evaluate_malformed_sets_error() {
        assert_eq!(apply(&Expression::with_text("2+*3"), "="), Expression::errored());
        assert_eq!(apply(&Expression::with_text("((2)"), "="), Expression::errored());
    }

    // ── appends ──────────────────────────────────────────────────────────
    #[test]
    fn digit_after_error_starts_fresh() {
        assert_eq!(apply(&Expression::errored(), "7"), Expression::with_text("7"));
        assert_eq!(apply(&Expression::errored(), "("), Expression::with_text("("));
    }

    #[test]
    fn power_appends_token() {
        assert_eq!(apply(&Expression::with_text("2"), "^"), Expression::with_text("2**"));
        assert_eq!(apply(&Expression::errored(), "^"), Expression::with_text("**"));
    }

    #[test]
    fn power_is_evaluated_as_exponent() {
        let e = run(&Expression::new(), &["2", "^", "1", "0", "="]);
        assert_eq!(e.text(), "1024");
    }

    // ── DEL ──────────────────────────────────────────────────────────────
    #[test]
    fn delete_drops_last_char() {
        assert_eq!(apply(&Expression::with_text("12"), "DEL"), Expression::with_text("1"));
        assert_eq!(apply(&Expression::new(), "DEL"), Expression::new());
        assert_eq!(apply(&Expression::errored(), "DEL"), Expression::new());
    }

    #[test]
    fn delete_after_power_leaves_single_star() {
        let e = run(&Expression::with_text("2"), &["^", "DEL"]);
        assert_eq!(e.text(), "2*");
    }

    // ── sequences ────────────────────────────────────────────────────────
    #[test]
    fn result_can_be_extended() {
        let e = run(&Expression::new(), &["1", "/", "4", "=", "*", "2", "="]);
        assert_eq!(e.text(), "0.5");
    }

    #[test]
    fn exponent_form_result_can_be_extended() {
        let e = run(&Expression::new(), &["1", "/", "1", "0", "0", "0", "0", "0", "="]);
        assert_eq!(e.text(), "1e-05");
        let e = run(&e, &["*", "2", "="]);
        assert_eq!(e, Expression::with_text("2e-05"));
    }

    #[test]
    fn large_integers_stay_exact() {
        assert_eq!(
            apply(&Expression::with_text("2**64"), "="),
            Expression::with_text("18446744073709551616"),
        );
        let e = run(&Expression::with_text("99999999999999999999"), &["+", "1", "="]);
        assert_eq!(e.text(), "100000000000000000000");
    }

    #[test]
    fn error_text_is_never_extended() {
        let e = run(&Expression::new(), &["5", "/", "0", "=", "+", "1"]);
        assert_eq!(e, Expression::with_text("+1"));
    }
}
