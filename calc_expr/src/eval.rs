//! Arithmetic-only evaluator.
//!
//! The display text is built from individually harmless button presses but
//! evaluated as one string, so nothing outside this grammar is accepted:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/' | '//') factor)*
//! factor  := ('+' | '-') factor | power
//! power   := primary ('**' factor)?
//! primary := NUMBER | '(' expr ')'
//! NUMBER  := DIGITS ('.' DIGITS?)? EXP? | '.' DIGITS EXP?
//! EXP     := ('e' | 'E') ('+' | '-')? DIGITS
//! ```
//!
//! No button types `e`; exponents only appear in results shown after `=`
//! (`1e-05`), which may then be extended and evaluated again.
//!
//! `**` is right-associative and binds tighter than a unary sign on its
//! left, so `-2**2 == -4` while `2**-1 == 0.5`.

use num_bigint::BigInt;
use thiserror::Error;

use crate::number::{Number, MAX_INT_BITS};

/// Maximum nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 256;

// ════════════════════════════════════════════════════════════════════════════
// EvalError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character {ch:?} at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("malformed number {0:?}")]
    MalformedNumber(String),

    #[error("unexpected {found} at offset {pos}")]
    UnexpectedToken { found: &'static str, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expression nested deeper than {}", MAX_DEPTH)]
    TooDeep,

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow")]
    Overflow,

    #[error("result is not a real number")]
    Complex,
}

// ════════════════════════════════════════════════════════════════════════════
// Tokenizer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> &'static str {
        match self {
            Token::Num(_)     => "number",
            Token::Plus       => "'+'",
            Token::Minus      => "'-'",
            Token::Star       => "'*'",
            Token::StarStar   => "'**'",
            Token::Slash      => "'/'",
            Token::SlashSlash => "'//'",
            Token::LParen     => "'('",
            Token::RParen     => "')'",
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, EvalError> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let tok = match c {
            b' ' | b'\t' => { i += 1; continue; }
            b'+' => { i += 1; Token::Plus }
            b'-' => { i += 1; Token::Minus }
            b'(' => { i += 1; Token::LParen }
            b')' => { i += 1; Token::RParen }
            b'*' if bytes.get(i + 1) == Some(&b'*') => { i += 2; Token::StarStar }
            b'*' => { i += 1; Token::Star }
            b'/' if bytes.get(i + 1) == Some(&b'/') => { i += 2; Token::SlashSlash }
            b'/' => { i += 1; Token::Slash }
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
                    i += 1;
                    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) { i += 1; }
                    while i < bytes.len() && bytes[i].is_ascii_digit() { i += 1; }
                }
                Token::Num(parse_number(&src[start..i])?)
            }
            _ => {
                // Report the full character, not a UTF-8 fragment.
                let ch = src[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(EvalError::UnexpectedChar { ch, pos: start });
            }
        };
        out.push((tok, start));
    }
    Ok(out)
}

/// Parse one literal: digits with at most one `.`, then an optional exponent.
fn parse_number(lit: &str) -> Result<Number, EvalError> {
    let malformed = || EvalError::MalformedNumber(lit.to_string());

    let (mantissa, exponent) = match lit.find(['e', 'E']) {
        Some(at) => (&lit[..at], Some(&lit[at + 1..])),
        None     => (lit, None),
    };
    let dots = mantissa.bytes().filter(|&b| b == b'.').count();

    if dots > 1 || !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if digits.is_empty() {
            return Err(malformed());
        }
    }

    if dots == 0 && exponent.is_none() {
        // Decimal integers may not carry leading zeros ("07"), though "00" is fine.
        if lit.len() > 1 && lit.starts_with('0') && lit.bytes().any(|b| b != b'0') {
            return Err(malformed());
        }
        let i = lit.parse::<BigInt>().map_err(|_| malformed())?;
        if i.bits() > MAX_INT_BITS {
            return Err(EvalError::Overflow);
        }
        return Ok(Number::Int(i));
    }

    match lit.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Number::Float(f)),
        Ok(_)  => Err(EvalError::Overflow),
        Err(_) => Err(malformed()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Parser
// ════════════════════════════════════════════════════════════════════════════

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos:    usize,
    depth:  usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<(Token, usize)> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() { self.pos += 1; }
        t
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH { Err(EvalError::TooDeep) } else { Ok(()) }
    }

    fn leave(&mut self) { self.depth -= 1; }

    fn expr(&mut self) -> Result<Number, EvalError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus)  => { self.pos += 1; acc = acc.add(self.term()?)?; }
                Some(Token::Minus) => { self.pos += 1; acc = acc.sub(self.term()?)?; }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Number, EvalError> {
        let mut acc = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star)       => { self.pos += 1; acc = acc.mul(self.factor()?)?; }
                Some(Token::Slash)      => { self.pos += 1; acc = acc.div(self.factor()?)?; }
                Some(Token::SlashSlash) => { self.pos += 1; acc = acc.floor_div(self.factor()?)?; }
                _ => return Ok(acc),
            }
        }
    }

    fn factor(&mut self) -> Result<Number, EvalError> {
        match self.peek() {
            Some(Token::Plus) | Some(Token::Minus) => {
                let negate = self.peek() == Some(&Token::Minus);
                self.pos += 1;
                self.enter()?;
                let v = self.factor()?;
                self.leave();
                if negate { v.neg() } else { Ok(v) }
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::StarStar) {
            self.pos += 1;
            self.enter()?;
            let exp = self.factor()?;
            self.leave();
            return base.pow(exp);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Number, EvalError> {
        match self.bump() {
            Some((Token::Num(n), _)) => Ok(n),
            Some((Token::LParen, _)) => {
                self.enter()?;
                let v = self.expr()?;
                self.leave();
                match self.bump() {
                    Some((Token::RParen, _)) => Ok(v),
                    Some((t, pos)) => Err(EvalError::UnexpectedToken { found: t.describe(), pos }),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some((t, pos)) => Err(EvalError::UnexpectedToken { found: t.describe(), pos }),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

/// Evaluate `src` as an arithmetic expression.
pub fn evaluate(src: &str) -> Result<Number, EvalError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut p = Parser { tokens, pos: 0, depth: 0 };
    let v = p.expr()?;
    match p.bump() {
        None => Ok(v),
        Some((t, pos)) => Err(EvalError::UnexpectedToken { found: t.describe(), pos }),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn show(src: &str) -> String {
        evaluate(src).map(|n| n.to_string()).unwrap_or_else(|e| format!("ERR {}", e))
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(show("2+3*4"), "14");
        assert_eq!(show("(2+3)*4"), "20");
        assert_eq!(show("10-4-3"), "3");
        assert_eq!(show("2**3**2"), "512");
        assert_eq!(show("-2**2"), "-4");
        assert_eq!(show("2**-1"), "0.5");
        assert_eq!(show("--3"), "3");
        assert_eq!(show("+4"), "4");
    }

    #[test]
    fn division_forms() {
        assert_eq!(show("7/2"), "3.5");
        assert_eq!(show("8/2"), "4.0");
        assert_eq!(show("7//2"), "3");
        assert_eq!(show("-7//2"), "-4");
        assert_eq!(evaluate("5/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5//0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(show("1.5+1.5"), "3.0");
        assert_eq!(show(".5*2"), "1.0");
        assert_eq!(show("5.+1"), "6.0");
        assert_eq!(show("0.1+0.2"), "0.30000000000000004");
        assert_eq!(show("00"), "0");
        assert_eq!(show("00.5"), "0.5");
    }

    #[test]
    fn malformed_numbers() {
        assert!(matches!(evaluate("1.2.3"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(evaluate("07"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(evaluate("."), Err(EvalError::MalformedNumber(_))));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(evaluate("2+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(2"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(evaluate("2)"), Err(EvalError::UnexpectedToken { found: "')'", .. })));
        assert!(matches!(evaluate("2(3)"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("()"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("2***3"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("*2"), Err(EvalError::UnexpectedToken { .. })));
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("   "), Err(EvalError::Empty));
    }

    #[test]
    fn rejects_non_arithmetic_text() {
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(EvalError::UnexpectedChar { ch: '_', pos: 0 })
        ));
        assert!(matches!(evaluate("2^3"), Err(EvalError::UnexpectedChar { ch: '^', .. })));
        assert!(matches!(evaluate("e5"), Err(EvalError::UnexpectedChar { ch: 'e', .. })));
        assert!(matches!(evaluate("2%3"), Err(EvalError::UnexpectedChar { ch: '%', .. })));
        assert!(matches!(evaluate("2×3"), Err(EvalError::UnexpectedChar { ch: '×', .. })));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let src = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&src), Err(EvalError::TooDeep));

        let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(show(&ok), "1");

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&signs), Err(EvalError::TooDeep));
    }

    #[test]
    fn exponent_literals() {
        assert_eq!(show("1e-05*2"), "2e-05");
        assert_eq!(show("1e+16*2"), "2e+16");
        assert_eq!(show("2.5E3"), "2500.0");
        assert_eq!(show("1e5"), "100000.0");
        assert!(matches!(evaluate("1e"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(evaluate("1e+"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(evaluate(".e5"), Err(EvalError::MalformedNumber(_))));
        assert_eq!(evaluate("1e999"), Err(EvalError::Overflow));
    }

    #[test]
    fn big_integers() {
        assert_eq!(show("2**64"), "18446744073709551616");
        assert_eq!(show("99999999999999999999+1"), "100000000000000000000");
        assert_eq!(show("9**99//9**98"), "9");
        assert_eq!(evaluate(&"9".repeat(3000)), Err(EvalError::Overflow));
    }

    #[test]
    fn overflow_and_complex() {
        assert_eq!(evaluate("9**9**9"), Err(EvalError::Overflow));
        assert_eq!(evaluate("(-8)**(1/3)"), Err(EvalError::Complex));
        assert_eq!(evaluate("0**-1"), Err(EvalError::DivisionByZero));
    }
}
