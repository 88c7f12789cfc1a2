//! Calculator values.
//!
//! A value is either an integer or a float.  Integer arithmetic stays
//! integral and exact until an operation forces a float (true division,
//! negative exponents, or a float operand), which keeps `2+3` displaying as
//! `5` while `7/2` displays as `3.5` and `4/2` as `2.0`.  Integers are
//! unbounded up to [`MAX_INT_BITS`].

use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::eval::EvalError;

/// Largest integer magnitude, in bits, a result may reach (about 2466
/// decimal digits).  Keeps `9**9**9` from eating the machine.
pub const MAX_INT_BITS: u64 = 8192;

// ════════════════════════════════════════════════════════════════════════════
// Number
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl From<i64> for Number {
    fn from(i: i64) -> Self { Number::Int(BigInt::from(i)) }
}

impl Number {
    /// The value as a float.  Integers too large for `f64` overflow.
    pub fn as_f64(&self) -> Result<f64, EvalError> {
        match self {
            Number::Int(i) => i
                .to_f64()
                .filter(|f| f.is_finite())
                .ok_or(EvalError::Overflow),
            Number::Float(f) => Ok(*f),
        }
    }

    pub fn is_int(&self) -> bool { matches!(self, Number::Int(_)) }

    pub fn neg(self) -> Result<Number, EvalError> {
        match self {
            Number::Int(i)   => Ok(Number::Int(-i)),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => bounded(a + b),
            (a, b) => finite(a.as_f64()? + b.as_f64()?),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => bounded(a - b),
            (a, b) => finite(a.as_f64()? - b.as_f64()?),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => bounded(a * b),
            (a, b) => finite(a.as_f64()? * b.as_f64()?),
        }
    }

    /// True division: always a float.
    pub fn div(self, rhs: Number) -> Result<Number, EvalError> {
        let d = rhs.as_f64()?;
        if d == 0.0 { return Err(EvalError::DivisionByZero); }
        finite(self.as_f64()? / d)
    }

    /// Floor division (`//`): rounds the quotient toward negative infinity.
    pub fn floor_div(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(_), Number::Int(b)) if b.is_zero() => Err(EvalError::DivisionByZero),
            (Number::Int(a), Number::Int(b)) => {
                // `/` truncates and `%` takes the dividend's sign.
                let q = &a / &b;
                let r = &a % &b;
                if !r.is_zero() && r.is_negative() != b.is_negative() {
                    bounded(q - 1)
                } else {
                    bounded(q)
                }
            }
            (a, b) => {
                let d = b.as_f64()?;
                if d == 0.0 { return Err(EvalError::DivisionByZero); }
                finite((a.as_f64()? / d).floor())
            }
        }
    }

    /// Exponentiation (`**`).
    pub fn pow(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if !exp.is_negative() => int_pow(base, exp),
            (b, e) => {
                let base = b.as_f64()?;
                let exp  = e.as_f64()?;
                if base == 0.0 && exp < 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                if base < 0.0 && exp.fract() != 0.0 {
                    return Err(EvalError::Complex);
                }
                finite(base.powf(exp))
            }
        }
    }
}

/// `base ** exp` for a non-negative integer exponent.
fn int_pow(base: BigInt, exp: BigInt) -> Result<Number, EvalError> {
    // 0, 1 and -1 never grow, whatever the exponent.
    if base.bits() <= 1 {
        if exp.is_zero() { return Ok(Number::Int(BigInt::one())); }
        let odd = !(&exp % 2u32).is_zero();
        let r = if base.is_negative() && !odd { -base } else { base };
        return Ok(Number::Int(r));
    }

    // |base| >= 2, so the result has at least (bits - 1) * exp bits.
    let exp = exp.to_u64().filter(|&e| e <= MAX_INT_BITS).ok_or(EvalError::Overflow)?;
    if (base.bits() - 1).saturating_mul(exp) > MAX_INT_BITS {
        return Err(EvalError::Overflow);
    }
    let exp = u32::try_from(exp).map_err(|_| EvalError::Overflow)?;
    bounded(base.pow(exp))
}

fn bounded(i: BigInt) -> Result<Number, EvalError> {
    if i.bits() > MAX_INT_BITS { Err(EvalError::Overflow) } else { Ok(Number::Int(i)) }
}

fn finite(f: f64) -> Result<Number, EvalError> {
    if f.is_finite() { Ok(Number::Float(f)) } else { Err(EvalError::Overflow) }
}

// ════════════════════════════════════════════════════════════════════════════
// Display
// ════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i)   => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-tripping decimal for `x`.
///
/// Integral values keep a trailing `.0`; magnitudes outside
/// `1e-4 <= |x| < 1e16` switch to scientific notation with a signed,
/// at-least-two-digit exponent (`1e+16`, `2.5e-05`).
pub fn format_float(x: f64) -> String {
    if x.is_nan()      { return "nan".to_string(); }
    if x.is_infinite() { return if x > 0.0 { "inf" } else { "-inf" }.to_string(); }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` gives the shortest digits, e.g. "-1.2345e3".
    let sci = format!("{:e}", x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None         => (sci.as_str(), 0),
    };
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut out = String::new();
    if negative { out.push('-'); }

    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.push_str(&"0".repeat(int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat((-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.abs()));
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
