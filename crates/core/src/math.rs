//! Numerically safe scalar helpers and quadratic root selection.
//!
//! Discriminants that are mathematically non-negative can come out slightly negative after
//! floating-point cancellation, so the `safe_*` variants clamp their argument first.

use std::ops::Neg;

use serde::Serialize;

/// Two-valued sign used for branch selection and coordination.
///
/// Zero maps to [`Sign::Positive`]. Both aircraft of an encounter rely on this convention to
/// break ties identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Sign of `x`, with `x >= 0` (including `-0.0`) mapping to `Positive`.
    #[inline]
    pub fn of(x: f64) -> Self {
        if x >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// `+1.0` or `-1.0`.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        -self
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// Square.
#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// `+1.0` for `x >= 0`, `-1.0` otherwise.
#[inline]
pub fn sign(x: f64) -> f64 {
    Sign::of(x).value()
}

/// Square root of `max(x, 0)`.
#[inline]
pub fn safe_sqrt(x: f64) -> f64 {
    x.max(0.0).sqrt()
}

/// Arcsine with the argument clamped to `[-1, 1]`.
#[inline]
pub fn safe_asin(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

/// `atan2` that returns `0` when both arguments are exactly zero.
#[inline]
pub fn safe_atan2(y: f64, x: f64) -> f64 {
    if y == 0.0 && x == 0.0 {
        0.0
    } else {
        y.atan2(x)
    }
}

/// Discriminant `b² − 4ac`.
#[inline]
pub fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    sq(b) - 4.0 * a * c
}

/// Root `(−b + eps·√d) / 2a` of `a·x² + b·x + c = 0`.
///
/// Returns `None` when `a = 0` or the discriminant is negative.
pub fn root(a: f64, b: f64, c: f64, eps: Sign) -> Option<f64> {
    if a == 0.0 {
        return None;
    }
    let d = discriminant(a, b, c);
    if d < 0.0 {
        return None;
    }
    Some((-b + eps.value() * d.sqrt()) / (2.0 * a))
}
