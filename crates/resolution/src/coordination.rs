//! Sign rules that let both aircraft of an encounter pick compatible maneuvers independently.
//!
//! Each aircraft runs the same computation with itself as ownship. Swapping roles negates the
//! relative state, so every rule here either flips (vertical) or is preserved (horizontal) under
//! `s -> -s, v -> -v`, which is what makes the two independent answers compatible.

use kb3d_core::Sign;
use kb3d_core::vector::{Vector2, Vector3, det2, dot2};

/// Positional tie-break used when the vertical geometry is perfectly symmetric.
///
/// Favours the aircraft with negative relative x, then negative relative y.
pub fn break_symmetry(sx: f64, sy: f64) -> Sign {
    if sx < 0.0 || (sx == 0.0 && sy < 0.0) {
        Sign::Positive
    } else {
        Sign::Negative
    }
}

/// Vertical coordination sign: which side of the intruder the ownship should end up on.
///
/// Follows the relative altitude predicted at `time2los`, falling back to the current relative
/// altitude and then to [`break_symmetry`].
pub fn vertical_coordination(s: &Vector3, v: &Vector3, time2los: f64) -> Sign {
    let [sx, sy, sz] = *s;
    let pz = sz + time2los * v[2];
    if pz == 0.0 && sz == 0.0 {
        break_symmetry(sx, sy)
    } else if pz != 0.0 {
        Sign::of(pz)
    } else {
        Sign::of(sz)
    }
}

/// Horizontal coordination sign, `sign(sy·vx − sx·vy)`.
pub fn horizontal_coordination(s: &Vector2, v: &Vector2) -> Sign {
    Sign::of(s[1] * v[0] - s[0] * v[1])
}

/// Which of the two tangent lines through `s` the relative velocity `v` lies on.
///
/// Invariant along a line (scaling `v` by any non-zero factor keeps the value), and equal to
/// [`horizontal_coordination`] for approaching velocities.
pub fn eps_line(s: &Vector2, v: &Vector2) -> Sign {
    Sign::of(dot2(s, v) * det2(s, v))
}
