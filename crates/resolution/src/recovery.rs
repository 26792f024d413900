use kb3d_core::Sign;
use kb3d_core::vector::Vector3;

use crate::coordination::break_symmetry;

// Keep going the way the vertical motion already separates the aircraft; otherwise stay on the
// current side.
fn recovery_side(sx: f64, sy: f64, sz: f64, vz: f64) -> Sign {
    if sz * vz >= 0.0 && vz != 0.0 {
        Sign::of(vz)
    } else if sz != 0.0 {
        Sign::of(sz)
    } else {
        break_symmetry(sx, sy)
    }
}

/// Vertical escape for aircraft already inside the protected volume.
///
/// Returns the ownship vertical speed that reaches `±h` relative altitude after `t`, or the
/// current ownship vertical speed when it already separates at least that fast. `t` must be
/// strictly positive.
pub fn vertical_recovery(s: &Vector3, voz: f64, viz: f64, h: f64, t: f64) -> Option<f64> {
    if !(t > 0.0) {
        return None;
    }
    let [sx, sy, sz] = *s;
    let vz = voz - viz;
    let nvz = (recovery_side(sx, sy, sz, vz).value() * h - sz) / t;
    if sz * vz >= 0.0 && vz.abs() >= nvz.abs() {
        Some(voz)
    } else {
        Some(nvz + viz)
    }
}
