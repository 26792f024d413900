//! Coordinated horizontal resolutions: ground speed only, track only, and optimal track+speed.
//!
//! All solvers work in the intruder-centred horizontal plane. A relative velocity resolves the
//! conflict when it lies on one of the two lines through `s` tangent to the circle of radius D;
//! the coordination sign selects the line.

use kb3d_core::Sign;
use kb3d_core::constants::TAU_MIN;
use kb3d_core::math::{root, safe_atan2, sq};
use kb3d_core::vector::{Vector2, add2, det2, dot2, norm2, scale2, sqnorm2, sub2};
use log::debug;
use serde::Serialize;

use crate::coordination::eps_line;

/// A resolved ownship horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalSolution {
    /// New ownship ground velocity (East, North).
    pub velocity: Vector2,
    /// Tangent line the resulting relative velocity lies on.
    pub side: Sign,
}

impl HorizontalSolution {
    /// Track angle in radians, true north clockwise, in `(-π, π]`.
    pub fn track(&self) -> f64 {
        safe_atan2(self.velocity[0], self.velocity[1])
    }

    pub fn ground_speed(&self) -> f64 {
        norm2(&self.velocity)
    }
}

/// Tangent point on the circle of radius `d` seen from `s`, on side `eps`, together with the
/// tangent length `sqrt(|s|² − d²)`. `None` when `s` is not strictly outside the circle.
pub fn tangent_point(s: &Vector2, d: f64, eps: Sign) -> Option<(Vector2, f64)> {
    let n = sqnorm2(s);
    let r2 = n - sq(d);
    if r2 <= 0.0 {
        return None;
    }
    let r = r2.sqrt();
    let alpha = sq(d) / n;
    let beta = d * r / n;
    let e = eps.value();
    let q = [alpha * s[0] + e * beta * s[1], alpha * s[1] - e * beta * s[0]];
    Some((q, r))
}

/// Ground-speed-only resolution: scale the ownship velocity, keep its track.
pub fn ground_speed(
    s: &Vector2,
    vo: &Vector2,
    vi: &Vector2,
    d: f64,
    eps: Sign,
) -> Option<HorizontalSolution> {
    // Tangency of k·vo − vi: (s × v')² = D²|v'|², quadratic in k.
    let co = det2(s, vo);
    let ci = det2(s, vi);
    let a = sq(co) - sq(d) * sqnorm2(vo);
    let b = 2.0 * (sq(d) * dot2(vo, vi) - co * ci);
    let c = sq(ci) - sq(d) * sqnorm2(vi);

    for side in [eps, -eps] {
        for branch in [side, -side] {
            let Some(k) = root(a, b, c, branch) else {
                continue;
            };
            if k <= 0.0 {
                continue;
            }
            let velocity = scale2(vo, k);
            if eps_line(s, &sub2(&velocity, vi)) == side {
                if side != eps {
                    debug!("ground speed resolved on mirrored side {side:?}");
                }
                return Some(HorizontalSolution { velocity, side });
            }
        }
    }
    None
}

/// Track-only resolution: rotate the ownship velocity, keep its ground speed.
pub fn track(
    s: &Vector2,
    vo: &Vector2,
    vi: &Vector2,
    d: f64,
    eps: Sign,
) -> Option<HorizontalSolution> {
    let (q, r) = tangent_point(s, d, eps)?;
    let w = scale2(&sub2(&q, s), 1.0 / r);
    debug_assert!((sqnorm2(&w) - 1.0).abs() < 1e-9);

    // |vi + t·w|² = |vo|² with |w| = 1.
    let b = 2.0 * dot2(vi, &w);
    let c = sqnorm2(vi) - sqnorm2(vo);

    let mut best: Option<(bool, f64, Vector2)> = None;
    for branch in [Sign::Negative, Sign::Positive] {
        let Some(t) = root(1.0, b, c, branch) else {
            continue;
        };
        if t == 0.0 {
            continue;
        }
        let rel = scale2(&w, t);
        let tau = -dot2(s, &rel) / sqnorm2(&rel);
        let velocity = add2(vi, &rel);
        let candidate = (tau > TAU_MIN, dot2(&velocity, vo), velocity);
        best = match best {
            Some(current) if (current.0, current.1) >= (candidate.0, candidate.1) => Some(current),
            _ => Some(candidate),
        };
    }

    let (approaching, _, velocity) = best?;
    if !approaching {
        debug!("track resolution only available moving away from the tangent point");
    }
    if eps_line(s, &sub2(&velocity, vi)) != eps {
        return None;
    }
    Some(HorizontalSolution {
        velocity,
        side: eps,
    })
}

/// Optimal resolution: the smallest change of ownship velocity that reaches the tangent line.
pub fn optimal(
    s: &Vector2,
    vo: &Vector2,
    vi: &Vector2,
    d: f64,
    eps: Sign,
) -> Option<HorizontalSolution> {
    let v = sub2(vo, vi);

    if sqnorm2(s) == sq(d) {
        // Zero contact time: both tangent lines collapse onto the one perpendicular to `s`, so the
        // coordinated side is kept as is.
        let u = scale2(&[s[1], -s[0]], 1.0 / d);
        let rel = scale2(&u, dot2(&v, &u));
        return Some(HorizontalSolution {
            velocity: add2(&rel, vi),
            side: eps,
        });
    }

    for side in [eps, -eps] {
        let (q, _) = tangent_point(s, d, side)?;
        let to_target = sub2(&q, s);
        let closing = dot2(&to_target, &v);
        if closing <= 0.0 {
            continue;
        }
        let contact_time = sqnorm2(&to_target) / closing;
        let rel = scale2(&to_target, 1.0 / contact_time);

        if eps_line(s, &rel) == side {
            if side != eps {
                debug!("optimal resolved on mirrored side {side:?}");
            }
            return Some(HorizontalSolution {
                velocity: add2(&rel, vi),
                side,
            });
        }
    }
    None
}
