use kb3d_core::Sign;
use kb3d_core::math::{root, sq};
use kb3d_core::vector::{Vector3, dot2, horizontal, sqnorm2, sub};

/// Vertical-speed-only resolution for the ownship.
///
/// Returns the new ownship vertical speed that puts the aircraft exactly `eps·H` apart when the
/// horizontal loss of separation starts (ownship still on the wrong side) or ends (ownship already
/// clear on the coordinated side). Horizontal velocity is unchanged.
pub fn vertical_speed(
    s: &Vector3,
    vo: &Vector3,
    vi: &Vector3,
    d: f64,
    h: f64,
    eps: Sign,
) -> Option<f64> {
    let v = sub(vo, vi);
    let s2 = horizontal(s);
    let v2 = horizontal(&v);
    let sz = s[2];
    let viz = vi[2];

    if v2 == [0.0, 0.0] {
        // No horizontal closure: holding the current vertical offset keeps separation.
        return Some(viz);
    }

    let a = sqnorm2(&v2);
    let b = 2.0 * dot2(&s2, &v2);
    let c = sqnorm2(&s2) - sq(d);

    let e = eps.value();
    let theta = if e * sz < h && sqnorm2(&s2) > sq(d) {
        root(a, b, c, Sign::Negative)?
    } else {
        root(a, b, c, Sign::Positive)?
    };
    if theta <= 0.0 {
        return None;
    }

    Some((e * h - sz) / theta + viz)
}
