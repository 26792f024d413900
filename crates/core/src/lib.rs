//! Core units, constants, and shared numeric primitives for the KB3D workspace.

pub mod math;

pub use math::Sign;

/// Constants shared across crates. Distances in metres, times in seconds unless stated otherwise.
pub mod constants {
    /// Minimum time treated as a strictly positive time to closest approach (s).
    pub const TAU_MIN: f64 = 1.0e-4;
    /// WGS-84 semi-major axis (m).
    pub const WGS84_A: f64 = 6_378_137.0;
    /// WGS-84 flattening.
    pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
    /// Metres per international nautical mile.
    pub const METERS_PER_NM: f64 = 1_852.0;
    /// Metres per international foot.
    pub const METERS_PER_FT: f64 = 0.3048;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Seconds per minute.
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Aviation ↔ SI unit conversion helpers.
pub mod units {
    use super::constants::{METERS_PER_FT, METERS_PER_NM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

    /// Convert nautical miles to metres.
    #[inline]
    pub fn nm_to_m(v: f64) -> f64 {
        v * METERS_PER_NM
    }

    /// Convert metres to nautical miles.
    #[inline]
    pub fn m_to_nm(v: f64) -> f64 {
        v / METERS_PER_NM
    }

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * METERS_PER_FT
    }

    /// Convert metres to feet.
    #[inline]
    pub fn m_to_ft(v: f64) -> f64 {
        v / METERS_PER_FT
    }

    /// Convert knots to metres per second.
    #[inline]
    pub fn knots_to_ms(v: f64) -> f64 {
        v * METERS_PER_NM / SECONDS_PER_HOUR
    }

    /// Convert metres per second to knots.
    #[inline]
    pub fn ms_to_knots(v: f64) -> f64 {
        v * SECONDS_PER_HOUR / METERS_PER_NM
    }

    /// Convert feet per minute to metres per second.
    #[inline]
    pub fn fpm_to_ms(v: f64) -> f64 {
        v * METERS_PER_FT / SECONDS_PER_MINUTE
    }

    /// Convert metres per second to feet per minute.
    #[inline]
    pub fn ms_to_fpm(v: f64) -> f64 {
        v * SECONDS_PER_MINUTE / METERS_PER_FT
    }

    /// Normalise an angle in degrees to `[0, 360)`.
    #[inline]
    pub fn normalize_deg(deg: f64) -> f64 {
        let wrapped = deg.rem_euclid(360.0);
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
///
/// X points East, Y points North, Z points up.
pub mod vector {
    /// Alias for a 3D vector in metres or m/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Horizontal component of a 3D vector.
    pub type Vector2 = [f64; 2];

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Horizontal projection.
    #[inline]
    pub fn horizontal(v: &Vector3) -> Vector2 {
        [v[0], v[1]]
    }

    /// Planar dot product.
    #[inline]
    pub fn dot2(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[0] + a[1] * b[1]
    }

    /// Planar determinant `a.x * b.y - a.y * b.x`.
    #[inline]
    pub fn det2(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[1] - a[1] * b[0]
    }

    /// Squared planar norm.
    #[inline]
    pub fn sqnorm2(v: &Vector2) -> f64 {
        dot2(v, v)
    }

    /// Planar norm.
    #[inline]
    pub fn norm2(v: &Vector2) -> f64 {
        sqnorm2(v).sqrt()
    }

    /// Planar addition.
    #[inline]
    pub fn add2(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] + b[0], a[1] + b[1]]
    }

    /// Planar subtraction.
    #[inline]
    pub fn sub2(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Planar scaling.
    #[inline]
    pub fn scale2(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }
}
