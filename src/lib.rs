//! Pairwise aircraft conflict detection and resolution (KB3D).
//!
//! The detection and resolution engines live in their own crates and are unit agnostic. This
//! crate adds the aviation-unit façade in [`cdr`] and re-exports the supporting crates so the
//! binaries and tests share one entry point.

pub mod cdr;

pub use kb3d_config as config;
pub use kb3d_core::{Sign, constants, math, units, vector};
pub use kb3d_detection as detection;
pub use kb3d_export as export;
pub use kb3d_geodesy as geodesy;
pub use kb3d_resolution as resolution;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
