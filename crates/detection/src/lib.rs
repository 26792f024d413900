//! CD3D: three-dimensional conflict detection between two aircraft.

pub mod detector;
pub mod volume;

pub use detector::{Detection, Detector, LossTiming};
pub use volume::{ProtectedVolume, VolumeError};
