//! KB3D: coordinated conflict resolution for the ownship of a two-aircraft encounter.
//!
//! The intruder is assumed to hold its course. Coordination comes entirely from the sign rules in
//! [`coordination`], so two aircraft computing independently pick compatible maneuvers.

pub mod coordination;
pub mod horizontal;
pub mod recovery;
pub mod resolver;
pub mod vertical;

pub use horizontal::HorizontalSolution;
pub use recovery::vertical_recovery;
pub use resolver::{Coordination, Resolution, ResolutionMode, Resolver};
pub use vertical::vertical_speed;
