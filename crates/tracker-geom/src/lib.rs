//! Fixed-size patch arithmetic: bilinear interpolation, the square patch
//! wrapper, and rigid-body pose hypotheses.

pub mod hypothesis;
pub mod interpolator;
pub mod patch;

pub use hypothesis::{Hypothesis, Offset, DELTA_THETA, OFFSETS_4NEIGH_2ROT, OFFSETS_8NEIGH_2ROT};
pub use patch::{Patch, PatchData, PATCH_HALF, PATCH_SIZE};

pub use tracker_event::Scalar;
