//! Calibration and seed text I/O: the rad-tan camera model, its iterative
//! undistortion solver, and the comma/whitespace-delimited input formats a
//! batch run is configured from.

pub mod calibration;
pub mod camera;
pub mod errors;
pub mod seeds;

pub use calibration::load_calibration;
pub use camera::{PinholeRadTan, UndistortionMap};
pub use errors::{CalibrationError, SeedError};
pub use seeds::{load_seeds, parse_seed, TrackerSeed};
