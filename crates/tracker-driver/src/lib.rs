//! Driving one or more trackers across an event stream: dataset loading,
//! per-seed initialisation policy, the left-field-of-view stopping
//! predicate, and trail output.

pub mod dataset;
pub mod init;
pub mod run;
pub mod stop;

pub use dataset::{load_events, undistort_events};
pub use init::{initialise, seed_index, InitPolicy};
pub use run::{run_tracker, write_trail, TrailEntry};
pub use stop::left_field_of_view;
