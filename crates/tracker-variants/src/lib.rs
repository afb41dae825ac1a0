//! The five scoring variants and a string-selectable tracker that erases
//! which one is running underneath.

pub mod correlation;
pub mod gaussian;
pub mod haste_correlation;
pub mod haste_correlation_star;
pub mod haste_difference;
pub mod haste_difference_star;

pub use correlation::Correlation;
pub use haste_correlation::HasteCorrelation;
pub use haste_correlation_star::HasteCorrelationStar;
pub use haste_difference::HasteDifference;
pub use haste_difference_star::HasteDifferenceStar;

use std::str::FromStr;
use tracker_core::PatchTracker;
use tracker_event::{EventUpdate, Scalar, Time, TrackerStatus};
use tracker_geom::hypothesis::OFFSETS_8NEIGH_2ROT;
use tracker_geom::Hypothesis;

/// The default hypothesis-set size: 8-neighbour + 2-rotation.
pub const HYPOTHESIS_SET_SIZE: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Correlation,
    HasteCorrelation,
    HasteCorrelationStar,
    HasteDifference,
    HasteDifferenceStar,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tracker kind {0:?}; expected one of correlation, haste_correlation, haste_correlation_star, haste_difference, haste_difference_star")]
pub struct ParseTrackerKindError(String);

impl FromStr for TrackerKind {
    type Err = ParseTrackerKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correlation" => Ok(Self::Correlation),
            "haste_correlation" => Ok(Self::HasteCorrelation),
            "haste_correlation_star" => Ok(Self::HasteCorrelationStar),
            "haste_difference" => Ok(Self::HasteDifference),
            "haste_difference_star" => Ok(Self::HasteDifferenceStar),
            other => Err(ParseTrackerKindError(other.to_string())),
        }
    }
}

/// Exhaustive dispatch over the five `PatchTracker<_, 11>` instantiations, so
/// callers that only know a `TrackerKind` at runtime can still hold one
/// tracker without boxing.
pub enum AnyPatchTracker {
    Correlation(PatchTracker<Correlation, HYPOTHESIS_SET_SIZE>),
    HasteCorrelation(PatchTracker<HasteCorrelation<HYPOTHESIS_SET_SIZE>, HYPOTHESIS_SET_SIZE>),
    HasteCorrelationStar(PatchTracker<HasteCorrelationStar, HYPOTHESIS_SET_SIZE>),
    HasteDifference(PatchTracker<HasteDifference, HYPOTHESIS_SET_SIZE>),
    HasteDifferenceStar(PatchTracker<HasteDifferenceStar<HYPOTHESIS_SET_SIZE>, HYPOTHESIS_SET_SIZE>),
}

impl AnyPatchTracker {
    pub fn new(kind: TrackerKind, t: Time, x: Scalar, y: Scalar, theta: Scalar) -> Self {
        let offsets = OFFSETS_8NEIGH_2ROT;
        match kind {
            TrackerKind::Correlation => {
                Self::Correlation(PatchTracker::new(t, x, y, theta, offsets, Correlation::new()))
            }
            TrackerKind::HasteCorrelation => Self::HasteCorrelation(PatchTracker::new(
                t,
                x,
                y,
                theta,
                offsets,
                HasteCorrelation::new(),
            )),
            TrackerKind::HasteCorrelationStar => Self::HasteCorrelationStar(PatchTracker::new(
                t,
                x,
                y,
                theta,
                offsets,
                HasteCorrelationStar::new(),
            )),
            TrackerKind::HasteDifference => Self::HasteDifference(PatchTracker::new(
                t,
                x,
                y,
                theta,
                offsets,
                HasteDifference::new(),
            )),
            TrackerKind::HasteDifferenceStar => Self::HasteDifferenceStar(PatchTracker::new(
                t,
                x,
                y,
                theta,
                offsets,
                HasteDifferenceStar::new(),
            )),
        }
    }

    pub fn push_event(&mut self, et: Time, ex: Scalar, ey: Scalar) -> EventUpdate {
        match self {
            Self::Correlation(t) => t.push_event(et, ex, ey),
            Self::HasteCorrelation(t) => t.push_event(et, ex, ey),
            Self::HasteCorrelationStar(t) => t.push_event(et, ex, ey),
            Self::HasteDifference(t) => t.push_event(et, ex, ey),
            Self::HasteDifferenceStar(t) => t.push_event(et, ex, ey),
        }
    }

    pub fn status(&self) -> TrackerStatus {
        match self {
            Self::Correlation(t) => t.status(),
            Self::HasteCorrelation(t) => t.status(),
            Self::HasteCorrelationStar(t) => t.status(),
            Self::HasteDifference(t) => t.status(),
            Self::HasteDifferenceStar(t) => t.status(),
        }
    }

    pub fn pose(&self) -> &Hypothesis {
        match self {
            Self::Correlation(t) => t.pose(),
            Self::HasteCorrelation(t) => t.pose(),
            Self::HasteCorrelationStar(t) => t.pose(),
            Self::HasteDifference(t) => t.pose(),
            Self::HasteDifferenceStar(t) => t.pose(),
        }
    }

    pub fn is_in_range(&self, ex: Scalar, ey: Scalar) -> bool {
        match self {
            Self::Correlation(t) => t.is_in_range(ex, ey),
            Self::HasteCorrelation(t) => t.is_in_range(ex, ey),
            Self::HasteCorrelationStar(t) => t.is_in_range(ex, ey),
            Self::HasteDifference(t) => t.is_in_range(ex, ey),
            Self::HasteDifferenceStar(t) => t.is_in_range(ex, ey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_cli_string() {
        for (s, kind) in [
            ("correlation", TrackerKind::Correlation),
            ("haste_correlation", TrackerKind::HasteCorrelation),
            ("haste_correlation_star", TrackerKind::HasteCorrelationStar),
            ("haste_difference", TrackerKind::HasteDifference),
            ("haste_difference_star", TrackerKind::HasteDifferenceStar),
        ] {
            assert_eq!(TrackerKind::from_str(s).unwrap(), kind);
        }
        assert!(TrackerKind::from_str("bogus").is_err());
    }

    #[test]
    fn any_tracker_starts_uninitialised_and_accepts_in_range_events() {
        let mut tracker = AnyPatchTracker::new(TrackerKind::Correlation, 0.0, 50.0, 50.0, 0.0);
        assert_eq!(tracker.status(), TrackerStatus::Uninitialised);
        let update = tracker.push_event(0.001, 50.0, 50.0);
        assert_eq!(update, EventUpdate::InitializingEvent);
    }

    /// A stream of identical-location events initialises on exactly the
    /// `K`-th call (a run of `InitializingEvent`s, then one `StateEvent`),
    /// and every subsequent event is a tied-score `RegularEvent`.
    #[test]
    fn initialisation_gate_fires_on_the_kth_event_then_stays_regular() {
        let mut tracker = AnyPatchTracker::new(TrackerKind::Correlation, 0.0, 100.0, 100.0, 0.0);
        for i in 1..tracker_core::EVENT_WINDOW_SIZE {
            let update = tracker.push_event(i as f64 * 1e-3, 100.0, 100.0);
            assert_eq!(update, EventUpdate::InitializingEvent, "event {i}");
        }
        let init_update = tracker.push_event(
            tracker_core::EVENT_WINDOW_SIZE as f64 * 1e-3,
            100.0,
            100.0,
        );
        assert_eq!(init_update, EventUpdate::StateEvent);
        assert_eq!(tracker.status(), TrackerStatus::Running);

        for i in 0..100 {
            let t = (tracker_core::EVENT_WINDOW_SIZE + 1 + i) as f64 * 1e-3;
            let update = tracker.push_event(t, 100.0, 100.0);
            assert_eq!(update, EventUpdate::RegularEvent, "post-init event {i}");
        }
    }
}
