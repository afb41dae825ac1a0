//! Per-feature initialisation policies: fill a fresh tracker's event window
//! from a seed time either purely forward ("regular") or by first walking
//! backward for half the window then forward ("centered").
//!
//! `original_source`'s two initialisation functions are named the other way
//! around from their own CLI-flag-driven behaviour (`initializeTrackerCentered`
//! is the pure forward scan; `initializeTrackerRegular` is the backward+forward
//! one). This module follows the semantic names below, not the original's.

use tracker_calib::TrackerSeed;
use tracker_event::{Event, EventUpdate, TrackerStatus};
use tracker_variants::AnyPatchTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPolicy {
    Regular,
    Centered,
}

/// Index of the first event with `t >= seed.t`, assuming `events` is sorted
/// by time (as an event stream always is).
pub fn seed_index(events: &[Event], seed: &TrackerSeed) -> usize {
    events.partition_point(|e| e.t < seed.t)
}

/// Walk backward from `seed_idx` (inclusive of index 0 — see module docs),
/// collecting up to `limit` events that land in the tracker's patch radius.
/// Returned in chronological order.
fn collect_backward(tracker: &AnyPatchTracker, events: &[Event], seed_idx: usize, limit: usize) -> Vec<usize> {
    let mut collected = Vec::with_capacity(limit);
    let mut i = seed_idx;
    while i > 0 && collected.len() < limit {
        i -= 1;
        if tracker.is_in_range(events[i].x, events[i].y) {
            collected.push(i);
        }
    }
    collected.reverse();
    collected
}

/// Feed `events[seed_idx..]` (plus, for [`InitPolicy::Centered`], a backward
/// half-window first) into `tracker` until it transitions to `Running`.
/// Returns the index of the first not-yet-consumed event, or `None` if the
/// stream ran out before the tracker initialised.
pub fn initialise(tracker: &mut AnyPatchTracker, events: &[Event], seed_idx: usize, policy: InitPolicy) -> Option<usize> {
    if policy == InitPolicy::Centered {
        let half_window = tracker_core::EVENT_WINDOW_SIZE / 2;
        let backward = collect_backward(tracker, events, seed_idx, half_window);
        for &i in &backward {
            tracker.push_event(events[i].t, events[i].x, events[i].y);
        }
    }

    let mut idx = seed_idx;
    while idx < events.len() {
        let e = events[idx];
        idx += 1;
        let update = tracker.push_event(e.t, e.x, e.y);
        if update == EventUpdate::StateEvent && tracker.status() == TrackerStatus::Running {
            return Some(idx);
        }
    }
    tracing::warn!(target: "driver.init", seed_idx, "initialisation_timeout");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_variants::TrackerKind;

    fn events_at(xs: &[(f64, f32, f32)]) -> Vec<Event> {
        xs.iter().map(|&(t, x, y)| Event::new(t, x, y)).collect()
    }

    #[test]
    fn regular_policy_never_consumes_events_before_the_seed() {
        let mut stream = vec![(0.0, 50.0, 50.0)];
        for i in 1..tracker_core::EVENT_WINDOW_SIZE + 5 {
            stream.push((i as f64 * 0.001, 50.0, 50.0));
        }
        let events = events_at(&stream);
        let seed = TrackerSeed { t: 0.0005, x: 50.0, y: 50.0, theta: 0.0, id: 0 };
        let idx = seed_index(&events, &seed);
        assert_eq!(idx, 1);

        let mut tracker = AnyPatchTracker::new(TrackerKind::Correlation, seed.t, seed.x, seed.y, seed.theta);
        let consumed = initialise(&mut tracker, &events, idx, InitPolicy::Regular);
        assert!(consumed.is_some());
        assert_eq!(tracker.status(), TrackerStatus::Running);
    }

    #[test]
    fn centered_backward_scan_reaches_index_zero() {
        let half = tracker_core::EVENT_WINDOW_SIZE / 2;
        let mut stream = Vec::new();
        for i in 0..half {
            stream.push((i as f64 * 0.001, 50.0, 50.0));
        }
        let seed_t = half as f64 * 0.001;
        stream.push((seed_t, 50.0, 50.0));
        for i in 1..half + 5 {
            stream.push((seed_t + i as f64 * 0.001, 50.0, 50.0));
        }
        let events = events_at(&stream);
        let seed = TrackerSeed { t: seed_t, x: 50.0, y: 50.0, theta: 0.0, id: 0 };
        let seed_idx = seed_index(&events, &seed);

        let mut tracker = AnyPatchTracker::new(TrackerKind::Correlation, seed.t, seed.x, seed.y, seed.theta);
        let backward = collect_backward(&tracker, &events, seed_idx, half);
        assert_eq!(backward.first().copied(), Some(0), "backward scan must reach index 0");

        let consumed = initialise(&mut tracker, &events, seed_idx, InitPolicy::Centered);
        assert!(consumed.is_some());
    }
}
