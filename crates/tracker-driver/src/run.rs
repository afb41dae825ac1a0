//! Sequencing one tracker across one event stream, from its seed to either
//! a left-FOV stop or stream exhaustion, and the trail output writer.

use crate::init::{self, InitPolicy};
use crate::stop::left_field_of_view;
use anyhow::{Context, Result};
use std::io::Write;
use tracker_calib::TrackerSeed;
use tracker_event::{Event, EventUpdate};
use tracker_variants::{AnyPatchTracker, TrackerKind};

/// One recorded state transition: the seed's `id` plus the pose it
/// transitioned to.
#[derive(Debug, Clone, Copy)]
pub struct TrailEntry {
    pub id: u64,
    pub t: tracker_event::Time,
    pub x: tracker_event::Scalar,
    pub y: tracker_event::Scalar,
    pub theta: tracker_event::Scalar,
}

/// Run a single seed to completion: initialise, then feed events until the
/// tracker leaves the sensor's field of view or the stream runs out.
/// Appends one [`TrailEntry`] per `StateEvent`, including the first state
/// reached at initialisation.
pub fn run_tracker(
    kind: TrackerKind,
    seed: &TrackerSeed,
    events: &[Event],
    policy: InitPolicy,
    width: u16,
    height: u16,
) -> Vec<TrailEntry> {
    let mut trail = Vec::new();
    let mut tracker = AnyPatchTracker::new(kind, seed.t, seed.x, seed.y, seed.theta);

    let seed_idx = init::seed_index(events, seed);
    let Some(mut idx) = init::initialise(&mut tracker, events, seed_idx, policy) else {
        tracing::info!(target: "driver.run", id = seed.id, "tracker_not_initialised");
        return trail;
    };

    tracing::info!(target: "driver.run", id = seed.id, pose = ?tracker.pose(), "tracker_initialised");
    push_trail_entry(&mut trail, seed.id, &tracker);

    while idx < events.len() {
        let e = events[idx];
        idx += 1;
        let update = tracker.push_event(e.t, e.x, e.y);
        if update == EventUpdate::StateEvent {
            push_trail_entry(&mut trail, seed.id, &tracker);
            if left_field_of_view(tracker.pose(), width, height) {
                tracing::debug!(target: "driver.run", id = seed.id, "left_field_of_view");
                break;
            }
        }
    }
    trail
}

fn push_trail_entry(trail: &mut Vec<TrailEntry>, id: u64, tracker: &AnyPatchTracker) {
    let pose = tracker.pose();
    trail.push(TrailEntry { id, t: pose.t, x: pose.x, y: pose.y, theta: pose.theta });
}

/// Write `t,x,y,theta,id` lines, one per entry, in recorded order.
pub fn write_trail(path: impl AsRef<std::path::Path>, trail: &[TrailEntry]) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    for entry in trail {
        writeln!(file, "{},{},{},{},{}", entry.t, entry.x, entry.y, entry.theta, entry.id)
            .with_context(|| format!("writing to output file {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_stream(n: usize, x: f32, y: f32) -> Vec<Event> {
        (0..n).map(|i| Event::new(i as f64 * 1e-3, x, y)).collect()
    }

    #[test]
    fn run_tracker_records_initial_state_when_it_initialises() {
        let events = constant_stream(tracker_core::EVENT_WINDOW_SIZE + 10, 100.0, 80.0);
        let seed = TrackerSeed { t: 0.0, x: 100.0, y: 80.0, theta: 0.0, id: 3 };
        let trail = run_tracker(TrackerKind::Correlation, &seed, &events, InitPolicy::Regular, 240, 180);
        assert!(!trail.is_empty());
        assert_eq!(trail[0].id, 3);
    }

    #[test]
    fn run_tracker_returns_empty_trail_when_stream_is_too_short() {
        let events = constant_stream(5, 100.0, 80.0);
        let seed = TrackerSeed { t: 0.0, x: 100.0, y: 80.0, theta: 0.0, id: 1 };
        let trail = run_tracker(TrackerKind::Correlation, &seed, &events, InitPolicy::Regular, 240, 180);
        assert!(trail.is_empty());
    }

    #[test]
    fn write_trail_round_trips_csv_lines() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let trail = vec![TrailEntry { id: 7, t: 1.5, x: 10.0, y: 20.0, theta: 0.1 }];
        write_trail(tmp.path(), &trail).unwrap();
        let content = std::fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(content, "1.5,10,20,0.1,7\n");
    }
}
