//! Event-stream loading: whitespace-delimited `t x y p` lines, and
//! undistortion of the raw integer-pixel stream into the real-valued
//! coordinates the tracking core consumes.

use anyhow::{Context, Result};
use tracker_calib::UndistortionMap;
use tracker_event::{Event, RawEvent};

/// Parse an event-stream file. `limit` caps the number of lines read, as the
/// original batch tool's `--num-events` flag does.
pub fn load_events(path: impl AsRef<std::path::Path>, limit: Option<usize>) -> Result<Vec<RawEvent>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading event stream {}", path.as_ref().display()))?;

    let mut events = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(cap) = limit
            && events.len() >= cap
        {
            break;
        }

        let mut fields = line.split_whitespace();
        let t = fields
            .next()
            .with_context(|| format!("line {}: missing timestamp", line_no + 1))?
            .parse()
            .with_context(|| format!("line {}: bad timestamp", line_no + 1))?;
        let x = fields
            .next()
            .with_context(|| format!("line {}: missing x", line_no + 1))?
            .parse()
            .with_context(|| format!("line {}: bad x", line_no + 1))?;
        let y = fields
            .next()
            .with_context(|| format!("line {}: missing y", line_no + 1))?
            .parse()
            .with_context(|| format!("line {}: bad y", line_no + 1))?;
        let p_raw: u8 = fields
            .next()
            .with_context(|| format!("line {}: missing polarity", line_no + 1))?
            .parse()
            .with_context(|| format!("line {}: bad polarity", line_no + 1))?;

        events.push(RawEvent { t, x, y, p: p_raw != 0 });
    }
    Ok(events)
}

/// Undistort a raw stream into the coordinates `PatchTracker::push_event`
/// expects. `RawEvent::p` is dropped here — the tracking core never looks at
/// polarity (spec: "carried for interface stability, ignored by tracking").
pub fn undistort_events(raw: &[RawEvent], map: &UndistortionMap) -> Vec<Event> {
    raw.iter()
        .map(|r| {
            let (x, y) = map.get(r.x, r.y);
            Event::new(r.t, x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_delimited_lines() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0.001 10 20 1\n0.002 11 20 0\n").unwrap();
        let events = load_events(tmp.path(), None).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], RawEvent { t: 0.001, x: 10, y: 20, p: true });
        assert!(!events[1].p);
    }

    #[test]
    fn respects_limit() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0.0 1 1 0\n0.1 2 2 0\n0.2 3 3 0\n").unwrap();
        let events = load_events(tmp.path(), Some(2)).unwrap();
        assert_eq!(events.len(), 2);
    }
}
