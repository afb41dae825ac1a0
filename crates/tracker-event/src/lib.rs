//! Core event types and the fixed-capacity event window.
//!
//! Time is kept at `f64` so that microsecond-scale Unix timestamps do not
//! collapse to a single rounded value once a feature has been tracked for a
//! while; every other per-pixel/scoring quantity lives in `Scalar` (`f32`).

/// Event timestamp. Deliberately wider than [`Scalar`] — see module docs.
pub type Time = f64;

/// Spatial and scoring precision used throughout the core.
pub type Scalar = f32;

/// A single brightness-change event as read off the wire, before
/// undistortion. `p` is carried for interface stability but ignored by the
/// tracking core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    pub t: Time,
    pub x: u16,
    pub y: u16,
    pub p: bool,
}

/// An event after undistortion, real-valued in image-plane coordinates.
/// This is the representation the tracking core consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub t: Time,
    pub x: Scalar,
    pub y: Scalar,
}

impl Event {
    pub fn new(t: Time, x: Scalar, y: Scalar) -> Self {
        Self { t, x, y }
    }
}

/// Outcome of feeding one event through a tracker's `push_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventUpdate {
    /// Event fell outside the tracker's patch radius; no state mutated.
    OutOfRange,
    /// Tracker is still accumulating its first window of events.
    InitializingEvent,
    /// Scores/template updated but the null hypothesis kept the lead.
    RegularEvent,
    /// A neighbouring hypothesis won; the pose transitioned.
    StateEvent,
}

/// Lifecycle state of a `tracker-core`-style tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Uninitialised,
    Running,
}

/// Fixed-capacity rolling buffer of the `K` most recently accepted events.
///
/// Index 0 is the oldest event, `K - 1` the newest, `(K - 1) / 2` the middle.
/// `K` must be odd (enforced at construction by a debug assertion — the
/// generic can't carry that constraint at the type level on stable Rust).
#[derive(Debug, Clone)]
pub struct EventWindow<const K: usize> {
    times: [Time; K],
    xs: [Scalar; K],
    ys: [Scalar; K],
}

impl<const K: usize> Default for EventWindow<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize> EventWindow<K> {
    pub const MIDDLE: usize = (K - 1) / 2;
    pub const OLDEST: usize = 0;
    pub const NEWEST: usize = K - 1;

    pub fn new() -> Self {
        debug_assert!(K % 2 == 1, "EventWindow capacity must be odd");
        Self {
            times: [0.0; K],
            xs: [0.0; K],
            ys: [0.0; K],
        }
    }

    /// Shift the window left by one and write `(t, x, y)` at the newest slot,
    /// returning the event that fell off the oldest end.
    pub fn append(&mut self, t: Time, x: Scalar, y: Scalar) -> (Time, Scalar, Scalar) {
        let oldest = self.get(Self::OLDEST);
        self.times.copy_within(1.., 0);
        self.xs.copy_within(1.., 0);
        self.ys.copy_within(1.., 0);
        self.times[Self::NEWEST] = t;
        self.xs[Self::NEWEST] = x;
        self.ys[Self::NEWEST] = y;
        oldest
    }

    pub fn get(&self, i: usize) -> (Time, Scalar, Scalar) {
        (self.times[i], self.xs[i], self.ys[i])
    }

    pub fn oldest(&self) -> (Time, Scalar, Scalar) {
        self.get(Self::OLDEST)
    }

    pub fn newest(&self) -> (Time, Scalar, Scalar) {
        self.get(Self::NEWEST)
    }

    pub fn middle(&self) -> (Time, Scalar, Scalar) {
        self.get(Self::MIDDLE)
    }

    pub fn times(&self) -> &[Time; K] {
        &self.times
    }

    pub fn xs(&self) -> &[Scalar; K] {
        &self.xs
    }

    pub fn ys(&self) -> &[Scalar; K] {
        &self.ys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_shifts_and_returns_oldest() {
        let mut w: EventWindow<5> = EventWindow::new();
        for i in 0..5 {
            w.append(i as f64, i as f32, i as f32 * 2.0);
        }
        assert_eq!(w.oldest(), (0.0, 0.0, 0.0));
        assert_eq!(w.newest(), (4.0, 4.0, 8.0));
        assert_eq!(w.middle(), (2.0, 2.0, 4.0));

        let displaced = w.append(5.0, 5.0, 10.0);
        assert_eq!(displaced, (0.0, 0.0, 0.0));
        assert_eq!(w.oldest(), (1.0, 1.0, 2.0));
        assert_eq!(w.newest(), (5.0, 5.0, 10.0));
    }

    #[test]
    fn newest_time_never_precedes_oldest_after_monotonic_feed() {
        let mut w: EventWindow<3> = EventWindow::new();
        for i in 0..10 {
            w.append(i as f64 * 1e-3, 0.0, 0.0);
            assert!(w.newest().0 >= w.oldest().0);
        }
    }
}
