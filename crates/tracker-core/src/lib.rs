//! The hypothesis-patch-tracker state machine.
//!
//! `TrackerCore<N>` holds everything a scoring variant needs (window,
//! template, hypotheses, scores) but knows nothing about how scores are
//! computed. `Scorer<N>` is the capability trait the five tracking variants
//! (in `tracker-variants`) implement; `PatchTracker<S, N>` wires the shared
//! state machine from `push_event` to a concrete `Scorer`.

use tracker_event::{EventUpdate, Scalar, Time, TrackerStatus};
use tracker_geom::hypothesis::{self, Offset};
use tracker_geom::{Hypothesis, Patch};

/// `1 + 2 * floor(TextureFactor * PatchSize^2 / 2)` with `TextureFactor =
/// 0.2`, `PatchSize = 31` — see `tracker_geom::PATCH_SIZE`. Pinned by a test
/// below rather than computed in a `const` context, since floating-point
/// `floor` isn't available there on every toolchain this workspace targets.
pub const EVENT_WINDOW_SIZE: usize = 193;

pub const TEXTURE_FACTOR: Scalar = 0.2;
pub const TEMPLATE_UPDATE_FACTOR: Scalar = 0.1;
pub const HYSTERESIS: Scalar = 0.05;

pub type EventWindow = tracker_event::EventWindow<EVENT_WINDOW_SIZE>;
pub type EventTuple = (Time, Scalar, Scalar);

/// State shared by every scoring variant: the window, template, and the
/// current hypothesis/score arrays. Owned exclusively by its tracker.
#[derive(Debug, Clone)]
pub struct TrackerCore<const N: usize> {
    pub status: TrackerStatus,
    pub event_counter: usize,
    pub hypotheses: [Hypothesis; N],
    pub scores: [Scalar; N],
    pub offsets: [Offset; N],
    pub template: Patch,
    pub window: EventWindow,
}

impl<const N: usize> TrackerCore<N> {
    pub fn new(t: Time, x: Scalar, y: Scalar, theta: Scalar, offsets: [Offset; N]) -> Self {
        let null = Hypothesis::new(t, x, y, theta);
        Self {
            status: TrackerStatus::Uninitialised,
            event_counter: 0,
            hypotheses: [null; N],
            scores: [0.0; N],
            offsets,
            template: Patch::new(),
            window: EventWindow::new(),
        }
    }

    pub fn null_hypothesis(&self) -> &Hypothesis {
        &self.hypotheses[0]
    }

    pub fn is_in_range(&self, ex: Scalar, ey: Scalar) -> bool {
        self.null_hypothesis().is_in_range(ex, ey)
    }

    /// Regenerate `hypotheses` as `h + offset[i]` for every `i`; index 0 is
    /// the pure `h`. Scores are left stale — the caller's `Scorer` must
    /// refill them via `initialise_hypotheses`.
    pub fn transition_to(&mut self, h: Hypothesis) {
        self.hypotheses = hypothesis::generate(&h, &self.offsets);
    }

    /// Advance every hypothesis' time to the window's middle event, without
    /// touching its pose.
    pub fn advance_hypotheses_time_to_middle(&mut self) {
        let (t_mid, _, _) = self.window.middle();
        for h in &mut self.hypotheses {
            *h = h.with_time(t_mid);
        }
    }

    /// Splat the middle event into `template` at the null hypothesis' patch
    /// coordinates, with value `weight * TEMPLATE_UPDATE_FACTOR`.
    pub fn update_template_with_middle_event(&mut self, weight: Scalar) {
        let (_, ex, ey) = self.window.middle();
        let (xp, yp) = self.null_hypothesis().patch_coords(ex, ey);
        self.template.splat(xp, yp, weight * TEMPLATE_UPDATE_FACTOR);
    }

    /// Build a patch by splatting every window event at its patch
    /// coordinates under `hypothesis`, each with the same weight `w`.
    pub fn event_window_to_model_unitary(&self, hypothesis: &Hypothesis, w: Scalar) -> Patch {
        let mut model = Patch::new();
        for i in 0..EVENT_WINDOW_SIZE {
            let (_, ex, ey) = self.window.get(i);
            let (xp, yp) = hypothesis.patch_coords(ex, ey);
            model.splat(xp, yp, w);
        }
        model
    }

    /// As [`Self::event_window_to_model_unitary`], with a per-event weight.
    pub fn event_window_to_model_weighted(
        &self,
        hypothesis: &Hypothesis,
        weights: &[Scalar; EVENT_WINDOW_SIZE],
    ) -> Patch {
        let mut model = Patch::new();
        for i in 0..EVENT_WINDOW_SIZE {
            let (_, ex, ey) = self.window.get(i);
            let (xp, yp) = hypothesis.patch_coords(ex, ey);
            model.splat(xp, yp, weights[i]);
        }
        model
    }
}

/// Winner selection with hysteresis (spec: returns 0 — the null hypothesis —
/// unless a neighbour both beats it and clears the normalised margin).
pub fn select_winner<const N: usize>(scores: &[Scalar; N]) -> usize {
    let mut best_idx = 0;
    let mut best = scores[0];
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > best {
            best = s;
            best_idx = i;
        }
    }
    let worst = scores.iter().copied().fold(best, Scalar::min);
    let null_score = scores[0];

    if best == worst {
        return 0;
    }
    let span = best - worst;
    let n_star = 1.0; // (best - worst) / (best - worst)
    let n_null = (null_score - worst) / span;

    if null_score < best && (n_star - n_null) > HYSTERESIS {
        best_idx
    } else {
        0
    }
}

/// Capability interface implemented by each scoring variant. Required hooks
/// mirror the original tracker's virtual overrides one-for-one.
pub trait Scorer<const N: usize> {
    fn update_template(&mut self, core: &mut TrackerCore<N>);
    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>);
    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, oldest: EventTuple, newest: EventTuple);
    fn event_window_to_model(&self, core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Patch;

    /// Append the new event to the window. The default delegates straight to
    /// `EventWindow::append`; `HasteCorrelation` overrides this to also roll
    /// its cached per-hypothesis sample stack (see its module docs).
    fn append_event_to_window(&mut self, core: &mut TrackerCore<N>, newest: EventTuple) -> EventTuple {
        core.window.append(newest.0, newest.1, newest.2)
    }
}

/// The hypothesis-patch tracker: shared state machine generic over a
/// `Scorer` variant and the hypothesis-set size `N` (11 for the default
/// 8-neighbour + 2-rotation generator, 7 for the 4-neighbour alternative).
pub struct PatchTracker<S, const N: usize> {
    pub core: TrackerCore<N>,
    pub scorer: S,
}

impl<S: Scorer<N>, const N: usize> PatchTracker<S, N> {
    pub fn new(t: Time, x: Scalar, y: Scalar, theta: Scalar, offsets: [Offset; N], scorer: S) -> Self {
        Self {
            core: TrackerCore::new(t, x, y, theta, offsets),
            scorer,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.core.status
    }

    pub fn pose(&self) -> &Hypothesis {
        self.core.null_hypothesis()
    }

    pub fn event_counter(&self) -> usize {
        self.core.event_counter
    }

    pub fn window(&self) -> &EventWindow {
        &self.core.window
    }

    pub fn template(&self) -> &Patch {
        &self.core.template
    }

    pub fn is_in_range(&self, ex: Scalar, ey: Scalar) -> bool {
        self.core.is_in_range(ex, ey)
    }

    fn initialise_tracker(&mut self) {
        self.core.status = TrackerStatus::Running;
        let (et_mid, _, _) = self.core.window.middle();
        let seed = self.core.null_hypothesis();
        let initial = Hypothesis::new(et_mid, seed.x, seed.y, seed.theta);
        self.core.template = self.scorer.event_window_to_model(&self.core, &initial);
        self.transition_to(initial);
        tracing::debug!(target: "tracker.core", t = et_mid, "tracker_initialised");
    }

    fn transition_to(&mut self, h: Hypothesis) {
        self.core.transition_to(h);
        self.scorer.initialise_hypotheses(&mut self.core);
    }

    /// The core operation: feed one accepted-or-rejected event through the
    /// state machine.
    pub fn push_event(&mut self, et: Time, ex: Scalar, ey: Scalar) -> EventUpdate {
        if !self.core.is_in_range(ex, ey) {
            return EventUpdate::OutOfRange;
        }

        let newest = (et, ex, ey);
        let oldest = self.scorer.append_event_to_window(&mut self.core, newest);
        self.core.event_counter += 1;

        if self.core.status == TrackerStatus::Uninitialised {
            return if self.core.event_counter >= EVENT_WINDOW_SIZE {
                self.initialise_tracker();
                EventUpdate::StateEvent
            } else {
                EventUpdate::InitializingEvent
            };
        }

        self.core.advance_hypotheses_time_to_middle();
        self.scorer.update_hypotheses_score(&mut self.core, oldest, newest);

        let best_idx = select_winner(&self.core.scores);
        let result = if best_idx == 0 {
            EventUpdate::RegularEvent
        } else {
            let winner = self.core.hypotheses[best_idx];
            self.transition_to(winner);
            tracing::trace!(target: "tracker.core", idx = best_idx, "state_event");
            EventUpdate::StateEvent
        };

        self.scorer.update_template(&mut self.core);
        result
    }
}
