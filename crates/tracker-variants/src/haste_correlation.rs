//! HASTE correlation: like [`crate::correlation::Correlation`], but every
//! hypothesis keeps a rolling `[Scalar; K]` sample stack instead of
//! recomputing its score from the whole window each event.
//!
//! The stack is rebuilt from scratch on every `initialise_hypotheses` call
//! (i.e. on every state transition, including the first) — the original
//! tracker's `transitionToHypothesis` always calls `initializeHypotheses()`
//! unconditionally, so there is no carry-over of stale per-hypothesis
//! samples across a pose change. Between transitions, `append_event_to_window`
//! shifts the stack and appends one new sample per hypothesis; the explicit
//! `(oldest, newest)` pair handed to `update_hypotheses_score` is intentionally
//! unused since `append_event_to_window` has already mutated the stack's
//! rightmost column by the time the score update runs — append-before-score
//! is the ordering `PatchTracker::push_event` guarantees.

use crate::gaussian::gaussian_weights;
use tracker_core::{EventTuple, Scorer, TrackerCore, EVENT_WINDOW_SIZE};
use tracker_event::Scalar;
use tracker_geom::{Hypothesis, Patch};

#[derive(Debug, Clone)]
pub struct HasteCorrelation<const N: usize> {
    weights: [Scalar; EVENT_WINDOW_SIZE],
    samples_stack: [[Scalar; EVENT_WINDOW_SIZE]; N],
}

impl<const N: usize> Default for HasteCorrelation<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HasteCorrelation<N> {
    pub fn new() -> Self {
        Self {
            weights: gaussian_weights(),
            samples_stack: [[0.0; EVENT_WINDOW_SIZE]; N],
        }
    }

    fn score_of(&self, i: usize) -> Scalar {
        self.samples_stack[i]
            .iter()
            .zip(self.weights.iter())
            .map(|(&s, &w)| s * w)
            .sum()
    }
}

impl<const N: usize> Scorer<N> for HasteCorrelation<N> {
    fn update_template(&mut self, core: &mut TrackerCore<N>) {
        let middle_weight = self.weights[tracker_core::EventWindow::MIDDLE];
        core.update_template_with_middle_event(middle_weight);
    }

    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>) {
        for i in 0..N {
            for j in 0..EVENT_WINDOW_SIZE {
                let (_, ex, ey) = core.window.get(j);
                let (xp, yp) = core.hypotheses[i].patch_coords(ex, ey);
                self.samples_stack[i][j] = core.template.sample(xp, yp);
            }
            core.scores[i] = self.score_of(i);
        }
    }

    fn append_event_to_window(&mut self, core: &mut TrackerCore<N>, newest: EventTuple) -> EventTuple {
        let oldest = core.window.append(newest.0, newest.1, newest.2);
        let (_, ex, ey) = newest;
        for i in 0..N {
            self.samples_stack[i].copy_within(1.., 0);
            let (xp, yp) = core.hypotheses[i].patch_coords(ex, ey);
            self.samples_stack[i][EVENT_WINDOW_SIZE - 1] = core.template.sample(xp, yp);
        }
        oldest
    }

    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, _oldest: EventTuple, _newest: EventTuple) {
        for i in 0..N {
            core.scores[i] = self.score_of(i);
        }
    }

    fn event_window_to_model(&self, core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Patch {
        core.event_window_to_model_weighted(hypothesis, &self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_geom::hypothesis::OFFSETS_8NEIGH_2ROT;

    #[test]
    fn stack_rolls_forward_one_sample_per_append() {
        let mut core = TrackerCore::<11>::new(0.0, 50.0, 50.0, 0.0, OFFSETS_8NEIGH_2ROT);
        let mut scorer = HasteCorrelation::<11>::new();
        scorer.append_event_to_window(&mut core, (1.0, 51.0, 50.0));
        assert_eq!(scorer.samples_stack[0][EVENT_WINDOW_SIZE - 1], 0.0);
        assert_eq!(core.window.newest(), (1.0, 51.0, 50.0));
    }

    #[test]
    fn initialise_hypotheses_rebuilds_stack_on_every_transition() {
        let mut core = TrackerCore::<11>::new(0.0, 50.0, 50.0, 0.0, OFFSETS_8NEIGH_2ROT);
        core.template.splat(15.0, 15.0, 1.0);
        let mut scorer = HasteCorrelation::<11>::new();

        scorer.initialise_hypotheses(&mut core);
        let first_pass = scorer.samples_stack;

        // Poison the stack with a sentinel no real sample can produce.
        for stack in scorer.samples_stack.iter_mut() {
            stack.fill(-999.0);
        }

        // A second transition must discard the sentinel entirely rather than
        // carry it forward, reproducing the first pass exactly.
        scorer.initialise_hypotheses(&mut core);
        for stack in scorer.samples_stack.iter() {
            assert!(stack.iter().all(|&s| s != -999.0));
        }
        assert_eq!(scorer.samples_stack, first_pass);
    }
}
