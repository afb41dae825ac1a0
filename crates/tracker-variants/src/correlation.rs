//! Plain correlation: the template and every hypothesis' model are built
//! with the same Gaussian weight vector, and the score is a full recompute
//! every event — no incremental bookkeeping.

use crate::gaussian::gaussian_weights;
use tracker_core::{EventTuple, Scorer, TrackerCore, EVENT_WINDOW_SIZE};
use tracker_event::Scalar;
use tracker_geom::{Hypothesis, Patch};

#[derive(Debug, Clone)]
pub struct Correlation {
    weights: [Scalar; EVENT_WINDOW_SIZE],
}

impl Default for Correlation {
    fn default() -> Self {
        Self::new()
    }
}

impl Correlation {
    pub fn new() -> Self {
        Self {
            weights: gaussian_weights(),
        }
    }

    fn hypothesis_score<const N: usize>(&self, core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Scalar {
        let mut acc = 0.0;
        for i in 0..EVENT_WINDOW_SIZE {
            let (_, ex, ey) = core.window.get(i);
            let (xp, yp) = hypothesis.patch_coords(ex, ey);
            acc += self.weights[i] * core.template.sample(xp, yp);
        }
        acc
    }
}

impl<const N: usize> Scorer<N> for Correlation {
    fn update_template(&mut self, core: &mut TrackerCore<N>) {
        let middle_weight = self.weights[tracker_core::EventWindow::MIDDLE];
        core.update_template_with_middle_event(middle_weight);
    }

    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>) {
        for i in 0..N {
            core.scores[i] = self.hypothesis_score(core, &core.hypotheses[i]);
        }
    }

    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, _oldest: EventTuple, _newest: EventTuple) {
        for i in 0..N {
            core.scores[i] = self.hypothesis_score(core, &core.hypotheses[i]);
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
    fn initial_scores_are_zero_against_an_empty_template() {
        let mut core = TrackerCore::<11>::new(0.0, 50.0, 50.0, 0.0, OFFSETS_8NEIGH_2ROT);
        let mut scorer = Correlation::new();
        scorer.initialise_hypotheses(&mut core);
        assert!(core.scores.iter().all(|&s| s == 0.0));
    }
}
