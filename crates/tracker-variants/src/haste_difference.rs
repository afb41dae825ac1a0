//! HASTE difference: scores a hypothesis by how little its model disagrees
//! with the normalised template, recomputing the full difference patch on
//! every event.

use crate::haste_correlation_star::OMEGA;
use tracker_core::{EventTuple, Scorer, TrackerCore};
use tracker_event::Scalar;
use tracker_geom::{Hypothesis, Patch};

#[derive(Debug, Clone, Default)]
pub struct HasteDifference;

impl HasteDifference {
    pub fn new() -> Self {
        Self
    }

    fn difference_score<const N: usize>(core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Scalar {
        let total = core.template.sum();
        let factor = if total != 0.0 { 1.0 / total } else { 0.0 };
        let normalised = core.template.scaled(factor);
        let model = core.event_window_to_model_unitary(hypothesis, OMEGA);
        -normalised.squared_diff_sum(&model)
    }
}

impl<const N: usize> Scorer<N> for HasteDifference {
    fn update_template(&mut self, core: &mut TrackerCore<N>) {
        core.update_template_with_middle_event(OMEGA);
    }

    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>) {
        for i in 0..N {
            core.scores[i] = Self::difference_score(core, &core.hypotheses[i]);
        }
    }

    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, _oldest: EventTuple, _newest: EventTuple) {
        for i in 0..N {
            core.scores[i] = Self::difference_score(core, &core.hypotheses[i]);
        }
    }

    fn event_window_to_model(&self, core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Patch {
        core.event_window_to_model_unitary(hypothesis, OMEGA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_geom::hypothesis::OFFSETS_8NEIGH_2ROT;

    #[test]
    fn zero_template_gives_zero_score() {
        let core = TrackerCore::<11>::new(0.0, 50.0, 50.0, 0.0, OFFSETS_8NEIGH_2ROT);
        let s = HasteDifference::difference_score(&core, core.null_hypothesis());
        assert_eq!(s, 0.0);
    }
}
