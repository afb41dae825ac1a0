//! HASTE correlation*: uniform weight `omega = 1 / K` instead of a Gaussian
//! window, and an incremental score update driven by the delta between the
//! newest and oldest samples rather than a full recompute.

use tracker_core::{EventTuple, Scorer, TrackerCore, EVENT_WINDOW_SIZE};
use tracker_event::Scalar;
use tracker_geom::{Hypothesis, Patch};

pub const OMEGA: Scalar = 1.0 / (EVENT_WINDOW_SIZE as Scalar);

#[derive(Debug, Clone)]
pub struct HasteCorrelationStar {
    template_normalised: Patch,
}

impl Default for HasteCorrelationStar {
    fn default() -> Self {
        Self::new()
    }
}

impl HasteCorrelationStar {
    pub fn new() -> Self {
        Self {
            template_normalised: Patch::new(),
        }
    }
}

impl<const N: usize> Scorer<N> for HasteCorrelationStar {
    fn update_template(&mut self, core: &mut TrackerCore<N>) {
        core.update_template_with_middle_event(OMEGA);
    }

    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>) {
        let total = core.template.sum();
        let factor = if total != 0.0 { 1.0 / total } else { 0.0 };
        self.template_normalised = core.template.scaled(factor);

        for i in 0..N {
            let mut acc = 0.0;
            for j in 0..EVENT_WINDOW_SIZE {
                let (_, ex, ey) = core.window.get(j);
                let (xp, yp) = core.hypotheses[i].patch_coords(ex, ey);
                acc += self.template_normalised.sample(xp, yp);
            }
            core.scores[i] = OMEGA * acc;
        }
    }

    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, oldest: EventTuple, newest: EventTuple) {
        let (_, old_x, old_y) = oldest;
        let (_, new_x, new_y) = newest;
        for i in 0..N {
            let (old_xp, old_yp) = core.hypotheses[i].patch_coords(old_x, old_y);
            let (new_xp, new_yp) = core.hypotheses[i].patch_coords(new_x, new_y);
            let delta = self.template_normalised.sample(new_xp, new_yp)
                - self.template_normalised.sample(old_xp, old_yp);
            core.scores[i] += OMEGA * delta;
        }
    }

    fn event_window_to_model(&self, core: &TrackerCore<N>, hypothesis: &Hypothesis) -> Patch {
        core.event_window_to_model_unitary(hypothesis, OMEGA)
    }
}
