//! HASTE difference*: like [`crate::haste_difference::HasteDifference`], but
//! each hypothesis keeps its own cached difference patch (`normalised -
//! model`) and the incremental update only touches the 2x2 neighbourhood the
//! oldest/newest event actually lands in, via [`tracker_geom::interpolator::block_mut`].

use tracker_core::{EventTuple, Scorer, TrackerCore, EVENT_WINDOW_SIZE};
use tracker_event::Scalar;
use tracker_geom::interpolator::kernel;
use tracker_geom::{Hypothesis, Patch};

const OMEGA: Scalar = 1.0 / (EVENT_WINDOW_SIZE as Scalar);

#[derive(Debug, Clone)]
pub struct HasteDifferenceStar<const N: usize> {
    differences: [Patch; N],
}

impl<const N: usize> Default for HasteDifferenceStar<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HasteDifferenceStar<N> {
    pub fn new() -> Self {
        Self {
            differences: std::array::from_fn(|_| Patch::new()),
        }
    }
}

/// Nudge a cached difference patch by `increment` at `(ex, ey)` under `hyp`,
/// keeping `score` (`-sum(diff^2)`) consistent without rescanning the patch.
fn apply_event(diff: &mut Patch, hyp: &Hypothesis, ex: Scalar, ey: Scalar, increment: Scalar, score: &mut Scalar) {
    let (xp, yp) = hyp.patch_coords(ex, ey);
    if !Patch::in_patch(xp, yp) {
        return;
    }
    let k = kernel(xp, yp);
    let block = diff.block_mut(xp, yp);
    let sq_before: Scalar =
        block[0][0] * block[0][0] + block[0][1] * block[0][1] + block[1][0] * block[1][0] + block[1][1] * block[1][1];
    block[0][0] += k[0][0] * increment;
    block[0][1] += k[0][1] * increment;
    block[1][0] += k[1][0] * increment;
    block[1][1] += k[1][1] * increment;
    let sq_after: Scalar =
        block[0][0] * block[0][0] + block[0][1] * block[0][1] + block[1][0] * block[1][0] + block[1][1] * block[1][1];
    *score += sq_before - sq_after;
}

impl<const N: usize> Scorer<N> for HasteDifferenceStar<N> {
    fn update_template(&mut self, core: &mut TrackerCore<N>) {
        core.update_template_with_middle_event(OMEGA);
    }

    fn initialise_hypotheses(&mut self, core: &mut TrackerCore<N>) {
        let total = core.template.sum();
        let factor = if total != 0.0 { 1.0 / total } else { 0.0 };
        let normalised = core.template.scaled(factor);

        for i in 0..N {
            let model = core.event_window_to_model_unitary(&core.hypotheses[i], OMEGA);
            let diff = normalised.sub(&model);
            core.scores[i] = -diff.squared_diff_sum(&Patch::new());
            self.differences[i] = diff;
        }
    }

    fn update_hypotheses_score(&mut self, core: &mut TrackerCore<N>, oldest: EventTuple, newest: EventTuple) {
        let (_, old_x, old_y) = oldest;
        let (_, new_x, new_y) = newest;
        for i in 0..N {
            let hyp = core.hypotheses[i];
            let diff = &mut self.differences[i];
            let mut score = core.scores[i];
            // The event leaving the window stops contributing to the model,
            // so `normalised - model` gains back `OMEGA` there.
            apply_event(diff, &hyp, old_x, old_y, OMEGA, &mut score);
            // The event entering the window adds `OMEGA` to the model.
            apply_event(diff, &hyp, new_x, new_y, -OMEGA, &mut score);
            core.scores[i] = score;
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
    fn incremental_score_matches_full_recompute() {
        let mut core = TrackerCore::<11>::new(0.0, 50.0, 50.0, 0.0, OFFSETS_8NEIGH_2ROT);
        core.template.splat(15.0, 15.0, 1.0);
        for i in 0..tracker_core::EVENT_WINDOW_SIZE {
            core.window.append(i as f64, 49.0 + (i % 3) as Scalar, 49.0);
        }
        let mut scorer = HasteDifferenceStar::<11>::new();
        scorer.initialise_hypotheses(&mut core);

        let oldest = core.window.oldest();
        let newest_tuple = (193.0, 51.0, 50.0);
        core.window.append(newest_tuple.0, newest_tuple.1, newest_tuple.2);
        scorer.update_hypotheses_score(&mut core, oldest, newest_tuple);

        let total = core.template.sum();
        let factor = if total != 0.0 { 1.0 / total } else { 0.0 };
        let normalised = core.template.scaled(factor);
        for i in 0..11 {
            let model = core.event_window_to_model_unitary(&core.hypotheses[i], OMEGA);
            let expected = -normalised.sub(&model).squared_diff_sum(&Patch::new());
            assert!((core.scores[i] - expected).abs() < 1e-3, "hypothesis {i}: {} vs {expected}", core.scores[i]);
        }
    }
}
