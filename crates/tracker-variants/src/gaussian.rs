//! Shared Gaussian weight vector used by the two correlation variants.

use tracker_event::Scalar;

/// A centred Gaussian window over `K` samples, `sigma = K / 6`, normalised to
/// sum to 1.
pub fn gaussian_weights<const K: usize>() -> [Scalar; K] {
    let half = (K - 1) as Scalar / 2.0;
    let sigma = K as Scalar / 6.0;
    let two_sigma2 = 2.0 * sigma * sigma;

    let mut w = [0.0; K];
    let mut sum = 0.0;
    for (i, wi) in w.iter_mut().enumerate() {
        let d = i as Scalar - half;
        *wi = (-d * d / two_sigma2).exp();
        sum += *wi;
    }
    for wi in w.iter_mut() {
        *wi /= sum;
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_normalised_and_peak_at_the_middle() {
        let w: [Scalar; 193] = gaussian_weights();
        let sum: Scalar = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        let middle = w[96];
        assert!(w.iter().all(|&wi| wi <= middle));
    }
}
