//! Bilinear splat/sample primitives over a fixed `PATCH_SIZE × PATCH_SIZE`
//! column-major array.
//!
//! All operations share one in-bounds predicate: `0 <= xp < P-1` and
//! `0 <= yp < P-1`. The strict upper bound is not an off-by-one — every
//! sample reads the 2x2 neighbourhood starting at `(floor(xp), floor(yp))`,
//! so the last valid integer coordinate is `P - 2`.

use crate::patch::{PatchData, PATCH_SIZE};
use tracker_event::Scalar;

/// `true` iff `(xp, yp)` has a full 2x2 neighbourhood inside the patch.
#[inline]
pub fn in_bounds(xp: Scalar, yp: Scalar) -> bool {
    let limit = (PATCH_SIZE - 1) as Scalar;
    xp >= 0.0 && yp >= 0.0 && xp < limit && yp < limit
}

struct Weights {
    ix: usize,
    iy: usize,
    w00: Scalar,
    w10: Scalar,
    w01: Scalar,
    w11: Scalar,
}

#[inline]
fn weights(xp: Scalar, yp: Scalar) -> Weights {
    let ix = xp as usize;
    let iy = yp as usize;
    let dx = xp - ix as Scalar;
    let dy = yp - iy as Scalar;
    let dxdy = dx * dy;
    Weights {
        ix,
        iy,
        w00: 1.0 - dx - dy + dxdy,
        w10: dx - dxdy,
        w01: dy - dxdy,
        w11: dxdy,
    }
}

/// The bilinear weight matrix at `(xp, yp)`, without touching any array.
/// Returned as `[[w(ix,iy), w(ix,iy+1)], [w(ix+1,iy), w(ix+1,iy+1)]]`.
pub fn kernel(xp: Scalar, yp: Scalar) -> [[Scalar; 2]; 2] {
    let w = weights(xp, yp);
    [[w.w00, w.w01], [w.w10, w.w11]]
}

/// Splat `w` onto the four neighbours of `(xp, yp)` with bilinear weights.
/// Returns `false` and leaves `array` untouched if out of bounds.
pub fn splat(array: &mut PatchData, xp: Scalar, yp: Scalar, w: Scalar) -> bool {
    if !in_bounds(xp, yp) {
        return false;
    }
    let wt = weights(xp, yp);
    array[wt.ix][wt.iy] += wt.w00 * w;
    array[wt.ix + 1][wt.iy] += wt.w10 * w;
    array[wt.ix][wt.iy + 1] += wt.w01 * w;
    array[wt.ix + 1][wt.iy + 1] += wt.w11 * w;
    true
}

/// Bilinearly sample `array` at `(xp, yp)`; `0.0` if out of bounds.
pub fn sample(array: &PatchData, xp: Scalar, yp: Scalar) -> Scalar {
    if !in_bounds(xp, yp) {
        return 0.0;
    }
    let wt = weights(xp, yp);
    wt.w00 * array[wt.ix][wt.iy]
        + wt.w10 * array[wt.ix + 1][wt.iy]
        + wt.w01 * array[wt.ix][wt.iy + 1]
        + wt.w11 * array[wt.ix + 1][wt.iy + 1]
}

/// Elementwise [`sample`] over parallel coordinate vectors.
pub fn sample_batch<const N: usize>(
    array: &PatchData,
    xs: &[Scalar; N],
    ys: &[Scalar; N],
) -> [Scalar; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = sample(array, xs[i], ys[i]);
    }
    out
}

/// A mutable view onto the 2x2 neighbourhood anchored at `(floor(xp),
/// floor(yp))`, returned as the two adjacent columns so callers (the
/// Star/Difference variants) can accumulate into it without copying the
/// whole patch. Caller is responsible for bounds — use [`in_bounds`] first.
pub fn block_mut(array: &mut PatchData, xp: Scalar, yp: Scalar) -> [&mut [Scalar]; 2] {
    let ix = xp as usize;
    let iy = yp as usize;
    let (left, right) = array.split_at_mut(ix + 1);
    [&mut left[ix][iy..iy + 2], &mut right[0][iy..iy + 2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::zero_data;
    use pretty_assertions::assert_eq;

    #[test]
    fn kernel_sums_to_one_and_matches_identity_at_integers() {
        assert_eq!(kernel(3.0, 7.0), [[1.0, 0.0], [0.0, 0.0]]);
        for &(x, y) in &[(0.25, 0.75), (10.25, 20.75), (5.5, 5.5)] {
            let k = kernel(x, y);
            let sum: Scalar = k[0][0] + k[0][1] + k[1][0] + k[1][1];
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn splat_round_trip_sums_to_weight() {
        let mut z = zero_data();
        assert!(splat(&mut z, 10.25, 20.75, 4.0));
        let sum: Scalar = z.iter().flatten().sum();
        assert!((sum - 4.0).abs() < 1e-6);

        let v = sample(&z, 10.25, 20.75);
        let expected = 4.0 * (0.5625 * 0.5625 + 0.1875 * 0.1875 + 0.1875 * 0.1875 + 0.0625 * 0.0625);
        assert!((v - expected).abs() < 1e-5, "{v} vs {expected}");
    }

    #[test]
    fn out_of_bounds_splat_is_a_noop() {
        let mut z = zero_data();
        assert!(!splat(&mut z, -0.5, 5.0, 1.0));
        assert!(!splat(&mut z, (PATCH_SIZE - 1) as Scalar, 5.0, 1.0));
        assert!(z.iter().flatten().all(|&v| v == 0.0));
        assert_eq!(sample(&z, -0.5, 5.0), 0.0);
    }

    #[test]
    fn block_mut_aliases_the_backing_array() {
        let mut z = zero_data();
        {
            let mut b = block_mut(&mut z, 4.0, 4.0);
            b[0][0] = 1.0;
            b[1][1] = 2.0;
        }
        assert_eq!(z[4][4], 1.0);
        assert_eq!(z[5][5], 2.0);
    }
}
