//! Pinhole camera with radial/tangential ("rad-tan") distortion, and the
//! iterative undistortion solver used to turn raw pixel events into the
//! real-valued coordinates the tracking core consumes.

use tracker_event::Scalar;

const MAX_ITERATIONS: usize = 50;
const CONVERGENCE_THRESHOLD: Scalar = 1e-6;

/// Intrinsics + rad-tan distortion coefficients for one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeRadTan {
    pub width: u16,
    pub height: u16,
    pub fx: Scalar,
    pub fy: Scalar,
    pub cx: Scalar,
    pub cy: Scalar,
    pub k1: Scalar,
    pub k2: Scalar,
    pub p1: Scalar,
    pub p2: Scalar,
    pub k3: Scalar,
}

impl PinholeRadTan {
    /// Forward rad-tan distortion of a point already in normalized camera
    /// coordinates, with its analytic 2x2 Jacobian `d(distorted)/d(p)`.
    ///
    /// `k3` is parsed from the calibration file (9-field format) but, as in
    /// the original tracker, never applied here — only `k1`/`k2` feed the
    /// radial term.
    pub fn distort_normalized(&self, p: (Scalar, Scalar)) -> ((Scalar, Scalar), [[Scalar; 2]; 2]) {
        let (x, y) = p;
        let r2 = x * x + y * y;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r2 * r2;
        let dradial_dr2 = self.k1 + 2.0 * self.k2 * r2;

        let xd = x * radial + 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let yd = y * radial + self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;

        let j00 = radial + 2.0 * x * x * dradial_dr2 + 2.0 * self.p1 * y + 6.0 * self.p2 * x;
        let j01 = 2.0 * x * y * dradial_dr2 + 2.0 * self.p1 * x + 2.0 * self.p2 * y;
        let j10 = j01;
        let j11 = radial + 2.0 * y * y * dradial_dr2 + 6.0 * self.p1 * y + 2.0 * self.p2 * x;

        ((xd, yd), [[j00, j01], [j10, j11]])
    }

    /// Gauss-Newton inversion of [`Self::distort_normalized`]: `p +=
    /// (J^T J)^-1 J^T . error`, up to [`MAX_ITERATIONS`], stopping once the
    /// squared residual drops below [`CONVERGENCE_THRESHOLD`].
    pub fn undistort_normalized(&self, distorted: (Scalar, Scalar)) -> (Scalar, Scalar) {
        let mut p = distorted;
        for _ in 0..MAX_ITERATIONS {
            let (projected, j) = self.distort_normalized(p);
            let ex = distorted.0 - projected.0;
            let ey = distorted.1 - projected.1;
            if ex * ex + ey * ey < CONVERGENCE_THRESHOLD {
                break;
            }

            let jtj00 = j[0][0] * j[0][0] + j[1][0] * j[1][0];
            let jtj01 = j[0][0] * j[0][1] + j[1][0] * j[1][1];
            let jtj11 = j[0][1] * j[0][1] + j[1][1] * j[1][1];
            let jte0 = j[0][0] * ex + j[1][0] * ey;
            let jte1 = j[0][1] * ex + j[1][1] * ey;

            let det = jtj00 * jtj11 - jtj01 * jtj01;
            if det.abs() < Scalar::EPSILON {
                break;
            }
            let dx = (jtj11 * jte0 - jtj01 * jte1) / det;
            let dy = (jtj00 * jte1 - jtj01 * jte0) / det;
            p = (p.0 + dx, p.1 + dy);
        }
        p
    }

    /// Normalize a pixel coordinate, undistort, denormalize.
    pub fn undistort_point(&self, p: (Scalar, Scalar)) -> (Scalar, Scalar) {
        let normalized = ((p.0 - self.cx) / self.fx, (p.1 - self.cy) / self.fy);
        let undistorted = self.undistort_normalized(normalized);
        (undistorted.0 * self.fx + self.cx, undistorted.1 * self.fy + self.cy)
    }

    /// The reverse of [`Self::undistort_point`] — project an undistorted
    /// image-plane point back through the rad-tan model. Used only by tests
    /// to build synthetic distorted inputs.
    pub fn distort_point(&self, p: (Scalar, Scalar)) -> (Scalar, Scalar) {
        let normalized = ((p.0 - self.cx) / self.fx, (p.1 - self.cy) / self.fy);
        let (distorted, _) = self.distort_normalized(normalized);
        (distorted.0 * self.fx + self.cx, distorted.1 * self.fy + self.cy)
    }
}

/// A precomputed per-pixel undistortion lookup, built once before streaming
/// events through trackers so the iterative solver never runs per event.
#[derive(Debug, Clone)]
pub struct UndistortionMap {
    width: u16,
    height: u16,
    table: Vec<(Scalar, Scalar)>,
}

impl UndistortionMap {
    pub fn build(camera: &PinholeRadTan) -> Self {
        let width = camera.width;
        let height = camera.height;
        let mut table = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                table.push(camera.undistort_point((x as Scalar, y as Scalar)));
            }
        }
        Self { width, height, table }
    }

    pub fn get(&self, x: u16, y: u16) -> (Scalar, Scalar) {
        debug_assert!(x < self.width && y < self.height, "pixel outside map bounds");
        self.table[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PinholeRadTan {
        PinholeRadTan {
            width: 240,
            height: 180,
            fx: 200.0,
            fy: 200.0,
            cx: 120.0,
            cy: 90.0,
            k1: -0.02,
            k2: 0.01,
            p1: 0.001,
            p2: -0.001,
            k3: 0.0,
        }
    }

    #[test]
    fn undistort_inverts_distort_within_tolerance() {
        let cam = camera();
        for &p in &[(130.0, 95.0), (120.0, 90.0), (60.0, 150.0), (200.0, 40.0)] {
            let distorted = cam.distort_point(p);
            let recovered = cam.undistort_point(distorted);
            assert!((recovered.0 - p.0).abs() < 1e-2, "x: {recovered:?} vs {p:?}");
            assert!((recovered.1 - p.1).abs() < 1e-2, "y: {recovered:?} vs {p:?}");
        }
    }

    #[test]
    fn undistortion_map_matches_per_pixel_solver() {
        let cam = camera();
        let map = UndistortionMap::build(&cam);
        assert_eq!(map.get(10, 20), cam.undistort_point((10.0, 20.0)));
    }
}
