//! Pose hypotheses with cached trigonometry, and the incremental offset
//! tables used to generate a neighbourhood around the current pose.

use crate::patch::PATCH_HALF;
use std::f32::consts::PI;
use tracker_event::{Scalar, Time};

pub const DELTA_THETA: Scalar = 4.0 * PI / 180.0;

/// A translation/rotation increment applied to a center hypothesis to build
/// the neighbourhood searched at every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub dx: Scalar,
    pub dy: Scalar,
    pub dtheta: Scalar,
}

/// The "8-neighbour + 2-rotation" generator (`N = 11`). Index 0 is always the
/// null offset — callers must never reorder this table.
pub const OFFSETS_8NEIGH_2ROT: [Offset; 11] = [
    Offset { dx: 0.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: 1.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: -1.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: 1.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: -1.0, dtheta: 0.0 },
    Offset { dx: 1.0, dy: 1.0, dtheta: 0.0 },
    Offset { dx: -1.0, dy: 1.0, dtheta: 0.0 },
    Offset { dx: -1.0, dy: -1.0, dtheta: 0.0 },
    Offset { dx: 1.0, dy: -1.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: 0.0, dtheta: DELTA_THETA },
    Offset { dx: 0.0, dy: 0.0, dtheta: -DELTA_THETA },
];

/// The "4-neighbour + 2-rotation" alternative (`N = 7`).
pub const OFFSETS_4NEIGH_2ROT: [Offset; 7] = [
    Offset { dx: 0.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: 1.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: -1.0, dy: 0.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: 1.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: -1.0, dtheta: 0.0 },
    Offset { dx: 0.0, dy: 0.0, dtheta: DELTA_THETA },
    Offset { dx: 0.0, dy: 0.0, dtheta: -DELTA_THETA },
];

/// An immutable 4-DoF pose with cached `cos`/`sin`. Index 0 of a hypothesis
/// set is always the null hypothesis: the tracker's current believed pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypothesis {
    pub t: Time,
    pub x: Scalar,
    pub y: Scalar,
    pub theta: Scalar,
    pub ctheta: Scalar,
    pub stheta: Scalar,
}

impl Hypothesis {
    pub fn new(t: Time, x: Scalar, y: Scalar, theta: Scalar) -> Self {
        Self {
            t,
            x,
            y,
            theta,
            ctheta: theta.cos(),
            stheta: theta.sin(),
        }
    }

    /// Apply an incremental offset, keeping `t` unchanged (time only ever
    /// advances via [`Self::with_time`]).
    pub fn with_offset(&self, o: Offset) -> Self {
        Self::new(self.t, self.x + o.dx, self.y + o.dy, self.theta + o.dtheta)
    }

    pub fn with_time(&self, t: Time) -> Self {
        Self { t, ..*self }
    }

    /// Transform a world coordinate into this hypothesis' patch coordinates.
    pub fn patch_coords(&self, ex: Scalar, ey: Scalar) -> (Scalar, Scalar) {
        let dx = ex - self.x;
        let dy = ey - self.y;
        let xp = dx * self.ctheta + dy * self.stheta + PATCH_HALF;
        let yp = -dx * self.stheta + dy * self.ctheta + PATCH_HALF;
        (xp, yp)
    }

    /// Elementwise [`Self::patch_coords`] over parallel coordinate vectors.
    pub fn patch_coords_batch<const N: usize>(
        &self,
        exs: &[Scalar; N],
        eys: &[Scalar; N],
    ) -> ([Scalar; N], [Scalar; N]) {
        let mut xps = [0.0; N];
        let mut yps = [0.0; N];
        for i in 0..N {
            let (xp, yp) = self.patch_coords(exs[i], eys[i]);
            xps[i] = xp;
            yps[i] = yp;
        }
        (xps, yps)
    }

    /// Euclidean in-range test: `(ex - x)^2 + (ey - y)^2 < PatchHalf^2`.
    pub fn is_in_range(&self, ex: Scalar, ey: Scalar) -> bool {
        let dx = ex - self.x;
        let dy = ey - self.y;
        dx * dx + dy * dy < PATCH_HALF * PATCH_HALF
    }
}

/// Regenerate a full hypothesis set as `center + offset[i]` for every `i`,
/// keeping `center`'s time. Index 0 must remain the pure center.
pub fn generate<const N: usize>(center: &Hypothesis, offsets: &[Offset; N]) -> [Hypothesis; N] {
    let mut out = [*center; N];
    for i in 0..N {
        out[i] = center.with_offset(offsets[i]);
    }
    out
}
