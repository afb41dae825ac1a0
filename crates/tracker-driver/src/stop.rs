//! The only track-termination heuristic this workspace implements: a feature
//! has left the field of view once its patch would extend past the sensor
//! edge (matches the original batch tool's `stoppingCondition`).

use tracker_geom::{Hypothesis, PATCH_HALF};
use tracker_event::Scalar;

/// `true` once the tracker's patch footprint no longer fits inside a
/// `width x height` sensor.
pub fn left_field_of_view(pose: &Hypothesis, width: u16, height: u16) -> bool {
    let width = width as Scalar;
    let height = height as Scalar;
    !(pose.x >= PATCH_HALF
        && pose.y >= PATCH_HALF
        && pose.x + PATCH_HALF < width
        && pose.y + PATCH_HALF < height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_well_inside_the_sensor_has_not_left() {
        let pose = Hypothesis::new(0.0, 120.0, 90.0, 0.0);
        assert!(!left_field_of_view(&pose, 240, 180));
    }

    #[test]
    fn pose_past_the_right_edge_has_left() {
        let pose = Hypothesis::new(0.0, 239.0, 90.0, 0.0);
        assert!(left_field_of_view(&pose, 240, 180));
    }

    #[test]
    fn pose_at_the_left_margin_boundary_is_still_in_view() {
        let pose = Hypothesis::new(0.0, PATCH_HALF, PATCH_HALF, 0.0);
        assert!(!left_field_of_view(&pose, 240, 180));
    }
}
