//! Calibration file loading: `fx fy cx cy k1 k2 p1 p2 k3`, whitespace
//! delimited. Sensor size comes from the CLI's `--camera-size` flag, not
//! this file — matching the original command-line surface.

use crate::camera::PinholeRadTan;
use crate::errors::CalibrationError;
use std::path::Path;
use tracker_event::Scalar;

pub fn load_calibration(path: impl AsRef<Path>, width: u16, height: u16) -> Result<PinholeRadTan, CalibrationError> {
    let content = std::fs::read_to_string(path)?;
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() != 9 {
        return Err(CalibrationError::WrongFieldCount(fields.len()));
    }

    let mut parsed = [0.0 as Scalar; 9];
    for (i, field) in fields.iter().enumerate() {
        parsed[i] = field.parse::<Scalar>()?;
    }

    Ok(PinholeRadTan {
        width,
        height,
        fx: parsed[0],
        fy: parsed[1],
        cx: parsed[2],
        cy: parsed[3],
        k1: parsed[4],
        k2: parsed[5],
        p1: parsed[6],
        p2: parsed[7],
        k3: parsed[8],
    })
}
