//! Typed failure surface for calibration/seed text parsing. The tracking
//! core itself never errors (an out-of-range event is just `EventUpdate::
//! OutOfRange`) — these are failures in what feeds trackers, not the
//! trackers themselves.

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("seed string \"{0}\" has {1} comma-delimited tokens, expected 4 or 5")]
    WrongTokenCount(String, usize),
    #[error("seed field could not be parsed as a number: {0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error("calibration file has {0} whitespace-delimited fields, expected 9")]
    WrongFieldCount(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("calibration field could not be parsed as a number: {0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),
}
