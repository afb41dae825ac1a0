//! Per-tracker seed parsing: `t,x,y,theta` or `t,x,y,theta,id`,
//! comma-delimited, matching `original_source`'s `getTrackerStateFromString`.

use crate::errors::SeedError;
use std::path::Path;
use tracker_event::{Scalar, Time};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSeed {
    pub t: Time,
    pub x: Scalar,
    pub y: Scalar,
    pub theta: Scalar,
    /// Opaque identifier threaded through to the output trail. Defaults to
    /// `0` when the 4-token form is used.
    pub id: u64,
}

pub fn parse_seed(s: &str) -> Result<TrackerSeed, SeedError> {
    let tokens: Vec<&str> = s.trim().split(',').collect();
    if tokens.len() != 4 && tokens.len() != 5 {
        return Err(SeedError::WrongTokenCount(s.to_string(), tokens.len()));
    }

    let t: Time = tokens[0].trim().parse()?;
    let x: Scalar = tokens[1].trim().parse()?;
    let y: Scalar = tokens[2].trim().parse()?;
    let theta: Scalar = tokens[3].trim().parse()?;
    let id = if tokens.len() == 5 {
        tokens[4].trim().parse::<Scalar>()? as u64
    } else {
        0
    };

    Ok(TrackerSeed { t, x, y, theta, id })
}

pub fn load_seeds(path: impl AsRef<Path>) -> Result<Vec<TrackerSeed>, SeedError> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_seed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_token_seed_with_default_id() {
        let seed = parse_seed("0.0,120.5,90.25,0.0").unwrap();
        assert_eq!(seed.id, 0);
        assert_eq!(seed.x, 120.5);
    }

    #[test]
    fn parses_five_token_seed_with_explicit_id() {
        let seed = parse_seed("1.5,10,20,0.1,7").unwrap();
        assert_eq!(seed.id, 7);
    }

    #[test]
    fn rejects_wrong_token_count() {
        let err = parse_seed("1.0,2.0,3.0").unwrap_err();
        assert!(matches!(err, SeedError::WrongTokenCount(_, 3)));
    }

    #[test]
    fn load_seeds_skips_blank_lines() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0.0,1.0,2.0,0.0\n\n1.0,3.0,4.0,0.0,5\n").unwrap();
        let seeds = load_seeds(tmp.path()).unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[1].id, 5);
    }
}
