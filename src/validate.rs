//! Argument checks run before any request when validation is enabled.

use chrono::NaiveDate;
use crate::catalog::GAME_TYPES;
use crate::error::{Error, Result};

pub const NOW: &str = "now";

pub fn positive_id(name: &str, id: u64) -> Result<()> {
    if id == 0 {
        return Err(Error::validation(format!("{} must be a positive integer", name)));
    }
    Ok(())
}

/// Eight digits, start year followed by the next year: `20232024`.
pub fn season(season: &str) -> Result<()> {
    let invalid = || {
        Error::validation(format!(
            "invalid season '{}', expected start and end year such as 20232024",
            season
        ))
    };

    if season.len() != 8 || !season.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let start: u32 = season[..4].parse().map_err(|_| invalid())?;
    let end: u32 = season[4..].parse().map_err(|_| invalid())?;
    if end != start + 1 {
        return Err(invalid());
    }
    Ok(())
}

/// Three-letter upper-case club abbreviation.
pub fn team_code(code: &str) -> Result<()> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "invalid team code '{}', expected a three-letter abbreviation such as TOR",
            code
        )))
    }
}

/// Strict `YYYY-MM-DD`.
pub fn date(date: &str) -> Result<()> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::validation(format!("invalid date '{}': {}", date, e)))?;
    if parsed.format("%Y-%m-%d").to_string() != date {
        return Err(Error::validation(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            date
        )));
    }
    Ok(())
}

pub fn date_or_now(value: &str) -> Result<()> {
    if value == NOW { Ok(()) } else { date(value) }
}

pub fn game_type(game_type: u8) -> Result<()> {
    if GAME_TYPES.contains(&game_type) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "invalid game type {}, expected 1 (pre-season), 2 (regular), 3 (playoffs) or 4 (all-star)",
            game_type
        )))
    }
}

pub fn games_played(min_gp: u32, max_gp: Option<u32>) -> Result<()> {
    match max_gp {
        Some(max_gp) if max_gp < min_gp => Err(Error::validation(format!(
            "maximum games played {} is below minimum {}",
            max_gp, min_gp
        ))),
        _ => Ok(()),
    }
}
