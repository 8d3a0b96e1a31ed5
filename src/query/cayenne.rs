use std::fmt;
use std::str::FromStr;
use crate::catalog::{
    check_allowed, ReportFamily, GAME_RESULTS, HOME_OR_ROAD, POSITION_CODES,
    SHOOTS_CATCHES,
};
use crate::error::{Error, Result};
use crate::validate;

const AND: &str = " and ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    AtLeast,
    Equal,
    AtMost,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::AtLeast => ">=",
            Comparator::Equal => "=",
            Comparator::AtMost => "<=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            ">=" => Ok(Comparator::AtLeast),
            "=" => Ok(Comparator::Equal),
            "<=" => Ok(Comparator::AtMost),
            other => Err(Error::validation(format!(
                "invalid comparator '{}'; valid comparators: >=, =, <=",
                other
            ))),
        }
    }
}

/// A `property{comparator}value` clause of `factCayenneExp`.
#[derive(Debug, Clone, PartialEq)]
pub struct FactClause {
    pub property: String,
    pub comparator: Comparator,
    pub value: String,
}

impl FactClause {
    pub fn new(property: impl Into<String>, comparator: Comparator, value: impl ToString) -> Self {
        Self {
            property: property.into(),
            comparator,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for FactClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.property, self.comparator, self.value)
    }
}

/// `goals>=20`, `gamesPlayed<=10`, `wins=5`.
impl FromStr for FactClause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        for op in [">=", "<=", "="] {
            if let Some((property, value)) = s.split_once(op) {
                if property.is_empty() || value.is_empty() {
                    break;
                }
                return Ok(FactClause::new(property, op.parse()?, value));
            }
        }
        Err(Error::validation(format!(
            "invalid fact clause '{}', expected property>=value, property=value or property<=value",
            s
        )))
    }
}

/// Numeric-range filter: games-played bounds first, then caller clauses.
pub fn fact_cayenne_exp(min_gp: u32, max_gp: Option<u32>, clauses: &[FactClause]) -> String {
    let mut parts = vec![format!("gamesPlayed>={}", min_gp)];
    if let Some(max_gp) = max_gp {
        parts.push(format!("gamesPlayed<={}", max_gp));
    }
    parts.extend(clauses.iter().map(ToString::to_string));
    parts.join(AND)
}

/// Equality filters rendered into `cayenneExp`.
///
/// Only one time window applies: a season range wins over a date range,
/// which wins over a single season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsFilter {
    pub season: Option<String>,
    pub start_season: Option<String>,
    pub end_season: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub game_type: Option<u8>,
    pub franchise_id: Option<u32>,
    pub opponent_franchise_id: Option<u32>,
    pub home_or_road: Option<String>,
    pub game_result: Option<String>,
    pub positions: Vec<String>,
    pub player_name: Option<String>,
    pub is_rookie: Option<bool>,
    pub is_active: Option<bool>,
    pub is_in_hall_of_fame: Option<bool>,
    pub birth_state_province_code: Option<String>,
    pub nationality_code: Option<String>,
    pub shoots_catches: Option<String>,
    pub draft_round: Option<u32>,
    pub draft_year: Option<u32>,
}

impl StatsFilter {
    pub fn season(season: impl Into<String>) -> Self {
        Self {
            season: Some(season.into()),
            ..Self::default()
        }
    }

    fn season_range(&self) -> Option<(&str, &str)> {
        Some((self.start_season.as_deref()?, self.end_season.as_deref()?))
    }

    fn date_range(&self) -> Option<(&str, &str)> {
        Some((self.start_date.as_deref()?, self.end_date.as_deref()?))
    }

    /// True when either date bound is set, which switches the report to per-game rows.
    pub fn is_game(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        match (&self.start_season, &self.end_season) {
            (Some(start), Some(end)) => {
                validate::season(start)?;
                validate::season(end)?;
                if start > end {
                    return Err(Error::validation(format!(
                        "start season {} is after end season {}",
                        start, end
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(Error::validation(
                    "a season range needs both start_season and end_season",
                ));
            }
        }

        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => {
                validate::date(start)?;
                validate::date(end)?;
                if start > end {
                    return Err(Error::validation(format!(
                        "start date {} is after end date {}",
                        start, end
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(Error::validation(
                    "a date range needs both start_date and end_date",
                ));
            }
        }

        if let Some(season) = &self.season {
            validate::season(season)?;
        }

        if let Some(game_type) = self.game_type {
            validate::game_type(game_type)?;
        }
        if let Some(home_or_road) = &self.home_or_road {
            check_allowed("home or road", home_or_road, HOME_OR_ROAD)?;
        }
        if let Some(result) = &self.game_result {
            check_allowed("game result", result, GAME_RESULTS)?;
        }
        for position in &self.positions {
            check_allowed("position", position, POSITION_CODES)?;
        }
        if let Some(shoots_catches) = &self.shoots_catches {
            check_allowed("shoots/catches", shoots_catches, SHOOTS_CATCHES)?;
        }
        Ok(())
    }

    pub fn cayenne_exp(&self, family: ReportFamily) -> String {
        let mut parts = Vec::new();

        if let Some((start, end)) = self.season_range() {
            parts.push(format!("seasonId<={} and seasonId>={}", end, start));
        } else if let Some((start, end)) = self.date_range() {
            parts.push(format!("gameDate<='{}' and gameDate>='{}'", end, start));
        } else if let Some(season) = &self.season {
            parts.push(format!("seasonId={}", season));
        }

        if let Some(game_type) = self.game_type {
            parts.push(format!("gameTypeId={}", game_type));
        }
        if let Some(id) = self.franchise_id {
            parts.push(format!("franchiseId={}", id));
        }
        if let Some(id) = self.opponent_franchise_id {
            parts.push(format!("opponentFranchiseId={}", id));
        }
        if let Some(value) = &self.home_or_road {
            parts.push(format!("homeRoad='{}'", value));
        }
        if let Some(value) = &self.game_result {
            parts.push(format!("decision='{}'", value));
        }
        match self.positions.as_slice() {
            [] => {}
            [single] => parts.push(format!("positionCode='{}'", single)),
            many => {
                let any = many
                    .iter()
                    .map(|p| format!("positionCode='{}'", p))
                    .collect::<Vec<_>>()
                    .join(" or ");
                parts.push(format!("({})", any));
            }
        }
        if let Some(name) = &self.player_name {
            parts.push(format!("{} likeIgnoreCase '%{}%'", family.name_property(), name));
        }
        if let Some(flag) = self.is_rookie {
            parts.push(format!("isRookie={}", flag as u8));
        }
        if let Some(flag) = self.is_active {
            parts.push(format!("active={}", flag as u8));
        }
        if let Some(flag) = self.is_in_hall_of_fame {
            parts.push(format!("isInHallOfFame={}", flag as u8));
        }
        if let Some(value) = &self.birth_state_province_code {
            parts.push(format!("birthStateProvinceCode='{}'", value));
        }
        if let Some(value) = &self.nationality_code {
            parts.push(format!("nationalityCode='{}'", value));
        }
        if let Some(value) = &self.shoots_catches {
            parts.push(format!("shootsCatches='{}'", value));
        }
        if let Some(value) = self.draft_round {
            parts.push(format!("draftRound={}", value));
        }
        if let Some(value) = self.draft_year {
            parts.push(format!("draftYear='{}'", value));
        }

        parts.join(AND)
    }
}
