//! Allow-lists and per-report defaults for the NHL endpoints.

use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};

pub const SORT_DIRECTIONS: &[&str] = &["ASC", "DESC"];
pub const POSITION_CODES: &[&str] = &["C", "L", "R", "D", "G"];
pub const HOME_OR_ROAD: &[&str] = &["H", "R"];
pub const GAME_RESULTS: &[&str] = &["W", "L", "O"];
pub const SHOOTS_CATCHES: &[&str] = &["L", "R"];

/// 1 pre-season, 2 regular season, 3 playoffs, 4 all-star.
pub const GAME_TYPES: std::ops::RangeInclusive<u8> = 1..=4;
pub const DEFAULT_GAME_TYPE: u8 = 2;

// Approximate population sizes used as search limits.
pub const ACTIVE_PLAYERS: u32 = 2_500;
pub const INACTIVE_PLAYERS: u32 = 22_000;
pub const TOTAL_PLAYERS: u32 = 25_000;

const COUNTRY_FIELDS: &[&str] = &[
    "id", "country3Code", "countryCode", "countryName", "hasPlayerStats", "imageUrl",
    "iocCode", "isActive", "nationalityName", "olympicUrl", "thumbnailUrl",
];

const FRANCHISE_FIELDS: &[&str] = &["fullName", "teamCommonName", "teamPlaceName", "id"];

const SEASON_FIELDS: &[&str] = &[
    "id", "allStarGameInUse", "conferencesInUse", "divisionsInUse", "endDate",
    "entryDraftInUse", "formattedSeasonId", "minimumPlayoffMinutesForGoalieStatsLeaders",
    "minimumRegularGamesForGoalieStatsLeaders", "nhlStanleyCupOwner", "numberOfGames",
    "olympicsParticipation", "pointForOTLossInUse", "preseasonStartdate",
    "regularSeasonEndDate", "rowInUse", "seasonOrdinal", "startDate",
    "supplementalDraftInUse", "tiesInUse", "totalPlayoffGames", "totalRegularSeasonGames",
    "wildcardInUse",
];

const DRAFT_ROUND_FIELDS: &[&str] = &["draftYear", "id", "rounds"];

const ROSTER_FIELDS: &[&str] = &[
    "id", "firstName", "lastName", "sweaterNumber", "positionCode", "shootsCatches",
    "heightInInches", "weightInPounds", "heightInCentimeters", "weightInKilograms",
    "birthDate", "birthCity", "birthCountry", "birthStateProvince",
];

const SKATER_SUMMARY_FIELDS: &[&str] = &[
    "points", "evPoints", "goals", "evGoals", "otGoals", "gameWinningGoals", "assists",
    "playerId", "gamesPlayed", "faceoffWinPct", "penaltyMinutes", "plusMinus", "ppPoints",
    "ppGoals", "shPoints", "shGoals", "shots", "shootingPct", "pointsPerGame",
    "timeOnIcePerGame", "skaterFullName", "lastName", "seasonId",
];

const GOALIE_SUMMARY_FIELDS: &[&str] = &[
    "wins", "losses", "otLosses", "ties", "savePct", "goalsAgainstAverage", "goalsAgainst",
    "shutouts", "saves", "shotsAgainst", "gamesPlayed", "gamesStarted", "timeOnIce",
    "playerId", "goalieFullName", "lastName", "seasonId",
];

const TEAM_SUMMARY_FIELDS: &[&str] = &[
    "points", "wins", "losses", "otLosses", "ties", "pointPct", "goalsFor", "goalsAgainst",
    "goalsForPerGame", "goalsAgainstPerGame", "gamesPlayed", "powerPlayPct", "penaltyKillPct",
    "shotsForPerGame", "shotsAgainstPerGame", "faceoffWinPct", "teamId", "teamFullName",
    "seasonId",
];

const SHIFT_FIELDS: &[&str] = &[
    "id", "playerId", "teamId", "period", "shiftNumber", "startTime", "endTime", "duration",
];

const SKATER_REPORTS: &[&str] = &[
    "summary", "bios", "faceoffpercentages", "faceoffwins", "goalsForAgainst", "realtime",
    "penalties", "penaltykill", "penaltyShots", "powerplay", "puckPossessions",
    "summaryshooting", "percentages", "scoringRates", "scoringpergame", "shootout",
    "shottype", "timeonice",
];

const GOALIE_REPORTS: &[&str] = &[
    "summary", "advanced", "bios", "daysrest", "penaltyShots", "savesByStrength",
    "shootout", "startedVsRelieved",
];

const TEAM_REPORTS: &[&str] = &[
    "summary", "faceoffpercentages", "faceoffwins", "goalsagainstbystrength",
    "goalsbyperiod", "goalsforbystrength", "leadingtrailing", "realtime",
    "outshootoutshotby", "penalties", "penaltykill", "penaltykilltime", "powerplay",
    "powerplaytime", "summaryshooting", "percentages", "scoretrailfirst", "shootout",
    "shottype", "goalgames",
];

/// Which sort-field allow-list applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortScope {
    Countries,
    Franchises,
    Seasons,
    DraftRounds,
    Roster,
    Shifts,
    Summary(ReportFamily),
}

impl SortScope {
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SortScope::Countries => COUNTRY_FIELDS,
            SortScope::Franchises => FRANCHISE_FIELDS,
            SortScope::Seasons => SEASON_FIELDS,
            SortScope::DraftRounds => DRAFT_ROUND_FIELDS,
            SortScope::Roster => ROSTER_FIELDS,
            SortScope::Shifts => SHIFT_FIELDS,
            SortScope::Summary(ReportFamily::Skater) => SKATER_SUMMARY_FIELDS,
            SortScope::Summary(ReportFamily::Goalie) => GOALIE_SUMMARY_FIELDS,
            SortScope::Summary(ReportFamily::Team) => TEAM_SUMMARY_FIELDS,
        }
    }

    /// Dotted keys such as `lastName.default` are checked by their first segment.
    pub fn allows(self, field: &str) -> bool {
        let head = field.split('.').next().unwrap_or(field);
        self.fields().contains(&head)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFamily {
    Skater,
    Goalie,
    Team,
}

impl ReportFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFamily::Skater => "skater",
            ReportFamily::Goalie => "goalie",
            ReportFamily::Team => "team",
        }
    }

    pub fn page_limit(self) -> u32 {
        match self {
            ReportFamily::Skater | ReportFamily::Goalie => 100,
            ReportFamily::Team => 50,
        }
    }

    pub fn reports(self) -> &'static [&'static str] {
        match self {
            ReportFamily::Skater => SKATER_REPORTS,
            ReportFamily::Goalie => GOALIE_REPORTS,
            ReportFamily::Team => TEAM_REPORTS,
        }
    }

    /// Property used by the player/team name filter.
    pub fn name_property(self) -> &'static str {
        match self {
            ReportFamily::Skater => "skaterFullName",
            ReportFamily::Goalie => "goalieFullName",
            ReportFamily::Team => "teamFullName",
        }
    }

    /// Sort allow-list, known only for the summary report.
    pub fn sort_scope(self, report: &str) -> Option<SortScope> {
        (report == "summary").then_some(SortScope::Summary(self))
    }
}

impl fmt::Display for ReportFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skater" => Ok(ReportFamily::Skater),
            "goalie" => Ok(ReportFamily::Goalie),
            "team" => Ok(ReportFamily::Team),
            other => Err(Error::validation(format!(
                "unknown report family '{}', expected skater, goalie or team",
                other
            ))),
        }
    }
}

/// Rejects `value` unless it appears in `allowed`.
pub fn check_allowed(name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "invalid {} '{}'; valid values: {}",
            name,
            value,
            allowed.join(", ")
        )))
    }
}
