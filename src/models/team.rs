use serde::{Deserialize, Serialize};

/// Franchise, standings and schedule-calendar details joined on full team name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub team_name: String,
    pub team_common_name: Option<String>,
    pub team_place_name: Option<String>,
    pub team_abbrev: Option<String>,
    pub conference_abbrev: Option<String>,
    pub conference_name: Option<String>,
    pub division_abbrev: Option<String>,
    pub division_name: Option<String>,
    pub franchise_id: Option<u64>,
    pub first_season_id: Option<u64>,
    pub last_season_id: Option<u64>,
    pub team_logo_light: Option<String>,
    pub team_logo_dark: Option<String>,
    pub team_id: Option<u64>,
}
