use std::collections::{BTreeMap, HashMap};
use serde_json::Value;
use crate::models::TeamInfo;
use crate::view::nested_value;

fn string_at(value: &Value, key: &str) -> Option<String> {
    nested_value(value, key).and_then(Value::as_str).map(String::from)
}

fn u64_at(value: &Value, key: &str) -> Option<u64> {
    nested_value(value, key).and_then(Value::as_u64)
}

fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    nested_value(value, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Joins franchise records (`data[]`), current standings (`standings[]`) and
/// the schedule calendar (`teams[]`) on the team's full name. Only teams
/// present in both franchises and standings are returned.
pub fn join_team_information(
    franchises: &Value,
    standings: &Value,
    calendar: &Value,
) -> BTreeMap<String, TeamInfo> {
    let by_name: HashMap<&str, &Value> = array_at(franchises, "data")
        .iter()
        .filter_map(|f| Some((nested_value(f, "fullName")?.as_str()?, f)))
        .collect();

    let mut teams = BTreeMap::new();

    for standing in array_at(standings, "standings") {
        let Some(name) = nested_value(standing, "teamName.default").and_then(Value::as_str) else {
            continue;
        };
        let Some(franchise) = by_name.get(name) else {
            continue;
        };

        teams.insert(
            name.to_string(),
            TeamInfo {
                team_name: name.to_string(),
                team_common_name: string_at(franchise, "teamCommonName"),
                team_place_name: string_at(franchise, "teamPlaceName"),
                team_abbrev: string_at(standing, "teamAbbrev.default"),
                conference_abbrev: string_at(standing, "conferenceAbbrev"),
                conference_name: string_at(standing, "conferenceName"),
                division_abbrev: string_at(standing, "divisionAbbrev"),
                division_name: string_at(standing, "divisionName"),
                franchise_id: u64_at(franchise, "id"),
                first_season_id: u64_at(franchise, "firstSeason.id"),
                last_season_id: u64_at(franchise, "lastSeason.id"),
                team_logo_light: string_at(standing, "teamLogo"),
                team_logo_dark: None,
                team_id: None,
            },
        );
    }

    for team in array_at(calendar, "teams") {
        let Some(name) = nested_value(team, "name.default").and_then(Value::as_str) else {
            continue;
        };
        if let Some(info) = teams.get_mut(name) {
            info.team_logo_dark = string_at(team, "darkLogo");
            info.team_id = u64_at(team, "id");
        }
    }

    teams
}
