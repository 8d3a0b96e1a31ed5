use std::collections::BTreeMap;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;
use crate::catalog::{ReportFamily, SortScope, ACTIVE_PLAYERS, INACTIVE_PLAYERS, TOTAL_PLAYERS};
use crate::config::{ApiConfig, Settings};
use crate::error::{Error, Result};
use crate::filter::project_fields;
use crate::models::{ListOptions, TeamInfo};
use crate::query::{append_includes, sort_param, validate_sort, StatsQuery};
use crate::services::executor::RequestExecutor;
use crate::services::paginate::paginate;
use crate::services::teams::join_team_information;
use crate::validate::{self, NOW};
use crate::view::take_view;

/// One method per NHL endpoint, all going through a shared [`RequestExecutor`].
#[derive(Clone)]
pub struct NhlClient {
    executor: RequestExecutor,
    stats_url: String,
    web_url: String,
    search_url: String,
    locale: String,
}

fn data_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn listing(records: Vec<Value>) -> Value {
    let total = records.len();
    json!({ "data": records, "total": total })
}

fn set_total(value: &mut Value, total: usize) {
    if let Value::Object(map) = value {
        map.insert("total".to_string(), json!(total));
    }
}

impl NhlClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let executor = RequestExecutor::from_settings(settings)?;
        Ok(Self::with_executor(executor, &settings.api))
    }

    pub fn with_executor(executor: RequestExecutor, api: &ApiConfig) -> Self {
        Self {
            executor,
            stats_url: api.stats_url.trim_end_matches('/').to_string(),
            web_url: api.web_url.trim_end_matches('/').to_string(),
            search_url: api.search_url.clone(),
            locale: api.locale.clone(),
        }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn validating(&self) -> bool {
        self.executor.validation()
    }

    fn stats_endpoint(&self, resource: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.stats_url, resource))?)
    }

    fn web_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.web_url, path)
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        debug!(url = url, "Fetching endpoint");
        self.executor.get_json(url).await
    }

    fn check_sort(&self, options: &ListOptions, scope: Option<SortScope>) -> Result<()> {
        if self.validating() {
            validate_sort(&options.sort, scope)?;
        }
        Ok(())
    }

    fn check_id(&self, name: &str, id: u64) -> Result<()> {
        if self.validating() {
            validate::positive_id(name, id)?;
        }
        Ok(())
    }

    fn check_date(&self, date: &str) -> Result<()> {
        if self.validating() {
            validate::date_or_now(date)?;
        }
        Ok(())
    }

    fn check_team_season(&self, team: &str, season: Option<&str>) -> Result<()> {
        if self.validating() {
            validate::team_code(team)?;
            if let Some(season) = season {
                validate::season(season)?;
            }
        }
        Ok(())
    }

    fn finish_view(&self, value: Value, view: Option<&str>) -> Result<Value> {
        match view {
            Some(path) => take_view(value, path, self.validating()),
            None => Ok(value),
        }
    }

    fn finish(&self, path: &str, options: &ListOptions, value: Value) -> Result<Value> {
        options.finish_at(path, value, self.validating())
    }

    // Stats REST base

    /// Server-sorted list endpoint; `fields` are requested as `include`.
    async fn stats_list(
        &self,
        resource: &str,
        scope: SortScope,
        includes: &[&str],
        options: &ListOptions,
    ) -> Result<Value> {
        self.check_sort(options, Some(scope))?;

        let mut url = self.stats_endpoint(resource)?;
        if !options.sort.is_empty() {
            url.query_pairs_mut().append_pair("sort", &sort_param(&options.sort)?);
        }
        append_includes(
            &mut url,
            includes.iter().copied().chain(options.fields.iter().map(String::as_str)),
        );

        let records = options.select(data_array(self.fetch(url.as_str()).await?), false);
        self.finish(url.as_str(), options, listing(records))
    }

    pub async fn config(&self, view: Option<&str>) -> Result<Value> {
        let url = self.stats_endpoint("config")?;
        let data = self.fetch(url.as_str()).await?;
        self.finish_view(data, view)
    }

    pub async fn countries(&self, include_state_provinces: bool, options: &ListOptions) -> Result<Value> {
        let includes: &[&str] = if include_state_provinces { &["stateProvinces"] } else { &[] };
        self.stats_list("country", SortScope::Countries, includes, options).await
    }

    pub async fn franchises(
        &self,
        include_first_season: bool,
        include_last_season: bool,
        options: &ListOptions,
    ) -> Result<Value> {
        let mut includes = Vec::new();
        if include_first_season {
            includes.push("firstSeason");
        }
        if include_last_season {
            includes.push("lastSeason");
        }
        self.stats_list("franchise", SortScope::Franchises, &includes, options).await
    }

    pub async fn seasons(&self, options: &ListOptions) -> Result<Value> {
        self.stats_list("season", SortScope::Seasons, &[], options).await
    }

    pub async fn draft_rounds(&self, options: &ListOptions) -> Result<Value> {
        self.stats_list("draft", SortScope::DraftRounds, &[], options).await
    }

    pub async fn shifts(&self, game_id: u64, options: &ListOptions) -> Result<Value> {
        self.check_id("game_id", game_id)?;
        self.check_sort(options, Some(SortScope::Shifts))?;

        let mut url = self.stats_endpoint("shiftcharts")?;
        {
            let mut pairs = url.query_pairs_mut();
            if !options.sort.is_empty() {
                pairs.append_pair("sort", &sort_param(&options.sort)?);
            }
            pairs.append_pair("cayenneExp", &format!("gameId={}", game_id));
        }

        let mut records = options.select(data_array(self.fetch(url.as_str()).await?), false);
        project_fields(&mut records, &options.fields);
        self.finish(url.as_str(), options, listing(records))
    }

    /// Every page of a stats report, concatenated. `query.sort` is sent to the
    /// server; `options.sort` reorders the concatenated records afterwards.
    pub async fn stats(
        &self,
        family: ReportFamily,
        report: &str,
        query: &StatsQuery,
        options: &ListOptions,
    ) -> Result<Value> {
        if self.validating() {
            query.validate(family, report)?;
            validate_sort(&options.sort, family.sort_scope(report))?;
        }

        let limit = query.page_limit(family);
        let records = paginate(&self.executor, limit, |start| {
            Ok(query.url(&self.stats_url, family, report, start)?.to_string())
        })
        .await?;

        info!(
            family = %family,
            report = report,
            records = records.len(),
            "Fetched stats report"
        );

        let path = query.url(&self.stats_url, family, report, 0)?;
        let records = options.shape(records);
        self.finish(path.as_str(), options, listing(records))
    }

    /// A single page of a stats report, as returned by the API.
    pub async fn stats_page(
        &self,
        family: ReportFamily,
        report: &str,
        query: &StatsQuery,
        start: u32,
    ) -> Result<Value> {
        if self.validating() {
            query.validate(family, report)?;
        }
        let url = query.url(&self.stats_url, family, report, start)?;
        self.fetch(url.as_str()).await
    }

    // Player search

    /// All players, or only active/inactive ones. `limit` defaults to the
    /// approximate population of the selected group.
    pub async fn search_players(
        &self,
        active: Option<bool>,
        limit: Option<u32>,
        options: &ListOptions,
    ) -> Result<Value> {
        self.check_sort(options, None)?;
        let limit = limit.unwrap_or(match active {
            Some(true) => ACTIVE_PLAYERS,
            Some(false) => INACTIVE_PLAYERS,
            None => TOTAL_PLAYERS,
        });
        if self.validating() && limit == 0 {
            return Err(Error::validation("search limit must be greater than zero"));
        }

        let mut url = Url::parse(&self.search_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("culture", &self.locale)
                .append_pair("limit", &limit.to_string())
                .append_pair("q", "*");
            if let Some(active) = active {
                pairs.append_pair("active", if active { "true" } else { "false" });
            }
        }

        let records = options.shape(data_array(self.fetch(url.as_str()).await?));
        self.finish(url.as_str(), options, listing(records))
    }

    // Web base

    pub async fn player_landing(&self, player_id: u64, options: &ListOptions) -> Result<Value> {
        self.check_id("player_id", player_id)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("player/{}/landing", player_id));
        let mut data = self.fetch(&url).await?;
        options.shape_at(&mut data, "seasonTotals");
        self.finish(&url, options, data)
    }

    pub async fn player_game_log(
        &self,
        player_id: u64,
        season: &str,
        game_type: u8,
        options: &ListOptions,
    ) -> Result<Value> {
        if self.validating() {
            validate::positive_id("player_id", player_id)?;
            validate::season(season)?;
            validate::game_type(game_type)?;
            validate_sort(&options.sort, None)?;
        }

        let url = self.web_endpoint(&format!(
            "player/{}/game-log/{}/{}",
            player_id, season, game_type
        ));
        let mut data = self.fetch(&url).await?;

        if self.validating() {
            check_player_game_type(&data, season, game_type)?;
        }

        options.shape_at(&mut data, "gameLog");
        self.finish(&url, options, data)
    }

    pub async fn roster(&self, team: &str, season: &str, options: &ListOptions) -> Result<Value> {
        self.check_team_season(team, Some(season))?;
        self.check_sort(options, Some(SortScope::Roster))?;

        let url = self.web_endpoint(&format!("roster/{}/{}", team, season));
        let mut data = self.fetch(&url).await?;

        let groups: Vec<String> = data
            .as_object()
            .map(|groups| groups.keys().cloned().collect())
            .unwrap_or_default();
        let total: usize = groups.iter().map(|group| options.shape_at(&mut data, group)).sum();
        set_total(&mut data, total);

        self.finish(&url, options, data)
    }

    /// Seasons in which the club iced a roster.
    pub async fn roster_seasons(&self, team: &str) -> Result<Value> {
        self.check_team_season(team, None)?;
        self.fetch(&self.web_endpoint(&format!("roster-season/{}", team))).await
    }

    pub async fn club_schedule(&self, team: &str, season: &str, view: Option<&str>) -> Result<Value> {
        self.check_team_season(team, Some(season))?;
        let data = self
            .fetch(&self.web_endpoint(&format!("club-schedule-season/{}/{}", team, season)))
            .await?;
        self.finish_view(data, view)
    }

    pub async fn club_stats(
        &self,
        team: &str,
        season: &str,
        game_type: u8,
        view: Option<&str>,
    ) -> Result<Value> {
        self.check_team_season(team, Some(season))?;
        if self.validating() {
            validate::game_type(game_type)?;
        }
        let data = self
            .fetch(&self.web_endpoint(&format!("club-stats/{}/{}/{}", team, season, game_type)))
            .await?;
        self.finish_view(data, view)
    }

    /// Seasons and game types for which club stats exist.
    pub async fn club_stats_seasons(&self, team: &str) -> Result<Value> {
        self.check_team_season(team, None)?;
        self.fetch(&self.web_endpoint(&format!("club-stats-season/{}", team))).await
    }

    pub async fn schedule(&self, date: &str, options: &ListOptions) -> Result<Value> {
        self.check_date(date)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("schedule/{}", date));
        let mut data = self.fetch(&url).await?;
        if let Some(Value::Array(weeks)) = data.get_mut("gameWeek") {
            for week in weeks.iter_mut() {
                options.shape_at(week, "games");
            }
        }
        self.finish(&url, options, data)
    }

    pub async fn schedule_calendar(&self, date: &str, view: Option<&str>) -> Result<Value> {
        self.check_date(date)?;
        let data = self
            .fetch(&self.web_endpoint(&format!("schedule-calendar/{}", date)))
            .await?;
        self.finish_view(data, view)
    }

    pub async fn standings(&self, date: &str, options: &ListOptions) -> Result<Value> {
        self.check_date(date)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("standings/{}", date));
        let mut data = self.fetch(&url).await?;
        let total = options.shape_at(&mut data, "standings");
        set_total(&mut data, total);
        self.finish(&url, options, data)
    }

    pub async fn standings_seasons(&self, options: &ListOptions) -> Result<Value> {
        self.check_sort(options, None)?;

        let url = self.web_endpoint("standings-season");
        let mut data = self.fetch(&url).await?;
        let total = options.shape_at(&mut data, "seasons");
        set_total(&mut data, total);
        self.finish(&url, options, data)
    }

    pub async fn scores(&self, date: &str, options: &ListOptions) -> Result<Value> {
        self.check_date(date)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("score/{}", date));
        let mut data = self.fetch(&url).await?;
        options.shape_at(&mut data, "games");
        self.finish(&url, options, data)
    }

    pub async fn play_by_play(&self, game_id: u64, options: &ListOptions) -> Result<Value> {
        self.check_id("game_id", game_id)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("gamecenter/{}/play-by-play", game_id));
        let mut data = self.fetch(&url).await?;
        options.shape_at(&mut data, "plays");
        self.finish(&url, options, data)
    }

    /// Player lines under `playerByGameStats.{awayTeam,homeTeam}.{group}` are shaped per group.
    pub async fn boxscore(&self, game_id: u64, options: &ListOptions) -> Result<Value> {
        self.check_id("game_id", game_id)?;
        self.check_sort(options, None)?;

        let url = self.web_endpoint(&format!("gamecenter/{}/boxscore", game_id));
        let mut data = self.fetch(&url).await?;
        if let Some(Value::Object(teams)) = data.get_mut("playerByGameStats") {
            for team in teams.values_mut() {
                let groups: Vec<String> = team
                    .as_object()
                    .map(|groups| groups.keys().cloned().collect())
                    .unwrap_or_default();
                for group in &groups {
                    options.shape_at(team, group);
                }
            }
        }
        self.finish(&url, options, data)
    }

    // Combined

    /// Current clubs keyed by full name, built from three sequential requests.
    pub async fn team_information(&self) -> Result<BTreeMap<String, TeamInfo>> {
        let defaults = ListOptions::default();
        let franchises = self.franchises(true, true, &defaults).await?;
        let standings = self.standings(NOW, &defaults).await?;
        let calendar = self.schedule_calendar(NOW, None).await?;

        Ok(join_team_information(&franchises, &standings, &calendar))
    }
}

/// The game log lists the game types played in each season; reject a type
/// the player never appeared in.
fn check_player_game_type(data: &Value, season: &str, game_type: u8) -> Result<()> {
    let Some(seasons) = data.get("playerStatsSeasons").and_then(Value::as_array) else {
        return Ok(());
    };
    let season_number: Option<u64> = season.parse().ok();
    let entry = seasons
        .iter()
        .find(|s| s.get("season").and_then(Value::as_u64) == season_number);

    let Some(types) = entry.and_then(|s| s.get("gameTypes")).and_then(Value::as_array) else {
        return Ok(());
    };
    if types.iter().any(|t| t.as_u64() == Some(u64::from(game_type))) {
        return Ok(());
    }

    let valid = types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    Err(Error::validation(format!(
        "invalid game type {} for season {}; valid game types: {}",
        game_type, season, valid
    )))
}
