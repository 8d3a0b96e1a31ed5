use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nhl_stats::catalog::{ReportFamily, DEFAULT_GAME_TYPE};
use nhl_stats::validate::NOW;
use nhl_stats::{FactClause, ListOptions, NhlClient, RecordFilter, Settings, SortSpec, StatsQuery};

#[derive(Parser, Debug)]
#[command(name = "nhl", about = "Query the public NHL stats, web and search APIs")]
struct Cli {
    /// Settings file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip argument validation and send requests as given
    #[arg(long, global = true)]
    no_validation: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    #[command(flatten)]
    list: ListArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Sort key as field or field:ASC|DESC, repeatable
    #[arg(long, global = true)]
    sort: Vec<String>,

    /// Keep only these top-level fields
    #[arg(long, global = true, value_delimiter = ',')]
    fields: Vec<String>,

    /// JSON object of key -> value, list of values or null
    #[arg(long, global = true)]
    filter: Option<String>,

    /// JSON object of records to drop, same shape as --filter
    #[arg(long, global = true)]
    exclude: Option<String>,

    /// Dotted path into the result, e.g. data.0.fullName
    #[arg(long, global = true)]
    view: Option<String>,

    /// Wrap the result with the request path and the options used
    #[arg(long, global = true)]
    info: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stats API configuration
    Config,
    Countries {
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        state_provinces: bool,
    },
    Franchises {
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        first_season: bool,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        last_season: bool,
    },
    Seasons,
    DraftRounds,
    Shifts {
        game_id: u64,
    },
    /// Skater, goalie or team report, every page
    Stats(StatsArgs),
    Search {
        /// Only active (true) or inactive (false) players
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Player {
        player_id: u64,
    },
    GameLog {
        player_id: u64,
        season: String,
        #[arg(long, default_value_t = DEFAULT_GAME_TYPE)]
        game_type: u8,
    },
    Roster {
        team: String,
        season: String,
    },
    RosterSeasons {
        team: String,
    },
    ClubSchedule {
        team: String,
        season: String,
    },
    ClubStats {
        team: String,
        season: String,
        #[arg(long, default_value_t = DEFAULT_GAME_TYPE)]
        game_type: u8,
    },
    ClubStatsSeasons {
        team: String,
    },
    Schedule {
        #[arg(default_value = NOW)]
        date: String,
    },
    Calendar {
        #[arg(default_value = NOW)]
        date: String,
    },
    Standings {
        #[arg(default_value = NOW)]
        date: String,
    },
    StandingsSeasons,
    Scores {
        #[arg(default_value = NOW)]
        date: String,
    },
    PlayByPlay {
        game_id: u64,
    },
    Boxscore {
        game_id: u64,
    },
    /// Current clubs with franchise, standings and calendar details
    Teams,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// skater, goalie or team
    family: String,
    #[arg(default_value = "summary")]
    report: String,
    #[arg(long)]
    season: Option<String>,
    #[arg(long)]
    start_season: Option<String>,
    #[arg(long)]
    end_season: Option<String>,
    #[arg(long)]
    start_date: Option<String>,
    #[arg(long)]
    end_date: Option<String>,
    #[arg(long, default_value_t = DEFAULT_GAME_TYPE)]
    game_type: u8,
    #[arg(long)]
    franchise_id: Option<u32>,
    #[arg(long)]
    opponent_franchise_id: Option<u32>,
    /// H or R
    #[arg(long)]
    home_or_road: Option<String>,
    /// W, L or O
    #[arg(long)]
    game_result: Option<String>,
    #[arg(long)]
    position: Vec<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    rookie: Option<bool>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    hall_of_fame: Option<bool>,
    #[arg(long)]
    birth_state_province: Option<String>,
    #[arg(long)]
    nationality: Option<String>,
    /// L or R
    #[arg(long)]
    shoots_catches: Option<String>,
    #[arg(long)]
    draft_round: Option<u32>,
    #[arg(long)]
    draft_year: Option<u32>,
    /// Report one row per player rather than per player-season
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    aggregate: bool,
    #[arg(long, default_value_t = 0)]
    min_gp: u32,
    #[arg(long)]
    max_gp: Option<u32>,
    /// Numeric filter like goals>=20, repeatable
    #[arg(long)]
    fact: Vec<String>,
    #[arg(long)]
    limit: Option<u32>,
}

impl ListArgs {
    fn options(&self) -> Result<ListOptions> {
        let sort = self
            .sort
            .iter()
            .map(|s| s.parse::<SortSpec>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListOptions {
            sort,
            filter: parse_filter(self.filter.as_deref())?,
            exclude: parse_filter(self.exclude.as_deref())?,
            fields: self.fields.clone(),
            view: self.view.clone(),
            info: self.info,
        })
    }
}

fn parse_filter(raw: Option<&str>) -> Result<Option<RecordFilter>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(raw).context("filter is not valid JSON")?;
    Ok(Some(RecordFilter::from_json(&value)?))
}

impl StatsArgs {
    fn family(&self) -> Result<ReportFamily> {
        Ok(self.family.parse()?)
    }

    /// Sort keys belong to the server-side query for stats reports.
    fn query(&self, sort: Vec<SortSpec>) -> Result<StatsQuery> {
        let mut query = StatsQuery {
            aggregate: self.aggregate,
            min_gp: self.min_gp,
            max_gp: self.max_gp,
            sort,
            limit: self.limit,
            ..StatsQuery::default()
        };
        query.facts = self
            .fact
            .iter()
            .map(|f| f.parse::<FactClause>())
            .collect::<Result<Vec<_>, _>>()?;

        let filter = &mut query.filter;
        filter.season = self.season.clone();
        filter.start_season = self.start_season.clone();
        filter.end_season = self.end_season.clone();
        filter.start_date = self.start_date.clone();
        filter.end_date = self.end_date.clone();
        filter.game_type = Some(self.game_type);
        filter.franchise_id = self.franchise_id;
        filter.opponent_franchise_id = self.opponent_franchise_id;
        filter.home_or_road = self.home_or_road.clone();
        filter.game_result = self.game_result.clone();
        filter.positions = self.position.clone();
        filter.player_name = self.name.clone();
        filter.is_rookie = self.rookie;
        filter.is_active = self.active;
        filter.is_in_hall_of_fame = self.hall_of_fame;
        filter.birth_state_province_code = self.birth_state_province.clone();
        filter.nationality_code = self.nationality.clone();
        filter.shoots_catches = self.shoots_catches.clone();
        filter.draft_round = self.draft_round;
        filter.draft_year = self.draft_year;
        Ok(query)
    }
}

async fn run(client: &NhlClient, command: Command, mut list: ListOptions) -> Result<Value> {
    let view = list.view.clone();
    let view = view.as_deref();

    let value = match command {
        Command::Config => client.config(view).await?,
        Command::Countries { state_provinces } => client.countries(state_provinces, &list).await?,
        Command::Franchises {
            first_season,
            last_season,
        } => client.franchises(first_season, last_season, &list).await?,
        Command::Seasons => client.seasons(&list).await?,
        Command::DraftRounds => client.draft_rounds(&list).await?,
        Command::Shifts { game_id } => client.shifts(game_id, &list).await?,
        Command::Stats(args) => {
            let family = args.family()?;
            let query = args.query(std::mem::take(&mut list.sort))?;
            client.stats(family, &args.report, &query, &list).await?
        }
        Command::Search { active, limit } => client.search_players(active, limit, &list).await?,
        Command::Player { player_id } => client.player_landing(player_id, &list).await?,
        Command::GameLog {
            player_id,
            season,
            game_type,
        } => client.player_game_log(player_id, &season, game_type, &list).await?,
        Command::Roster { team, season } => client.roster(&team, &season, &list).await?,
        Command::RosterSeasons { team } => client.roster_seasons(&team).await?,
        Command::ClubSchedule { team, season } => client.club_schedule(&team, &season, view).await?,
        Command::ClubStats {
            team,
            season,
            game_type,
        } => client.club_stats(&team, &season, game_type, view).await?,
        Command::ClubStatsSeasons { team } => client.club_stats_seasons(&team).await?,
        Command::Schedule { date } => client.schedule(&date, &list).await?,
        Command::Calendar { date } => client.schedule_calendar(&date, view).await?,
        Command::Standings { date } => client.standings(&date, &list).await?,
        Command::StandingsSeasons => client.standings_seasons(&list).await?,
        Command::Scores { date } => client.scores(&date, &list).await?,
        Command::PlayByPlay { game_id } => client.play_by_play(game_id, &list).await?,
        Command::Boxscore { game_id } => client.boxscore(game_id, &list).await?,
        Command::Teams => serde_json::to_value(client.team_information().await?)?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };
    if cli.no_validation {
        settings.validation = false;
    }

    info!(
        stats_url = %settings.api.stats_url,
        validation = settings.validation,
        "Starting nhl client"
    );

    let client = NhlClient::new(&settings)?;
    let list = cli.list.options()?;
    let value = run(&client, cli.command, list).await?;

    let output = if cli.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_are_on_by_default() {
        let cli = Cli::try_parse_from(["nhl", "franchises"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Franchises {
                first_season: true,
                last_season: true
            }
        ));

        let cli = Cli::try_parse_from(["nhl", "countries", "--state-provinces", "false"]).unwrap();
        assert!(matches!(cli.command, Command::Countries { state_provinces: false }));
    }

    #[test]
    fn stats_flags_reach_the_filter() {
        let cli = Cli::try_parse_from([
            "nhl", "stats", "skater", "--season", "20232024", "--opponent-franchise-id", "6",
            "--home-or-road", "H", "--game-result", "W", "--shoots-catches", "L",
            "--birth-state-province", "ON", "--draft-round", "1", "--draft-year", "2015",
            "--hall-of-fame", "false",
        ])
        .unwrap();
        let Command::Stats(args) = cli.command else {
            panic!("expected the stats subcommand");
        };
        assert_eq!(args.report, "summary");

        let filter = args.query(Vec::new()).unwrap().filter;
        assert_eq!(filter.opponent_franchise_id, Some(6));
        assert_eq!(filter.home_or_road.as_deref(), Some("H"));
        assert_eq!(filter.game_result.as_deref(), Some("W"));
        assert_eq!(filter.shoots_catches.as_deref(), Some("L"));
        assert_eq!(filter.birth_state_province_code.as_deref(), Some("ON"));
        assert_eq!(filter.draft_round, Some(1));
        assert_eq!(filter.draft_year, Some(2015));
        assert_eq!(filter.is_in_hall_of_fame, Some(false));
        assert!(filter.validate().is_ok());
    }
}
