use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use nhl_stats::catalog::ReportFamily;
use nhl_stats::clients::{RawResponse, Transport};
use nhl_stats::utils::RetryPolicy;
use nhl_stats::{
    Error, ListOptions, NhlClient, RecordFilter, RequestExecutor, Result, Settings, SortSpec,
    StatsQuery,
};

/// Answers every request from `respond` and keeps the requested URLs.
struct Fake {
    respond: Box<dyn Fn(&Url) -> Value + Send + Sync>,
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl Transport for Fake {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.urls.lock().unwrap().push(url.to_string());
        let parsed = Url::parse(url)?;
        Ok(RawResponse::ok_json(&(self.respond)(&parsed)))
    }
}

fn client_with<F>(validation: bool, respond: F) -> (NhlClient, Arc<Fake>)
where
    F: Fn(&Url) -> Value + Send + Sync + 'static,
{
    let fake = Arc::new(Fake {
        respond: Box::new(respond),
        urls: Mutex::new(Vec::new()),
    });
    let policy = RetryPolicy {
        timeout: Duration::from_secs(1),
        retries: 0,
        backoff: Duration::ZERO,
    };
    let executor = RequestExecutor::new(fake.clone(), policy, validation);
    let settings = Settings::default();
    (NhlClient::with_executor(executor, &settings.api), fake)
}

fn requested(fake: &Fake) -> Vec<String> {
    fake.urls.lock().unwrap().clone()
}

fn query_value(url: &str, key: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn franchises_request_includes_and_sort() {
    let (client, fake) = client_with(true, |_| {
        json!({"data": [
            {"id": 1, "fullName": "Montreal Canadiens"},
            {"id": 5, "fullName": "Toronto Maple Leafs"}
        ], "total": 2})
    });
    let options = ListOptions {
        sort: vec![SortSpec::desc("fullName")],
        filter: Some(RecordFilter::new().eq("id", 5)),
        ..ListOptions::default()
    };

    let result = client.franchises(true, true, &options).await.unwrap();

    assert_eq!(result["total"], json!(1));
    assert_eq!(result["data"][0]["fullName"], json!("Toronto Maple Leafs"));

    let urls = requested(&fake);
    assert_eq!(urls.len(), 1);
    let url = Url::parse(&urls[0]).unwrap();
    assert_eq!(url.path(), "/stats/rest/en/franchise");
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("sort".to_string(), r#"[{"property":"fullName","direction":"DESC"}]"#.to_string()),
            ("include".to_string(), "firstSeason".to_string()),
            ("include".to_string(), "lastSeason".to_string()),
        ]
    );
}

#[tokio::test]
async fn invalid_arguments_make_no_requests() {
    let (client, fake) = client_with(true, |_| json!({}));

    let bad_sort = ListOptions {
        sort: vec![SortSpec::asc("hits")],
        ..ListOptions::default()
    };
    assert!(matches!(
        client.countries(false, &bad_sort).await,
        Err(Error::Validation(_))
    ));
    assert!(client.roster("tor", "20232024", &ListOptions::default()).await.is_err());
    assert!(client.roster("TOR", "20232025", &ListOptions::default()).await.is_err());
    assert!(client.player_landing(0, &ListOptions::default()).await.is_err());
    assert!(client.schedule("2024-13-01", &ListOptions::default()).await.is_err());
    assert!(client.club_stats("TOR", "20232024", 7, None).await.is_err());
    assert!(client
        .stats(ReportFamily::Goalie, "realtime", &StatsQuery::default(), &ListOptions::default())
        .await
        .is_err());

    assert!(requested(&fake).is_empty());
}

#[tokio::test]
async fn validation_off_sends_arguments_through() {
    let (client, fake) = client_with(false, |_| json!({"forwards": []}));

    client.roster("tor", "2023", &ListOptions::default()).await.unwrap();

    assert_eq!(
        requested(&fake),
        vec!["https://api-web.nhle.com/v1/roster/tor/2023".to_string()]
    );
}

#[tokio::test]
async fn stats_walks_every_page() {
    let (client, fake) = client_with(true, |url| {
        let start: usize = url
            .query_pairs()
            .find(|(k, _)| k == "start")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);
        let end = (start + 2).min(5);
        let data: Vec<Value> = (start..end).map(|i| json!({"playerId": i})).collect();
        json!({"data": data, "total": 5})
    });
    let mut query = StatsQuery::for_season("20232024");
    query.limit = Some(2);
    query.sort = vec![SortSpec::desc("points")];

    let result = client
        .stats(ReportFamily::Skater, "summary", &query, &ListOptions::default())
        .await
        .unwrap();

    assert_eq!(result["total"], json!(5));
    let ids: Vec<u64> = result["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["playerId"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    let urls = requested(&fake);
    let starts: Vec<String> = urls.iter().filter_map(|u| query_value(u, "start")).collect();
    assert_eq!(starts, vec!["0", "2", "4"]);
    assert_eq!(
        query_value(&urls[0], "cayenneExp").as_deref(),
        Some("seasonId=20232024 and gameTypeId=2")
    );
    assert!(urls[0].find("factCayenneExp").unwrap() < urls[0].find("&cayenneExp").unwrap());
}

#[tokio::test]
async fn shifts_filter_on_game_id() {
    let (client, fake) = client_with(true, |_| {
        json!({"data": [
            {"playerId": 8, "period": 1, "duration": "00:40"},
            {"playerId": 9, "period": 2, "duration": "01:10"}
        ]})
    });
    let options = ListOptions {
        fields: vec!["playerId".into()],
        exclude: Some(RecordFilter::new().eq("period", 2)),
        ..ListOptions::default()
    };

    let result = client.shifts(2023020001, &options).await.unwrap();

    assert_eq!(result, json!({"data": [{"playerId": 8}], "total": 1}));
    assert_eq!(
        query_value(&requested(&fake)[0], "cayenneExp").as_deref(),
        Some("gameId=2023020001")
    );
}

#[tokio::test]
async fn search_uses_locale_and_population_limit() {
    let (client, fake) = client_with(true, |_| {
        json!([
            {"playerId": "8478402", "name": "Connor McDavid", "active": true},
            {"playerId": "8471675", "name": "Sidney Crosby", "active": true}
        ])
    });
    let options = ListOptions {
        sort: vec![SortSpec::asc("name")],
        ..ListOptions::default()
    };

    let result = client.search_players(Some(true), None, &options).await.unwrap();

    assert_eq!(result["total"], json!(2));
    assert_eq!(result["data"][0]["name"], json!("Connor McDavid"));

    let url = &requested(&fake)[0];
    assert!(url.starts_with("https://search.d3.nhle.com/api/v1/search/player?"));
    assert_eq!(query_value(url, "culture").as_deref(), Some("en-us"));
    assert_eq!(query_value(url, "limit").as_deref(), Some("2500"));
    assert_eq!(query_value(url, "q").as_deref(), Some("*"));
    assert_eq!(query_value(url, "active").as_deref(), Some("true"));
}

#[tokio::test]
async fn roster_shapes_each_position_group() {
    let (client, _) = client_with(true, |_| {
        json!({
            "forwards": [
                {"id": 1, "positionCode": "C", "sweaterNumber": 34},
                {"id": 2, "positionCode": "L", "sweaterNumber": 88}
            ],
            "defensemen": [{"id": 3, "positionCode": "D", "sweaterNumber": 44}],
            "goalies": [{"id": 4, "positionCode": "G", "sweaterNumber": 35}]
        })
    });
    let options = ListOptions {
        sort: vec![SortSpec::desc("sweaterNumber")],
        filter: Some(RecordFilter::new().any_of("positionCode", ["C", "L", "G"])),
        ..ListOptions::default()
    };

    let result = client.roster("TOR", "20232024", &options).await.unwrap();

    assert_eq!(result["total"], json!(3));
    assert_eq!(result["forwards"][0]["id"], json!(2));
    assert_eq!(result["defensemen"], json!([]));
    assert_eq!(result["goalies"][0]["id"], json!(4));
}

#[tokio::test]
async fn views_are_strict_only_with_validation() {
    let body = json!({"gameWeek": [{"date": "2024-01-10", "games": []}]});

    let (strict, _) = client_with(true, {
        let body = body.clone();
        move |_| body.clone()
    });
    let found = strict
        .schedule("2024-01-10", &ListOptions::view("gameWeek.0.date"))
        .await
        .unwrap();
    assert_eq!(found, json!("2024-01-10"));
    assert!(matches!(
        strict.schedule("now", &ListOptions::view("gameWeek.0.venue")).await,
        Err(Error::Validation(_))
    ));

    let (lenient, _) = client_with(false, move |_| body.clone());
    let missing = lenient
        .schedule("now", &ListOptions::view("gameWeek.0.venue"))
        .await
        .unwrap();
    assert_eq!(missing, Value::Null);
}

#[tokio::test]
async fn team_information_joins_three_sources() {
    let (client, fake) = client_with(true, |url| match url.path() {
        "/stats/rest/en/franchise" => json!({"data": [
            {"id": 5, "fullName": "Toronto Maple Leafs", "teamCommonName": "Maple Leafs",
             "teamPlaceName": "Toronto", "firstSeason": {"id": 19171918}, "lastSeason": null}
        ]}),
        "/v1/standings/now" => json!({"standings": [
            {"teamName": {"default": "Toronto Maple Leafs"}, "teamAbbrev": {"default": "TOR"},
             "divisionName": "Atlantic"}
        ]}),
        "/v1/schedule-calendar/now" => json!({"teams": [
            {"id": 10, "name": {"default": "Toronto Maple Leafs"}, "darkLogo": "dark.svg"}
        ]}),
        _ => Value::Null,
    });

    let teams = client.team_information().await.unwrap();

    assert_eq!(requested(&fake).len(), 3);
    let leafs = &teams["Toronto Maple Leafs"];
    assert_eq!(leafs.team_abbrev.as_deref(), Some("TOR"));
    assert_eq!(leafs.division_name.as_deref(), Some("Atlantic"));
    assert_eq!(leafs.franchise_id, Some(5));
    assert_eq!(leafs.team_id, Some(10));
    assert_eq!(leafs.team_logo_dark.as_deref(), Some("dark.svg"));
}

fn unsorted_report() -> impl Fn(&Url) -> Value + Send + Sync + 'static {
    |_| json!({"data": [{"playerId": 3}, {"playerId": 1}, {"playerId": 2}], "total": 3})
}

#[tokio::test]
async fn stats_rejects_bad_list_sort_before_requesting() {
    let (client, fake) = client_with(true, unsorted_report());
    let options = ListOptions {
        sort: vec![SortSpec::new("playerId", "SIDEWAYS")],
        ..ListOptions::default()
    };

    let result = client
        .stats(ReportFamily::Skater, "summary", &StatsQuery::for_season("20232024"), &options)
        .await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(requested(&fake).is_empty());
}

#[tokio::test]
async fn stats_applies_list_sort_to_all_pages() {
    let (client, _) = client_with(true, unsorted_report());
    let options = ListOptions {
        sort: vec![SortSpec::asc("playerId")],
        ..ListOptions::default()
    };

    let result = client
        .stats(ReportFamily::Skater, "summary", &StatsQuery::for_season("20232024"), &options)
        .await
        .unwrap();

    assert_eq!(
        result["data"],
        json!([{"playerId": 1}, {"playerId": 2}, {"playerId": 3}])
    );
}

#[tokio::test]
async fn info_reports_the_request_path() {
    let (client, _) = client_with(true, |_| json!({"games": [{"id": 1}]}));
    let options = ListOptions {
        info: true,
        ..ListOptions::default()
    };

    let result = client.scores("2024-01-10", &options).await.unwrap();

    assert_eq!(result["path"], json!("https://api-web.nhle.com/v1/score/2024-01-10"));
    assert_eq!(result["sort"], Value::Null);
    assert_eq!(result["response"]["games"][0]["id"], json!(1));
}
