use url::Url;
use crate::catalog::{check_allowed, ReportFamily, DEFAULT_GAME_TYPE};
use crate::error::{Error, Result};
use crate::query::cayenne::{fact_cayenne_exp, FactClause, StatsFilter};
use crate::query::sort::{sort_param, validate_sort, SortSpec};
use crate::validate;

/// Parameters of a stats report request (`/stats/rest/en/{family}/{report}`).
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub aggregate: bool,
    pub filter: StatsFilter,
    pub min_gp: u32,
    pub max_gp: Option<u32>,
    pub facts: Vec<FactClause>,
    pub sort: Vec<SortSpec>,
    /// Page size; the family default when unset.
    pub limit: Option<u32>,
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self {
            aggregate: true,
            filter: StatsFilter {
                game_type: Some(DEFAULT_GAME_TYPE),
                ..StatsFilter::default()
            },
            min_gp: 0,
            max_gp: None,
            facts: Vec::new(),
            sort: Vec::new(),
            limit: None,
        }
    }
}

impl StatsQuery {
    pub fn for_season(season: impl Into<String>) -> Self {
        let mut query = Self::default();
        query.filter.season = Some(season.into());
        query
    }

    pub fn page_limit(&self, family: ReportFamily) -> u32 {
        self.limit.unwrap_or_else(|| family.page_limit())
    }

    pub fn validate(&self, family: ReportFamily, report: &str) -> Result<()> {
        check_allowed(&format!("{} report", family), report, family.reports())?;
        self.filter.validate()?;
        validate::games_played(self.min_gp, self.max_gp)?;
        validate_sort(&self.sort, family.sort_scope(report))?;
        if self.limit == Some(0) {
            return Err(Error::validation("page limit must be greater than zero"));
        }
        Ok(())
    }

    /// Report URL for the page starting at `start`. `factCayenneExp` is
    /// placed before `cayenneExp`; the API ignores one of them otherwise.
    pub fn url(&self, stats_base: &str, family: ReportFamily, report: &str, start: u32) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            stats_base.trim_end_matches('/'),
            family,
            report
        ))?;

        let sort = if self.sort.is_empty() {
            None
        } else {
            Some(sort_param(&self.sort)?)
        };
        let cayenne = self.filter.cayenne_exp(family);

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("isAggregate", bool_str(self.aggregate))
                .append_pair("isGame", bool_str(self.filter.is_game()))
                .append_pair("start", &start.to_string())
                .append_pair("limit", &self.page_limit(family).to_string());
            if let Some(sort) = &sort {
                pairs.append_pair("sort", sort);
            }
            pairs.append_pair("factCayenneExp", &fact_cayenne_exp(self.min_gp, self.max_gp, &self.facts));
            if !cayenne.is_empty() {
                pairs.append_pair("cayenneExp", &cayenne);
            }
        }

        Ok(url)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
