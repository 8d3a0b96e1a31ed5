//! Query-string modifiers understood by the stats REST base.

mod cayenne;
mod sort;
mod stats;

pub use cayenne::{fact_cayenne_exp, Comparator, FactClause, StatsFilter};
pub use sort::{sort_param, validate_sort, SortSpec};
pub use stats::StatsQuery;

use url::Url;

/// Appends one `include=<field>` pair per field.
pub fn append_includes<'a>(url: &mut Url, fields: impl IntoIterator<Item = &'a str>) {
    let mut pairs = url.query_pairs_mut();
    for field in fields {
        pairs.append_pair("include", field);
    }
}
