pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod services;
pub mod utils;
pub mod validate;
pub mod view;

pub use crate::config::Settings;
pub use error::{Error, Result};
pub use filter::RecordFilter;
pub use models::{ListOptions, TeamInfo};
pub use query::{FactClause, SortSpec, StatsFilter, StatsQuery};
pub use services::{NhlClient, RequestExecutor};
