pub mod executor;
pub mod nhl;
pub mod paginate;
pub mod teams;

pub use executor::RequestExecutor;
pub use nhl::NhlClient;
pub use paginate::paginate;
pub use teams::join_team_information;
