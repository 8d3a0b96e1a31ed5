mod options;
mod response;
mod team;

pub use options::ListOptions;
pub use response::StatsPage;
pub use team::TeamInfo;
