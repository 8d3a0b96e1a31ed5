mod settings;

pub use settings::{ApiConfig, RequestConfig, Settings};
