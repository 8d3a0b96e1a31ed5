use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use config::{Config, ConfigBuilder, ConfigError};
use config::builder::DefaultState;
use tracing::debug;

const STATS_URL: &str = "https://api.nhle.com/stats/rest/en/";
const WEB_URL: &str = "https://api-web.nhle.com/v1/";
const SEARCH_URL: &str = "https://search.d3.nhle.com/api/v1/search/player";
const LOCALE: &str = "en-us";
const EMULATION: &str = "chrome";
const TIMEOUT_SECS: u64 = 10;
const RETRIES: u32 = 3;
const BACKOFF_MS: u64 = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub request: RequestConfig,
    pub validation: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub stats_url: String,
    pub web_url: String,
    pub search_url: String,
    pub locale: String,
    pub emulation: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    pub timeout_secs: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                stats_url: STATS_URL.to_string(),
                web_url: WEB_URL.to_string(),
                search_url: SEARCH_URL.to_string(),
                locale: LOCALE.to_string(),
                emulation: EMULATION.to_string(),
                headers: HashMap::new(),
            },
            request: RequestConfig {
                timeout_secs: TIMEOUT_SECS,
                retries: RETRIES,
                backoff_ms: BACKOFF_MS,
            },
            validation: true,
        }
    }
}

impl Settings {
    /// Defaults, then `config/default.*` if present, then `NHL__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("NHL")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder.build()?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(config::File::from(path.as_ref()));
        Self::finish(builder.build()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.stats_url", STATS_URL)?
            .set_default("api.web_url", WEB_URL)?
            .set_default("api.search_url", SEARCH_URL)?
            .set_default("api.locale", LOCALE)?
            .set_default("api.emulation", EMULATION)?
            .set_default("request.timeout_secs", TIMEOUT_SECS)?
            .set_default("request.retries", RETRIES)?
            .set_default("request.backoff_ms", BACKOFF_MS)?
            .set_default("validation", true)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;

        debug!(
            stats_url = %settings.api.stats_url,
            web_url = %settings.api.web_url,
            timeout_secs = settings.request.timeout_secs,
            retries = settings.request.retries,
            validation = settings.validation,
            "Loaded settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "request:\n  retries: 5\n  backoff_ms: 0\napi:\n  headers:\n    user-agent: nhl-stats-test\nvalidation: false"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.request.retries, 5);
        assert_eq!(settings.request.backoff_ms, 0);
        assert_eq!(settings.request.timeout_secs, TIMEOUT_SECS);
        assert_eq!(settings.api.web_url, WEB_URL);
        assert_eq!(
            settings.api.headers.get("user-agent").map(String::as_str),
            Some("nhl-stats-test")
        );
        assert!(!settings.validation);
    }

    #[test]
    fn default_matches_builtin_layer() {
        let settings = Settings::default();
        assert_eq!(settings.api.stats_url, STATS_URL);
        assert_eq!(settings.request.retries, RETRIES);
        assert!(settings.validation);
    }
}
