use serde::Deserialize;
use serde_json::Value;

/// One page of a stats REST list endpoint.
#[derive(Debug, Deserialize)]
pub struct StatsPage {
    #[serde(default)]
    pub data: Vec<Value>,
    pub total: Option<u64>,
}
