use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::model::HttpMethod;

/// Batch settings, deserializable from an embedding application's config.
///
/// ```toml
/// timeout_ms = 5000
/// method = "HEAD"
/// worker_count = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectOption {
    #[serde(rename = "timeout_ms", deserialize_with = "deserialize_millis")]
    pub timeout: Duration,
    pub method: HttpMethod,
    pub worker_count: usize,
}

impl Default for CollectOption {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            method: HttpMethod::Get,
            worker_count: 8,
        }
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}
