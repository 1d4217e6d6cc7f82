use std::time::Duration;

use serde::Deserialize;

use crate::source::CompletionPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, merged into every request
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Response language, merged into every request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Validity window of cached responses, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Completion policy for fan-out sources
    #[serde(default)]
    pub fan_out_policy: CompletionPolicy,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would silently disable a layer
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cache_ttl_secs == 0 {
            anyhow::bail!("CACHE_TTL_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
