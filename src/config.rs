use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::recommend::corpus::{VectorizerParams, DEFAULT_MAX_FEATURES};
use crate::recommend::fallback::DEFAULT_FALLBACK_LIMIT;
use crate::recommend::ranker::DEFAULT_TOP_K;
use crate::recommend::RecommendSettings;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
/// Everything has a default, so an empty environment is a valid config.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Number of recommendations stored per user (WAYFARER_TOP_K)
    pub top_k: usize,
    /// Vocabulary cap for the TF-IDF space (WAYFARER_MAX_FEATURES)
    pub max_features: usize,
    /// Cap on fallback search results (WAYFARER_FALLBACK_LIMIT)
    pub fallback_limit: usize,
    /// Drop English stop words before weighting (WAYFARER_STOP_WORDS=english)
    pub stop_words: bool,
    /// Web server bind address (WAYFARER_BIND)
    #[cfg(feature = "web")]
    pub bind: String,
    /// Web server port (WAYFARER_PORT)
    #[cfg(feature = "web")]
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let stop_words = match env::var("WAYFARER_STOP_WORDS").as_deref() {
            Ok("english") => true,
            // "none" or unset both mean no stop words
            Ok("none") | Err(_) => false,
            Ok(other) => anyhow::bail!(
                "WAYFARER_STOP_WORDS must be 'english' or 'none', got '{other}'"
            ),
        };

        Ok(Self {
            db_path: env::var("WAYFARER_DB_PATH").unwrap_or_else(|_| "./wayfarer.db".to_string()),
            top_k: positive_var("WAYFARER_TOP_K", DEFAULT_TOP_K)?,
            max_features: positive_var("WAYFARER_MAX_FEATURES", DEFAULT_MAX_FEATURES)?,
            fallback_limit: positive_var("WAYFARER_FALLBACK_LIMIT", DEFAULT_FALLBACK_LIMIT)?,
            stop_words,
            #[cfg(feature = "web")]
            bind: env::var("WAYFARER_BIND").unwrap_or_else(|_| "127.0.0.1".to_string()),
            #[cfg(feature = "web")]
            port: parse_var("WAYFARER_PORT", 8000)?,
        })
    }

    /// Pipeline settings derived from this config.
    pub fn recommend_settings(&self) -> RecommendSettings {
        RecommendSettings {
            top_k: self.top_k,
            fallback_limit: self.fallback_limit,
            vectorizer: VectorizerParams {
                max_features: self.max_features,
                stop_words: self.stop_words,
            },
        }
    }
}

/// Parse an env var, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Like `parse_var`, but zero is rejected.
fn positive_var(name: &str, default: usize) -> Result<usize> {
    let value = parse_var(name, default)?;
    if value == 0 {
        anyhow::bail!("{name} must be at least 1");
    }
    Ok(value)
}
