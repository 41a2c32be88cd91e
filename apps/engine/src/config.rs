use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Runtime configuration loaded from environment variables.
/// Every variable is optional; defaults match the interactive editor.
#[derive(Debug, Clone)]
pub struct Config {
    pub debounce_ms: u64,
    pub max_alternatives: usize,
    pub min_relevance: f64,
    pub no_match_threshold: f64,
    pub parse_cache_capacity: usize,
    pub max_attachment_chars: usize,
    pub catalog_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            debounce_ms: settings.debounce.as_millis() as u64,
            max_alternatives: settings.max_alternatives,
            min_relevance: settings.min_relevance,
            no_match_threshold: settings.no_match_threshold,
            parse_cache_capacity: settings.parse_cache_capacity,
            max_attachment_chars: settings.max_attachment_chars,
            catalog_path: None,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            debounce_ms: parse_env("DEBOUNCE_MS", defaults.debounce_ms)?,
            max_alternatives: parse_env("MAX_ALTERNATIVES", defaults.max_alternatives)?,
            min_relevance: parse_env("MIN_RELEVANCE", defaults.min_relevance)?,
            no_match_threshold: parse_env("NO_MATCH_THRESHOLD", defaults.no_match_threshold)?,
            parse_cache_capacity: parse_env("PARSE_CACHE_CAPACITY", defaults.parse_cache_capacity)?,
            max_attachment_chars: parse_env("MAX_ATTACHMENT_CHARS", defaults.max_attachment_chars)?,
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Plain settings handed to the engine components.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            max_alternatives: self.max_alternatives,
            min_relevance: self.min_relevance,
            no_match_threshold: self.no_match_threshold,
            parse_cache_capacity: self.parse_cache_capacity.max(1),
            max_attachment_chars: self.max_attachment_chars,
        }
    }
}

/// Tunables injected into the parser cache, context engine, adapter and session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub debounce: Duration,
    pub max_alternatives: usize,
    /// Minimum score (0–100) for a template to become the primary match.
    pub min_relevance: f64,
    /// Templates scoring at or below this are never offered as alternatives.
    pub no_match_threshold: f64,
    pub parse_cache_capacity: usize,
    pub max_attachment_chars: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            max_alternatives: 3,
            min_relevance: 20.0,
            no_match_threshold: 5.0,
            parse_cache_capacity: 64,
            max_attachment_chars: 20_000,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
