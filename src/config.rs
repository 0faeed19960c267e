//! Engine configuration from environment variables or a TOML document.
//!
//! Environment values that are missing or invalid fall back to defaults
//! without failing. TOML input is parsed strictly and reports `ConfigError`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `FEATURE_CACHE_STRATEGY` | `cache_and_reuse` | `always_new`, `reuse_singleton` or `cache_and_reuse` |
//! | `FEATURE_CACHE_LRU_CAPACITY` | 200 | Max sessions kept by `cache_and_reuse` |
//! | `FEATURE_CACHE_LOG_LEVEL` | `info` | Filter directive for the subscriber |
//! | `FEATURE_CACHE_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `FEATURE_CACHE_LOG_FILE` | (stderr) | Write logs to this file |
//!
//! # TOML
//!
//! ```toml
//! [replace]
//! policy = "cache_and_reuse"
//! capacity = 50
//!
//! [log]
//! format = "pretty"
//! level = "feature_cache=debug"
//!
//! [params]
//! resolution = [0.5, 0.5, 2.0]
//!
//! [params.values]
//! threshold = 128.0
//! ```

use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calc::{Calculation, CalculationMap};
use crate::memory::DEFAULT_CAPACITY;
use crate::session::InitParams;
use crate::strategy::{ReplacePolicy, SessionReplacer};
use crate::telemetry::{LogConfig, LogFormat};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config document: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Effective configuration summary (serializable).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub strategy: &'static str,
    pub lru_capacity: Option<usize>,
    pub log_level: String,
    pub log_format: &'static str,
    pub log_file: Option<PathBuf>,
}

/// Everything needed to build a replace strategy and its logging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub replace: ReplacePolicy,
    pub log: LogConfig,
    pub params: InitParams,
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load the replace policy from environment.
fn load_replace_policy() -> ReplacePolicy {
    let capacity = parse_usize("FEATURE_CACHE_LRU_CAPACITY", DEFAULT_CAPACITY).max(1);
    match std::env::var("FEATURE_CACHE_STRATEGY") {
        Ok(name) => ReplacePolicy::from_name(&name, capacity)
            .unwrap_or(ReplacePolicy::CacheAndReuse { capacity }),
        Err(_) => ReplacePolicy::CacheAndReuse { capacity },
    }
}

/// Load logging configuration from environment.
fn load_log_config() -> LogConfig {
    let defaults = LogConfig::default();
    let level = std::env::var("FEATURE_CACHE_LOG_LEVEL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(defaults.level);
    let format = std::env::var("FEATURE_CACHE_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or(defaults.format);
    let output_path = std::env::var("FEATURE_CACHE_LOG_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    LogConfig { format, level, output_path }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to defaults without panicking.
pub fn load() -> EngineConfig {
    EngineConfig {
        replace: load_replace_policy(),
        log: load_log_config(),
        params: InitParams::default(),
    }
}

impl EngineConfig {
    /// Parse a TOML document. Omitted sections take their defaults; a
    /// capacity of zero is raised to one.
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(doc)?;
        if let ReplacePolicy::CacheAndReuse { capacity } = &mut config.replace {
            *capacity = (*capacity).max(1);
        }
        Ok(config)
    }

    /// Build the configured strategy.
    pub fn build_replacer<C, M>(&self) -> SessionReplacer<C, M>
    where
        C: Calculation,
        C::Input: Eq + Hash + Clone + fmt::Debug,
        M: CalculationMap<Input = C::Input>,
    {
        SessionReplacer::from_policy(self.replace, self.params.clone())
    }

    /// Return a serializable summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            strategy: self.replace.name(),
            lru_capacity: match self.replace {
                ReplacePolicy::CacheAndReuse { capacity } => Some(capacity),
                _ => None,
            },
            log_level: self.log.level.clone(),
            log_format: match self.log.format {
                LogFormat::Json => "json",
                LogFormat::Pretty => "pretty",
            },
            log_file: self.log.output_path.clone(),
        }
    }
}
