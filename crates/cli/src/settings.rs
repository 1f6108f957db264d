//! Operator-facing configuration: policy ceiling overrides, default
//! isolation level, and logging format. Layered `config::Config` sources
//! (an optional file, then `PK_` environment overrides) on top of
//! built-in defaults, the same builder shape as every other crate in the
//! pack that reaches for the `config` crate.

use config::{Config, ConfigError, Environment, File};
use pk_core::IsolationLevel;
use pk_sandbox::PolicyCeiling;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings resolved before a run starts. Distinct from
/// `pk_engine::EngineConfig`, which carries run-time collaborators
/// (the `PreviousStatusProvider`) rather than operator-tunable values.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub max_memory_mb: Option<u64>,
    pub max_cpu_ms: Option<u64>,
    pub max_wall_ms: Option<u64>,
    pub max_threads: Option<u32>,
    pub isolation_level: Option<IsolationLevel>,
    pub log_format: LogFormat,
}

impl Default for CliSettings {
    fn default() -> Self {
        let standard = PolicyCeiling::standard();
        Self {
            max_memory_mb: standard.max_memory_mb,
            max_cpu_ms: standard.max_cpu_ms,
            max_wall_ms: standard.max_wall_ms,
            max_threads: standard.max_threads,
            isolation_level: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl CliSettings {
    /// Load settings from an optional config file, overridden by `PK_*`
    /// environment variables. Fields absent from every source fall back
    /// to the kernel's documented defaults via `#[serde(default)]`.
    pub fn from_sources(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("PK").separator("_"));
        builder.build()?.try_deserialize()
    }

    pub fn policy_ceiling(&self) -> PolicyCeiling {
        PolicyCeiling {
            max_memory_mb: self.max_memory_mb,
            max_cpu_ms: self.max_cpu_ms,
            max_wall_ms: self.max_wall_ms,
            max_threads: self.max_threads,
            min_isolation: None,
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
