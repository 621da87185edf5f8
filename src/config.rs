//! Ambient configuration for the `modulemd-tool` binary (SPEC_FULL.md §1
//! "Configuration"). Grounded on `src/config.rs` in the teacher repo: a
//! `serde_yaml`-backed config file with a `LogLevel` that converts to
//! `slog::Level`, read via `Config::read`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for slog::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Critical => slog::Level::Critical,
            LogLevel::Error => slog::Level::Error,
            LogLevel::Warning => slog::Level::Warning,
            LogLevel::Info => slog::Level::Info,
            LogLevel::Debug => slog::Level::Debug,
            LogLevel::Trace => slog::Level::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Default parse lenience applied by every subcommand unless overridden
/// on the command line (spec §4.5, §9 Open Questions).
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct ParseDefaults {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub allow_legacy_u64_overflow: bool,
    #[serde(default = "default_true")]
    pub reject_compressed_input: bool,
}

impl Default for ParseDefaults {
    fn default() -> Self {
        Self {
            strict: false,
            allow_legacy_u64_overflow: false,
            reject_compressed_input: true,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub log_level: LogLevel,
    #[serde(default)]
    pub parse: ParseDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            parse: ParseDefaults::default(),
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    pub fn read(file: &str) -> Result<Self> {
        let config = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to load config file {:?}", file))?;
        let config: Self = serde_yaml::from_str(&config)
            .with_context(|| format!("Failed to parse config file {:?}", file))?;

        config.validate()?;
        Ok(config)
    }
}
