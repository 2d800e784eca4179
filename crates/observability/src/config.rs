//! Logging configuration read from the environment.

use core::str::FromStr;

use thiserror::Error;

/// Environment variable holding the log output format.
pub const LOG_FORMAT_ENV: &str = "CHRONICLE_LOG_FORMAT";
/// Environment variable toggling event targets in log lines.
pub const LOG_TARGET_ENV: &str = "CHRONICLE_LOG_TARGET";

const DEFAULT_FILTER: &str = "info";

/// Log line format.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, human-oriented.
    Pretty,
    /// Single-line, human-oriented.
    Compact,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format `{0}` (expected json, pretty or compact)")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

/// Process-wide logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives (e.g. `info,chronicle_core=debug`).
    pub filter: String,
    pub format: LogFormat,
    /// Include the event target (module path) in each line.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Read `RUST_LOG`, `CHRONICLE_LOG_FORMAT` and `CHRONICLE_LOG_TARGET`.
    ///
    /// Missing or unparsable values fall back to the defaults (`info`, JSON,
    /// no target).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, file, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let filter = lookup("RUST_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(defaults.filter);

        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|raw| raw.parse::<LogFormat>().ok())
            .unwrap_or(defaults.format);

        let with_target = lookup(LOG_TARGET_ENV)
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.with_target);

        Self {
            filter,
            format,
            with_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(LogConfig::from_lookup(lookup(&[])), LogConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = LogConfig::from_lookup(lookup(&[
            ("RUST_LOG", "debug,chronicle_core=trace"),
            (LOG_FORMAT_ENV, "Pretty"),
            (LOG_TARGET_ENV, "true"),
        ]));

        assert_eq!(config.filter, "debug,chronicle_core=trace");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.with_target);
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let config = LogConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml")]));
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn blank_filter_falls_back_to_info() {
        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "  ")]));
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(" json ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
