use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::app::rendering::{colors, Color};

pub const TICK_RATE_ENV_VAR: &str = "FRAMEKIT_TICK_RATE";
pub const LOG_FILE_ENV_VAR: &str = "FRAMEKIT_LOG_FILE";
pub const DEFAULT_LOG_FILE: &str = "log.txt";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub tick_rate: u32,
    pub pause_on_focus_loss: bool,
    pub clear_color: Color,
    pub random_seed: Option<u64>,
    pub metrics_log_interval_ms: u64,
    pub log: LogConfig,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            window_title: "framekit".to_string(),
            window_width: 800,
            window_height: 600,
            fullscreen: false,
            tick_rate: 60,
            pause_on_focus_loss: true,
            clear_color: colors::BLACK,
            random_seed: None,
            metrics_log_interval_ms: 1000,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            default_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path} at '{field_path}': {source}")]
    Parse {
        path: PathBuf,
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FrameworkConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|(field_path, source)| ConfigError::Parse {
            path: path.to_path_buf(),
            field_path,
            source,
        })
    }

    fn from_json_str(raw: &str) -> Result<Self, (String, serde_json::Error)> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| (error.path().to_string(), error.into_inner()))
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.tick_rate = resolve_tick_rate(self.tick_rate);
        match env::var(LOG_FILE_ENV_VAR) {
            Ok(value) if value.trim().is_empty() => self.log.file = None,
            Ok(value) => self.log.file = Some(PathBuf::from(value)),
            Err(env::VarError::NotPresent) => {}
            Err(err) => {
                warn!(
                    env_var = LOG_FILE_ENV_VAR,
                    error = %err,
                    "unable to read log-file env var; keeping config value"
                );
            }
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    pub fn metrics_log_interval(&self) -> Duration {
        if self.metrics_log_interval_ms == 0 {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(self.metrics_log_interval_ms)
        }
    }
}

fn resolve_tick_rate(config_tick_rate: u32) -> u32 {
    match env::var(TICK_RATE_ENV_VAR) {
        Ok(value) => parse_tick_rate(&value).unwrap_or_else(|| {
            warn!(
                env_var = TICK_RATE_ENV_VAR,
                value = value.as_str(),
                "invalid tick-rate env var value; falling back to config"
            );
            config_tick_rate
        }),
        Err(env::VarError::NotPresent) => config_tick_rate,
        Err(err) => {
            warn!(
                env_var = TICK_RATE_ENV_VAR,
                error = %err,
                "unable to read tick-rate env var; falling back to config"
            );
            config_tick_rate
        }
    }
}

fn parse_tick_rate(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|rate| *rate > 0)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_classic_framework_setup() {
        let config = FrameworkConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert!(config.pause_on_focus_loss);
        assert!(!config.fullscreen);
        assert_eq!(config.clear_color, colors::BLACK);
        assert_eq!(config.log.file, Some(PathBuf::from("log.txt")));
    }

    #[test]
    fn tick_interval_for_60hz_is_expected() {
        let interval = FrameworkConfig::default().tick_interval();
        assert!((interval.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);

        let zero = FrameworkConfig {
            tick_rate: 0,
            ..FrameworkConfig::default()
        };
        assert_eq!(zero.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn zero_metrics_interval_falls_back_to_one_second() {
        let config = FrameworkConfig {
            metrics_log_interval_ms: 0,
            ..FrameworkConfig::default()
        };
        assert_eq!(config.metrics_log_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = FrameworkConfig::from_json_str(
            r#"{ "window_title": "Pong", "fullscreen": true, "log": { "file": null } }"#,
        )
        .expect("valid config");
        assert_eq!(config.window_title, "Pong");
        assert!(config.fullscreen);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.log.file, None);
        assert_eq!(config.log.default_filter, "info");
    }

    #[test]
    fn parse_error_names_offending_field() {
        let (field_path, _) = FrameworkConfig::from_json_str(r#"{ "log": { "file": 5 } }"#)
            .expect_err("wrong type");
        assert_eq!(field_path, "log.file");

        assert!(FrameworkConfig::from_json_str(r#"{ "tick_rat": 30 }"#).is_err());
    }

    #[test]
    fn from_json_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "window_width": 320, "window_height": 240 }}"#).expect("write");

        let config = FrameworkConfig::from_json_file(file.path()).expect("config");
        assert_eq!((config.window_width, config.window_height), (320, 240));
    }

    #[test]
    fn from_json_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = FrameworkConfig::from_json_file(dir.path().join("nope.json"))
            .expect_err("missing");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn tick_rate_parsing_rejects_zero_and_garbage() {
        assert_eq!(parse_tick_rate("30"), Some(30));
        assert_eq!(parse_tick_rate(" 120 "), Some(120));
        assert_eq!(parse_tick_rate("0"), None);
        assert_eq!(parse_tick_rate("fast"), None);
    }
}
