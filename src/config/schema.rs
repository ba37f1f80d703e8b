//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! default every field, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logger::Encoder;
use crate::sink::rotation::{
    RotationConfig, DEFAULT_MAX_AGE_DAYS, DEFAULT_ROTATION_INTERVAL_HOURS, DEFAULT_ROTATION_SIZE_MB,
};

/// Root configuration for the `logspec` daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Facility settings, applied with `Logging::apply`.
    pub logging: LoggingConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Prometheus exporter settings.
    pub metrics: MetricsConfig,
}

/// Where log records are written.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WriterTarget {
    #[default]
    Console,
    File,
    Both,
}

/// Record encoding.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging facility configuration.
///
/// `LoggingConfig::default()` reproduces the process-start defaults: level
/// `info`, no rules, uncolored text on stderr.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level spec, e.g. `"warn:peer=debug"`. Empty means `info`.
    pub level_spec: String,

    /// Console, rotating file, or both.
    pub writer_target: WriterTarget,

    /// Base path of the rotating log file.
    pub file_path: PathBuf,

    /// Days to keep rotated files.
    pub max_age_days: u32,

    /// Hours per rotation interval.
    pub rotation_interval_hours: u32,

    /// Size limit per file, in megabytes.
    pub rotation_size_limit: u64,

    /// Record encoding.
    pub format: LogFormat,

    /// ANSI colors in text records.
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level_spec: String::new(),
            writer_target: WriterTarget::Console,
            file_path: PathBuf::from("log/logspec.log"),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            rotation_interval_hours: DEFAULT_ROTATION_INTERVAL_HOURS,
            rotation_size_limit: DEFAULT_ROTATION_SIZE_MB,
            format: LogFormat::Text,
            color: false,
        }
    }
}

impl LoggingConfig {
    /// Rotation parameters for the file writer.
    pub fn rotation(&self) -> RotationConfig {
        RotationConfig {
            file_path: self.file_path.clone(),
            max_age_days: self.max_age_days,
            rotation_interval_hours: self.rotation_interval_hours,
            max_size_bytes: self.rotation_size_limit.saturating_mul(1024 * 1024),
        }
    }

    pub fn encoder(&self) -> Encoder {
        match self.format {
            LogFormat::Text => Encoder::Text { color: self.color },
            LogFormat::Json => Encoder::Json,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve the admin API.
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:9400").
    pub bind_address: String,

    /// Bearer token required on every request; `None` disables auth.
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:9400".to_string(),
            api_key: None,
        }
    }
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the exporter and the metrics observer.
    pub enabled: bool,

    /// Scrape endpoint bind address.
    pub bind_address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1:9401".to_string(),
        }
    }
}
