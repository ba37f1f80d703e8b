//! Severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordered log severity.
///
/// `DPanic`, `Panic` and `Fatal` sit above `Error`: entries at those levels
/// trigger a terminal action after they are written.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Panics only for handles in development mode.
    DPanic = 4,
    Panic = 5,
    Fatal = 6,
}

/// Error returned for unrecognized severity names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log level: {0}")]
pub struct UnknownSeverity(pub String);

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Lowercase name, as used in spec strings and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }

    /// Uppercase name.
    pub fn as_upper_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::DPanic => "DPANIC",
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
        }
    }

    /// ANSI color used by the text encoder.
    pub fn color_code(&self) -> &'static str {
        match self {
            Severity::Debug => "\x1b[36m",
            Severity::Info => "\x1b[32m",
            Severity::Warn => "\x1b[33m",
            Severity::Error => "\x1b[31m",
            Severity::DPanic | Severity::Panic | Severity::Fatal => "\x1b[35m",
        }
    }

    /// True when the level carries a terminal action.
    pub fn is_terminal(&self) -> bool {
        *self >= Severity::DPanic
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" | "notice" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" | "critical" => Ok(Severity::Error),
            "dpanic" => Ok(Severity::DPanic),
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
