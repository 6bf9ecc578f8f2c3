//! Severity level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// The discriminants leave gaps so callers can reason about thresholds
/// numerically (`level as u32`); ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    Debug = 0,
    Info = 10,
    Notice = 15,
    Warning = 20,
    #[default]
    Error = 30,
    Critical = 40,
    Alert = 45,
    Emergency = 50,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Notice => "Notice",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Critical => "Critical",
            Level::Alert => "Alert",
            Level::Emergency => "Emergency",
        }
    }

    /// Numeric value used for threshold comparisons.
    pub fn value(&self) -> u32 {
        *self as u32
    }

    /// RFC 5424 severity code (0 = Emergency .. 7 = Debug).
    pub fn syslog_severity(&self) -> u8 {
        match self {
            Level::Debug => 7,
            Level::Info => 6,
            Level::Notice => 5,
            Level::Warning => 4,
            Level::Error => 3,
            Level::Critical => 2,
            Level::Alert => 1,
            Level::Emergency => 0,
        }
    }

    /// Lowercase name used by hosted log APIs.
    pub fn api_name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Emergency => "emergency",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => BrightBlack,
            Level::Info => Green,
            Level::Notice => Cyan,
            Level::Warning => Yellow,
            Level::Error => Red,
            Level::Critical => BrightRed,
            Level::Alert => BrightMagenta,
            Level::Emergency => BrightRed,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "NOTICE" => Ok(Level::Notice),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            "ALERT" => Ok(Level::Alert),
            "EMERGENCY" => Ok(Level::Emergency),
            _ => Err(format!("Invalid run level: '{}'", s)),
        }
    }
}
