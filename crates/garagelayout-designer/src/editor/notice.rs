//! Short-lived status messages shown after imports and exports.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// How long a notice stays visible.
pub const NOTICE_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Outcome of a device import.
    pub fn imported(count: usize) -> Self {
        if count == 0 {
            Self::new(Severity::Error, "No devices found in file")
        } else {
            Self::new(Severity::Success, format!("Imported {count} devices"))
        }
    }

    /// A file could not be read.
    pub fn read_failure(err: impl fmt::Display) -> Self {
        Self::new(Severity::Error, format!("Failed to read file: {err}"))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(NOTICE_TTL_SECS)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
