//! Error types for the dashboard data layer
//!
//! The query-state codec never fails; everything here comes from loading
//! configuration or talking to the reporting backend. Errors are classified
//! by recoverability:
//! - Retryable: network failures, 5xx responses, timeouts
//! - NonRetryable: bad configuration, undecodable payloads

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration loading and dashboard data sources
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file could not be parsed at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Request to {path} failed: {reason}")]
    Network { path: String, reason: String },

    #[error("GET {path} failed with status {status}")]
    Http { path: String, status: u16 },

    #[error("Failed to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl DashboardError {
    /// Returns true if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Network { .. } => true,
            DashboardError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::Config(_) | DashboardError::ConfigParse { .. } => {
                "Check your configuration in ~/.carbonlens/config.json"
            }
            DashboardError::Network { .. } => {
                "Check that the reporting backend is running and reachable."
            }
            DashboardError::Http { status, .. } if *status >= 500 => {
                "The reporting backend had a problem. Try again shortly."
            }
            DashboardError::Http { .. } => "Check the selected filters and try again.",
            DashboardError::Decode { .. } => {
                "The backend returned an unexpected payload. Enable mock data to keep working."
            }
            DashboardError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

/// Serializable error representation for the presentation layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBanner {
    pub message: String,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

impl From<&DashboardError> for ErrorBanner {
    fn from(err: &DashboardError) -> Self {
        ErrorBanner {
            message: err.to_string(),
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
