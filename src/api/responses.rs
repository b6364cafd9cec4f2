//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::Draft;

/// API response structure for draft mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub draft: Draft,
}

impl ApiResponse {
    /// Create a response carrying the updated draft
    ///
    /// The status field reflects whether the global timer is running.
    pub fn for_draft(message: String, draft: Draft) -> Self {
        let status = if draft.is_running {
            "running"
        } else {
            "paused"
        };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            draft,
        }
    }
}

/// Error payload for failed operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Full session view with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub draft: Draft,
    /// Elapsed time as mm:ss for display surfaces
    pub elapsed_display: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
