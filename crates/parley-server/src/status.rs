//! `GET /` liveness endpoint.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Always `"Server is running"` while the process is up.
    pub status: String,
    /// Current time, ISO-8601 with millisecond precision (UTC).
    pub timestamp: String,
}

/// Build the liveness response at the current instant.
pub fn server_status() -> StatusResponse {
    StatusResponse {
        status: "Server is running".into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
