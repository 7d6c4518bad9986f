//! WebSocket frame envelope: `{"event": <name>, "data": <string>}`.

use serde::{Deserialize, Serialize};

/// Frame sent by a connected client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// Submit a question for completion.
    AskQuestion(String),
}

/// Frame sent by the server to one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// Transient progress notice, not delivery-acknowledged.
    Status(String),
    /// Final answer, warning, or error text.
    Answer(String),
}

impl ServerFrame {
    /// The event name on the wire (`"status"` / `"answer"`).
    pub fn event(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Answer(_) => "answer",
        }
    }

    /// The string payload of this frame.
    pub fn data(&self) -> &str {
        match self {
            Self::Status(s) | Self::Answer(s) => s,
        }
    }
}
