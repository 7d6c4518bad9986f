//! Chat-completions request and response bodies.

use serde::{Deserialize, Serialize};

/// One message in a chat-completions conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the author (`"system"` or `"user"`).
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, system instruction first.
    pub messages: Vec<ChatMessage>,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Nucleus sampling parameter.
    pub top_p: f64,
    /// Whether to stream the response. Always `false` here.
    pub stream: bool,
}

/// Response body for a non-streaming completion.
///
/// Only the fields the relay consumes are modeled; everything else the
/// provider returns (usage, ids, fingerprints) is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions. Non-streaming requests get at most one.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion candidate.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message, absent on malformed responses.
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Message body of a completion candidate.
#[derive(Clone, Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text, `null` for refusals or tool-only turns.
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_role() {
        let msg = ChatMessage::system("be brief");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "be brief");
    }

    #[test]
    fn user_message_role() {
        let msg = ChatMessage::user("What is 2+2?");
        assert_eq!(msg.role, "user");
    }

    #[test]
    fn request_serializes_all_fields() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 1.0,
            stream: false,
        };
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["model"], "llama-3.3-70b-versatile");
        assert_eq!(v["temperature"], 0.7);
        assert_eq!(v["max_tokens"], 1024);
        assert_eq!(v["top_p"], 1.0);
        assert_eq!(v["stream"], false);
        assert_eq!(v["messages"][0]["role"], "user");
    }

    #[test]
    fn response_parses_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#,
        )
        .unwrap();
        let content = response.choices[0]
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref());
        assert_eq!(content, Some("4"));
    }

    #[test]
    fn response_tolerates_missing_choices() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn response_tolerates_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(response.choices[0]
            .message
            .as_ref()
            .unwrap()
            .content
            .is_none());
    }

    #[test]
    fn response_ignores_extra_fields() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"cmpl-1","usage":{"total_tokens":9},"choices":[{"index":0,"finish_reason":"stop","message":{"role":"assistant","content":"ok"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.choices.len(), 1);
    }
}
