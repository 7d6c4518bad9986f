//! Groq chat-completions client.
//!
//! Sends non-streaming `POST /chat/completions` requests to an
//! OpenAI-compatible endpoint and extracts the first choice's text.
//! Authentication is a static API key sent as a Bearer token.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use parley_core::replies;

use crate::types::{ChatMessage, ChatRequest, ChatResponse};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default API base URL (Groq's OpenAI-compatible endpoint).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// System instruction prepended to every request.
const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that provides clear and concise answers.";

/// Sampling temperature for every request.
const TEMPERATURE: f64 = 0.7;

/// Completion token cap for every request.
const MAX_TOKENS: u32 = 1024;

/// Nucleus sampling parameter for every request.
const TOP_P: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur talking to the completion provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed (invalid or malformed API key).
    #[error("Auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Provider returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Provider-specific error code.
        code: Option<String>,
    },
}

impl ProviderError {
    /// The bare error description, without the variant framing.
    ///
    /// This is the text interpolated into the user-facing failure answer,
    /// so it carries only what the underlying error said.
    pub fn message(&self) -> String {
        match self {
            Self::Http(e) => e.to_string(),
            Self::Json(e) => e.to_string(),
            Self::Auth { message } | Self::Api { message, .. } => message.clone(),
        }
    }

    /// Error category string for log fields.
    pub fn category(&self) -> &str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) => "parse",
            Self::Auth { .. } => "auth",
            Self::Api { .. } => "api",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for [`CompletionClient`].
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    /// API key sent as a Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Base URL override, `None` for [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
}

/// Chat-completions client for a Groq-style OpenAI-compatible API.
pub struct CompletionClient {
    /// Client configuration.
    config: CompletionConfig,
    /// HTTP client (reused across requests).
    client: reqwest::Client,
    /// Resolved base URL, no trailing slash.
    base_url: String,
}

impl CompletionClient {
    /// Create a client from configuration.
    pub fn new(config: CompletionConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        debug!(model = %config.model, base_url = %base_url, "completion client initialized");

        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Current model ID.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the fixed-parameter request body for one question.
    fn build_request(&self, question: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(question),
            ],
            model: self.config.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stream: false,
        }
    }

    /// Build request headers with Bearer authentication.
    fn build_headers(&self) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)).map_err(
            |_| ProviderError::Auth {
                message: "API key contains invalid header characters".to_string(),
            },
        )?;
        let _ = headers.insert(AUTHORIZATION, auth);
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Request a completion for `question` and return the answer text.
    ///
    /// A successful response with no usable content resolves to the
    /// no-answer fallback rather than an error.
    pub async fn complete(&self, question: &str) -> ProviderResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(question);

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, code) = parse_api_error(&body, status.as_u16());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
                code,
            });
        }

        let data: ChatResponse = response.json().await.map_err(ProviderError::Http)?;
        Ok(first_choice_text(data))
    }
}

/// Extract the answer text from a completion response.
///
/// Falls back to [`replies::NO_ANSWER`] when choices are missing, content
/// is `null`, or content is the empty string.
fn first_choice_text(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| replies::NO_ANSWER.to_string())
}

/// Parse an error response body into (message, code).
///
/// Expects the OpenAI-style `{"error": {"message", "code"}}` shape and
/// falls back to the raw body (or the bare status) when it doesn't match.
fn parse_api_error(body: &str, status: u16) -> (String, Option<String>) {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            let code = error
                .get("code")
                .and_then(|c| c.as_str())
                .map(ToString::to_string);
            return (message, code);
        }
    }

    if body.is_empty() {
        (format!("HTTP {status}"), None)
    } else {
        (format!("HTTP {status}: {body}"), None)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> CompletionClient {
        CompletionClient::new(CompletionConfig {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: Some(server.uri()),
        })
    }

    // ── request shape ───────────────────────────────────────────────

    #[test]
    fn build_request_uses_fixed_parameters() {
        let client = CompletionClient::new(CompletionConfig {
            api_key: "k".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        });
        let request = client.build_request("What is 2+2?");
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.top_p, 1.0);
        assert!(!request.stream);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(
            request.messages[0].content,
            "You are a helpful assistant that provides clear and concise answers."
        );
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "What is 2+2?");
    }

    #[test]
    fn build_headers_sets_bearer_auth() {
        let client = CompletionClient::new(CompletionConfig {
            api_key: "sk-abc".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        });
        let headers = client.build_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION.as_str()], "Bearer sk-abc");
        assert_eq!(headers[CONTENT_TYPE.as_str()], "application/json");
    }

    #[test]
    fn build_headers_rejects_control_characters() {
        let client = CompletionClient::new(CompletionConfig {
            api_key: "bad\nkey".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        });
        let err = client.build_headers().unwrap_err();
        assert!(matches!(err, ProviderError::Auth { .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CompletionClient::new(CompletionConfig {
            api_key: "k".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: Some("http://localhost:9999/v1/".to_string()),
        });
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }

    // ── response extraction ─────────────────────────────────────────

    #[test]
    fn first_choice_text_returns_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"4"}}]}"#).unwrap();
        assert_eq!(first_choice_text(response), "4");
    }

    #[test]
    fn first_choice_text_no_choices_falls_back() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_choice_text(response), "No answer found.");
    }

    #[test]
    fn first_choice_text_null_content_falls_back() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice_text(response), "No answer found.");
    }

    #[test]
    fn first_choice_text_empty_content_falls_back() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert_eq!(first_choice_text(response), "No answer found.");
    }

    // ── error parsing ───────────────────────────────────────────────

    #[test]
    fn parse_api_error_openai_shape() {
        let body = r#"{"error":{"message":"rate limit exceeded","type":"tokens","code":"rate_limit_exceeded"}}"#;
        let (message, code) = parse_api_error(body, 429);
        assert_eq!(message, "rate limit exceeded");
        assert_eq!(code.as_deref(), Some("rate_limit_exceeded"));
    }

    #[test]
    fn parse_api_error_plain_body() {
        let (message, code) = parse_api_error("Service Unavailable", 503);
        assert_eq!(message, "HTTP 503: Service Unavailable");
        assert!(code.is_none());
    }

    #[test]
    fn parse_api_error_empty_body() {
        let (message, _) = parse_api_error("", 500);
        assert_eq!(message, "HTTP 500");
    }

    #[test]
    fn error_message_strips_variant_framing() {
        let err = ProviderError::Api {
            status: 429,
            message: "rate limit exceeded".to_string(),
            code: None,
        };
        assert_eq!(err.message(), "rate limit exceeded");
        assert_eq!(err.category(), "api");
    }

    // ── wire behavior ───────────────────────────────────────────────

    #[tokio::test]
    async fn complete_returns_answer_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": DEFAULT_MODEL,
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "4"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).complete("What is 2+2?").await.unwrap();
        assert_eq!(answer, "4");
    }

    #[tokio::test]
    async fn complete_empty_content_resolves_to_no_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let answer = client_for(&server).complete("anything").await.unwrap();
        assert_eq!(answer, "No answer found.");
    }

    #[tokio::test]
    async fn complete_surfaces_api_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "rate limit exceeded", "type": "tokens"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        match err {
            ProviderError::Api { status, message, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limit exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_network_failure_is_http_error() {
        let client = CompletionClient::new(CompletionConfig {
            api_key: "k".to_string(),
            model: DEFAULT_MODEL.to_string(),
            // Nothing listens here; connection is refused immediately.
            base_url: Some("http://127.0.0.1:9".to_string()),
        });
        let err = client.complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
        assert_eq!(err.category(), "network");
    }
}
