use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::message::Message;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on one completion request. Expiry is a reportable error,
/// not a retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Failure of one completion attempt. All variants are recoverable: the
/// loop reports them and returns to the prompt.
#[derive(Debug)]
pub enum ChatApiError {
    /// The request never produced an HTTP response (connect failure,
    /// timeout).
    Network(String),
    /// The endpoint answered with a non-success status.
    Api { status: u16, message: String },
    /// The endpoint answered 2xx but the body carried no assistant text.
    EmptyResponse,
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatApiError::Network(message) => write!(f, "network error: {message}"),
            ChatApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ChatApiError::EmptyResponse => write!(f, "API returned no completion choices"),
        }
    }
}

impl Error for ChatApiError {}

/// The seam between the interactive loop and the remote endpoint. The
/// production implementation is [`HttpChatClient`]; tests substitute
/// stubs.
#[async_trait]
pub trait ChatApi {
    /// Forward the full ordered transcript and return the assistant reply.
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatApiError>;
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
}

/// Resolve the endpoint credential at startup. `OPENAI_API_KEY` is
/// required; `OPENAI_BASE_URL` overrides the config file, which overrides
/// the public OpenAI endpoint.
pub fn resolve_credentials(
    config_base_url: Option<&str>,
) -> Result<Credentials, Box<dyn Error>> {
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        "OPENAI_API_KEY environment variable not set

Set your API key before starting a chat:
export OPENAI_API_KEY=\"your-api-key-here\"

A .env file in the working directory is also honored. Optionally, point
the client at a different endpoint:
export OPENAI_BASE_URL=\"https://api.openai.com/v1\""
    })?;

    let base_url = std::env::var("OPENAI_BASE_URL")
        .ok()
        .or_else(|| config_base_url.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    Ok(Credentials { api_key, base_url })
}

pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpChatClient {
    pub fn new(credentials: Credentials, model: impl Into<String>) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: credentials.base_url,
            api_key: credentials.api_key,
            model: model.into(),
        })
    }

    fn to_wire(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|message| ChatMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatApi for HttpChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatApiError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::to_wire(messages),
            stream: false,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatApiError::Network("request timed out".to_string())
                } else {
                    ChatApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "chat completion response");

        let body = response
            .text()
            .await
            .map_err(|e| ChatApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ChatApiError::Api {
                status: status.as_u16(),
                message: summarize_error_body(&body),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| ChatApiError::Api {
            status: status.as_u16(),
            message: format!("unparseable response body: {e}"),
        })?;

        parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or(ChatApiError::EmptyResponse)
    }
}

/// Pull a one-line summary out of an error body. Providers disagree about
/// where the message lives (`error.message`, `error` as a string, a bare
/// `message`), so each location is checked in turn before falling back to
/// the raw body.
fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    collapse_whitespace(trimmed)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Object(map) => map
                    .get("message")
                    .and_then(|message| message.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .map(|text| collapse_whitespace(&text))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;

    #[test]
    fn error_summary_prefers_nested_error_message() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"rate_limit"}}"#;
        assert_eq!(summarize_error_body(body), "Rate limit reached");
    }

    #[test]
    fn error_summary_accepts_string_error_and_bare_message() {
        assert_eq!(
            summarize_error_body(r#"{"error":"invalid api key"}"#),
            "invalid api key"
        );
        assert_eq!(
            summarize_error_body(r#"{"message":"not found"}"#),
            "not found"
        );
    }

    #[test]
    fn error_summary_collapses_raw_bodies() {
        assert_eq!(
            summarize_error_body("upstream\n   gateway    timeout"),
            "upstream gateway timeout"
        );
        assert_eq!(summarize_error_body("   "), "<empty response body>");
    }

    #[test]
    fn wire_messages_carry_lowercase_roles_in_order() {
        let transcript = vec![
            Message::system("ctx"),
            Message::user("hi"),
            Message::new(Role::Function, "lookup result"),
        ];
        let wire = HttpChatClient::to_wire(&transcript);
        let roles: Vec<&str> = wire.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "function"]);
        assert_eq!(wire[1].content, "hi");
    }

    #[test]
    fn requests_are_non_streaming() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: HttpChatClient::to_wire(&[Message::user("hi")]),
            stream: false,
        };
        let encoded = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(encoded["stream"], serde_json::Value::Bool(false));
        assert_eq!(encoded["messages"][0]["role"], "user");
    }
}
