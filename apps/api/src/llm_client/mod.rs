//! Anthropic Messages client. Every LLM call in the service goes through
//! [`LlmClient::complete_json`]; callers describe the JSON they expect in the
//! prompt and get it back deserialized.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
/// A recommendation is four short fields; this leaves ample headroom.
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl MessagesResponse {
    /// Concatenated non-blank text blocks, or `None` if the model said nothing.
    fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
        })
    }

    /// Sends one system + user turn and deserializes the reply as `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(system, prompt).await?;
        parse_json_text(&text)
    }

    /// Retries 429 and 5xx responses and transport failures.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            if let Some(delay) = backoff(attempt) {
                warn!("Retrying LLM call (attempt {attempt}) in {}ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let error = api_error(status, raw);
                if is_retryable(status) {
                    warn!("LLM API returned {status}");
                    last_error = Some(error);
                    continue;
                }
                return Err(error);
            }

            let reply: MessagesResponse = response.json().await?;
            if let Some(usage) = &reply.usage {
                debug!(
                    "LLM call used {} input / {} output tokens",
                    usage.input_tokens, usage.output_tokens
                );
            }
            return reply.into_text().ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }
}

/// Delay before `attempt` (1-based): none, then 1s, 2s, ...
fn backoff(attempt: u32) -> Option<Duration> {
    (attempt > 1).then(|| Duration::from_millis(1000 << (attempt - 2)))
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn api_error(status: StatusCode, raw: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
        .map(|e| e.error.message)
        .unwrap_or(raw);
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Parses model output as JSON. Surrounding prose or markdown fences are
/// ignored when the reply contains a `{ ... }` object.
pub fn parse_json_text<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(json_object_slice(text)).map_err(LlmError::Parse)
}

/// The outermost `{ ... }` span of `text`, or the trimmed text if it has none.
fn json_object_slice(text: &str) -> &str {
    let text = text.trim();
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_slice_strips_fences() {
        assert_eq!(json_object_slice("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(json_object_slice("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_json_object_slice_ignores_prose() {
        let reply = "Here is my assessment:\n{\"a\": {\"b\": 2}}\nHope that helps!";
        assert_eq!(json_object_slice(reply), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_parse_json_text_rejects_prose() {
        let result: Result<serde_json::Value, _> = parse_json_text("Sure! Here you go.");
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff(1), None);
        assert_eq!(backoff(2), Some(Duration::from_secs(1)));
        assert_eq!(backoff(3), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_api_error_prefers_envelope_message() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#
                .to_string(),
        );
        assert!(matches!(
            err,
            LlmError::Api { status: 401, ref message } if message == "invalid x-api-key"
        ));

        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(matches!(err, LlmError::Api { ref message, .. } if message == "upstream down"));
    }

    #[test]
    fn test_reply_text_joins_blocks_and_skips_blank() {
        let reply: MessagesResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "{\"a\":"},
                {"type": "tool_use"},
                {"type": "text", "text": "1}"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("{\"a\":\n1}"));

        let blank: MessagesResponse =
            serde_json::from_str(r#"{"content": [{"type": "text", "text": "  "}]}"#).unwrap();
        assert!(blank.into_text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: "sys",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], MODEL);
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["system"], "sys");
    }
}
