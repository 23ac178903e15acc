//! Anthropic Messages API provider

use std::time::Duration;

use serde_json::{json, Value};

use crate::types::{ContentBlock, Message, Role, StopReason, ToolDescriptor, ToolUseBlock};

use super::{ModelProvider, ModelResponse, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Default maximum tokens to generate
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default completion timeout. Long generations can run for minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Model provider backed by the Anthropic Messages API
pub struct AnthropicProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicProvider {
    /// Create a provider using the `ANTHROPIC_API_KEY` environment variable
    pub fn from_env(model_id: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ProviderError::Configuration("ANTHROPIC_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key, model_id)
    }

    /// Create a provider with an explicit API key
    pub fn new(
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model_id: model_id.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum tokens to generate per call
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Bound each completion call. An elapsed timeout surfaces as
    /// [`ProviderError::Network`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn to_wire_message(message: &Message) -> Value {
        let content: Vec<Value> = message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text(text) => json!({"type": "text", "text": text}),
                ContentBlock::ToolUse(tool_use) => json!({
                    "type": "tool_use",
                    "id": tool_use.id,
                    "name": tool_use.name,
                    "input": tool_use.input,
                }),
                ContentBlock::ToolResult(result) => json!({
                    "type": "tool_result",
                    "tool_use_id": result.tool_use_id,
                    "content": result.content.to_string(),
                    "is_error": result.status == crate::types::ToolResultStatus::Error,
                }),
            })
            .collect();

        json!({"role": message.role.to_string(), "content": content})
    }

    fn from_wire_content(content: &[Value]) -> Result<Vec<ContentBlock>, ProviderError> {
        content
            .iter()
            .map(|block| {
                let kind = block
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                match kind {
                    "text" => {
                        let text = block
                            .get("text")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        Ok(ContentBlock::Text(text.to_string()))
                    }
                    "tool_use" => {
                        let id = block.get("id").and_then(Value::as_str).ok_or_else(|| {
                            ProviderError::Other("tool_use block missing id".into())
                        })?;
                        let name = block.get("name").and_then(Value::as_str).ok_or_else(|| {
                            ProviderError::Other("tool_use block missing name".into())
                        })?;
                        Ok(ContentBlock::ToolUse(ToolUseBlock {
                            id: id.to_string(),
                            name: name.to_string(),
                            input: block.get("input").cloned().unwrap_or(Value::Null),
                        }))
                    }
                    other => Err(ProviderError::Other(format!(
                        "unexpected content block type: {}",
                        other
                    ))),
                }
            })
            .collect()
    }

    fn parse_stop_reason(reason: Option<&str>) -> StopReason {
        match reason {
            Some("end_turn") => StopReason::EndTurn,
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::Unknown,
        }
    }

    fn classify_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::Authentication(format!("status {}: {}", status, body)),
            400 | 404 | 413 | 422 => {
                ProviderError::Configuration(format!("status {}: {}", status, body))
            }
            500..=599 => ProviderError::Network(format!("status {}: {}", status, body)),
            _ => ProviderError::Other(format!("status {}: {}", status, body)),
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDescriptor>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        let mut request = json!({
            "model": self.model_id,
            "max_tokens": self.max_tokens,
            "messages": messages.iter().map(Self::to_wire_message).collect::<Vec<_>>(),
        });
        if !tools.is_empty() {
            request["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "input_schema": t.input_schema,
                    })
                })
                .collect();
        }
        if let Some(system) = system_prompt {
            request["system"] = Value::String(system);
        }

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Network(e.to_string())
            } else {
                ProviderError::Other(format!("invalid response body: {}", e))
            }
        })?;

        let content = body
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::Other("response missing content array".into()))?;

        let message = Message {
            role: Role::Assistant,
            content: Self::from_wire_content(content)?,
        };
        let stop_reason =
            Self::parse_stop_reason(body.get("stop_reason").and_then(Value::as_str));

        Ok(ModelResponse {
            message,
            stop_reason,
        })
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_stop_reason() {
        assert_eq!(
            AnthropicProvider::parse_stop_reason(Some("end_turn")),
            StopReason::EndTurn
        );
        assert_eq!(
            AnthropicProvider::parse_stop_reason(Some("tool_use")),
            StopReason::ToolUse
        );
        assert_eq!(
            AnthropicProvider::parse_stop_reason(None),
            StopReason::Unknown
        );
    }

    #[test]
    fn test_wire_message_shapes() {
        let message = Message::user("hello");
        let wire = AnthropicProvider::to_wire_message(&message);
        assert_eq!(wire["role"], "user");
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["content"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn test_slow_completion_times_out_as_network_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", "claude-test")
            .unwrap()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));

        let err = provider
            .generate(vec![Message::user("hello")], Vec::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[test]
    fn test_from_wire_content_tool_use() {
        let blocks = AnthropicProvider::from_wire_content(&[json!({
            "type": "tool_use",
            "id": "toolu_1",
            "name": "orderLambdaTarget___get_order_tool",
            "input": {"orderId": "123"},
        })])
        .unwrap();

        match &blocks[0] {
            ContentBlock::ToolUse(tool_use) => {
                assert_eq!(tool_use.id, "toolu_1");
                assert_eq!(tool_use.input["orderId"], "123");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }
}
