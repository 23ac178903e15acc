//! Shared test fixtures

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use toolgate_core::agent::DynTool;
use toolgate_core::provider::{ModelProvider, ModelResponse, ProviderError};
use toolgate_core::transport::TransportError;
use toolgate_core::types::{
    ContentBlock, Message, Role, StopReason, ToolDescriptor, ToolInvocationResult, ToolUseBlock,
};

/// Scripted model provider, returns pre-programmed responses in order
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<ModelResponse>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(ModelResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
        })
    }

    pub fn with_tool_use(self, tool_name: impl Into<String>, tool_input: Value) -> Self {
        let count = self.responses.lock().unwrap().len();
        self.push(ModelResponse {
            message: Message {
                role: Role::Assistant,
                content: vec![ContentBlock::ToolUse(ToolUseBlock {
                    id: format!("toolu_{}", count),
                    name: tool_name.into(),
                    input: tool_input,
                })],
            },
            stop_reason: StopReason::ToolUse,
        })
    }

    pub fn with_stop_reason(self, stop_reason: StopReason) -> Self {
        self.push(ModelResponse {
            message: Message {
                role: Role::Assistant,
                content: vec![],
            },
            stop_reason,
        })
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn push(self, response: ModelResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }
}

#[async_trait::async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn generate(
        &self,
        _messages: Vec<Message>,
        _tools: Vec<ToolDescriptor>,
        _system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        *self.call_count.lock().unwrap() += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::Other(
                "MockProvider: no more responses configured".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }
}

/// Tool that records invocations and answers with a fixed order envelope
pub struct OrderTool {
    name: String,
    pub invocations: Arc<Mutex<Vec<Value>>>,
}

impl OrderTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DynTool for OrderTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Fetch an order by id"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"orderId": {"type": "string"}},
            "required": ["orderId"]
        })
    }

    fn execute_raw(
        &self,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocationResult, TransportError>> + Send + '_>>
    {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(input.clone());
            Ok(ToolInvocationResult {
                status_code: 200,
                body: json!({
                    "orderId": input.get("orderId").cloned().unwrap_or(Value::Null),
                    "status": "processing",
                }),
            })
        })
    }
}

/// Tool whose handler always reports failure via the status envelope
pub struct FailingTool {
    name: String,
}

impl FailingTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DynTool for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute_raw(
        &self,
        _input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocationResult, TransportError>> + Send + '_>>
    {
        Box::pin(async {
            Ok(ToolInvocationResult {
                status_code: 500,
                body: json!({"error": "handler exploded"}),
            })
        })
    }
}

/// Tool whose transport always fails
pub struct BrokenTransportTool {
    name: String,
}

impl BrokenTransportTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DynTool for BrokenTransportTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Transport always fails"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute_raw(
        &self,
        _input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocationResult, TransportError>> + Send + '_>>
    {
        Box::pin(async { Err(TransportError::Network("connection reset".to_string())) })
    }
}
