//! Test utilities for toolgate-core.
//!
//! This module provides mock implementations for testing the pipeline
//! without real model provider credentials.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! toolgate-core = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use crate::events::{AgentEvent, AgentHook, RunPhase};
use crate::provider::{ModelProvider, ModelResponse, ProviderError};
use crate::types::{ContentBlock, Message, Role, StopReason, ToolDescriptor, ToolUseBlock};

/// A mock model provider for testing.
///
/// Returns pre-programmed responses in order.
///
/// # Example
///
/// ```rust
/// use toolgate_core::test_utils::MockProvider;
/// use serde_json::json;
///
/// // Tool use followed by the final answer
/// let provider = MockProvider::new()
///     .with_tool_use("orderLambdaTarget___get_order_tool", json!({"orderId": "123"}))
///     .with_text("Order 123 is processing.");
/// ```
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<ModelResponse>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new mock provider with no responses.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a text response to the queue with `StopReason::EndTurn`.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let response = ModelResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
        };
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Add a tool use response to the queue with `StopReason::ToolUse`.
    pub fn with_tool_use(
        self,
        tool_name: impl Into<String>,
        tool_input: serde_json::Value,
    ) -> Self {
        let tool_use = ToolUseBlock {
            id: format!("tool_{}", uuid::Uuid::new_v4()),
            name: tool_name.into(),
            input: tool_input,
        };
        let response = ModelResponse {
            message: Message {
                role: Role::Assistant,
                content: vec![ContentBlock::ToolUse(tool_use)],
            },
            stop_reason: StopReason::ToolUse,
        };
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Add a response with an explicit stop reason and empty content.
    pub fn with_stop_reason(self, stop_reason: StopReason) -> Self {
        let response = ModelResponse {
            message: Message {
                role: Role::Assistant,
                content: vec![],
            },
            stop_reason,
        };
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Get the number of times `generate` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
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
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::Other(
                "MockProvider: no more responses configured".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }
}

/// Collects agent events for verification in tests.
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<AgentEvent>>>,
}

impl EventCollector {
    /// Create a new event collector.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all collected events.
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Get all collected event type names.
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| Self::event_type_name(e).to_string())
            .collect()
    }

    /// Check whether an event of the given type was collected.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| Self::event_type_name(e) == event_type)
    }

    /// Get the sequence of run phases observed, in order.
    pub fn phases(&self) -> Vec<RunPhase> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                AgentEvent::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    fn event_type_name(event: &AgentEvent) -> &'static str {
        match event {
            AgentEvent::PhaseChanged { .. } => "phase_changed",
            AgentEvent::RunStarted { .. } => "run_started",
            AgentEvent::RunCompleted { .. } => "run_completed",
            AgentEvent::RunFailed { .. } => "run_failed",
            AgentEvent::ModelCallStarted { .. } => "model_call_started",
            AgentEvent::ModelCallCompleted { .. } => "model_call_completed",
            AgentEvent::ToolRequested { .. } => "tool_requested",
            AgentEvent::ToolCompleted { .. } => "tool_completed",
            AgentEvent::ToolFailed { .. } => "tool_failed",
            AgentEvent::CredentialRefreshed => "credential_refreshed",
        }
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentHook for EventCollector {
    fn on_event(&self, event: &AgentEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
