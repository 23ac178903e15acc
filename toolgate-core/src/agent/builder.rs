use std::sync::Arc;

use crate::events::AgentHook;
use crate::provider::{ModelProvider, ProviderError};

use super::tool::DynTool;
use super::types::AgentError;
use super::{Agent, DEFAULT_MAX_ITERATIONS};

/// Builder for [`Agent`]
///
/// ```ignore
/// let agent = Agent::builder()
///     .provider(provider)
///     .with_system_prompt("You are an order management assistant.")
///     .add_tools(tools)
///     .build()?;
/// ```
pub struct AgentBuilder {
    provider: Option<Arc<dyn ModelProvider>>,
    system_prompt: Option<String>,
    max_iterations: usize,
    tools: Vec<Box<dyn DynTool>>,
    hooks: Vec<Arc<dyn AgentHook>>,
}

impl AgentBuilder {
    pub(super) fn new() -> Self {
        Self {
            provider: None,
            system_prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tools: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Set the model provider
    pub fn provider(mut self, provider: impl ModelProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set an already-shared model provider
    pub fn provider_arc(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Bound the tool-calling loop at `max_iterations` model calls
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Add a single tool
    pub fn add_tool(mut self, tool: Box<dyn DynTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add a batch of tools
    pub fn add_tools(mut self, tools: Vec<Box<dyn DynTool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Register an event hook
    pub fn with_hook(mut self, hook: Arc<dyn AgentHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<Agent, AgentError> {
        let provider = self.provider.ok_or_else(|| {
            AgentError::Provider(ProviderError::Configuration(
                "no model provider configured".to_string(),
            ))
        })?;

        if self.max_iterations == 0 {
            return Err(AgentError::Provider(ProviderError::Configuration(
                "max_iterations must be at least 1".to_string(),
            )));
        }

        Ok(Agent {
            provider,
            system_prompt: self.system_prompt,
            max_iterations: self.max_iterations,
            tools: self.tools,
            hooks: Arc::new(parking_lot::RwLock::new(self.hooks)),
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
