//! Agent module orchestrating model interactions with gateway tools
//!
//! The agent runs a bounded tool-calling loop: it sends the conversation
//! to the model, executes any tools the model requests through the
//! gateway, feeds the results back, and repeats until the model produces
//! a final text answer or the model call bound is hit.

mod builder;
mod run;
mod tool;
mod tools;
mod types;

pub use builder::AgentBuilder;
pub use tool::{DynTool, GatewayToolAdapter};
pub use types::{AgentError, AgentResponse, ToolCallInfo};

use std::sync::Arc;

use crate::events::{AgentEvent, AgentHook};
use crate::provider::ModelProvider;

/// Default bound on model calls per run
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Agent that drives the tool-calling loop against a model provider
pub struct Agent {
    pub(super) provider: Arc<dyn ModelProvider>,
    pub(super) system_prompt: Option<String>,
    pub(super) max_iterations: usize,
    pub(super) tools: Vec<Box<dyn DynTool>>,
    pub(super) hooks: Arc<parking_lot::RwLock<Vec<Arc<dyn AgentHook>>>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("system_prompt", &self.system_prompt)
            .field("max_iterations", &self.max_iterations)
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a builder for configuring a new agent
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Add an event hook to observe agent execution
    pub fn add_hook(&self, hook: impl AgentHook + 'static) {
        self.hooks.write().push(Arc::new(hook));
    }

    /// Number of tools available to the model
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub(super) fn emit_event(&self, event: AgentEvent) {
        for hook in self.hooks.read().iter() {
            hook.on_event(&event);
        }
    }
}
