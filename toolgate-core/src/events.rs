//! Observability events emitted during an orchestrator run
//!
//! Hooks receive notifications about run phases, model calls, tool calls,
//! and credential refreshes in real time. Register a hook with
//! [`crate::agent::Agent::add_hook`] or via the orchestrator.

use std::time::Duration;

use serde_json::Value;

use crate::types::StopReason;

/// Phase of an orchestrator run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Obtaining a credential
    Init,
    /// Credential acquired, opening the gateway session
    Authenticated,
    /// Tool set discovered, building the completion context
    ToolsDiscovered,
    /// Tool-calling loop in progress
    Responding,
    /// Final answer produced
    Done,
    /// Run aborted
    Failed,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::Authenticated => "authenticated",
            RunPhase::ToolsDiscovered => "tools_discovered",
            RunPhase::Responding => "responding",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Events emitted during agent execution
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// The orchestrator moved to a new phase
    PhaseChanged { phase: RunPhase },

    /// A run started with the given user input
    RunStarted { input: String },

    /// A run completed successfully
    RunCompleted { output: String, duration: Duration },

    /// A run failed
    RunFailed { error: String, duration: Duration },

    /// A model call is about to be issued
    ModelCallStarted {
        iteration: usize,
        message_count: usize,
        tool_count: usize,
    },

    /// A model call returned
    ModelCallCompleted {
        stop_reason: StopReason,
        duration: Duration,
    },

    /// The model requested a tool call
    ToolRequested {
        tool_use_id: String,
        name: String,
        input: Value,
    },

    /// A tool call completed successfully
    ToolCompleted {
        tool_use_id: String,
        name: String,
        duration: Duration,
    },

    /// A tool call failed; the failure envelope is fed back to the model
    ToolFailed {
        tool_use_id: String,
        name: String,
        error: String,
        duration: Duration,
    },

    /// The bearer token was refreshed after the gateway rejected it
    CredentialRefreshed,
}

/// Hook for observing agent execution
pub trait AgentHook: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(RunPhase::Init.to_string(), "init");
        assert_eq!(RunPhase::ToolsDiscovered.to_string(), "tools_discovered");
        assert_eq!(RunPhase::Failed.to_string(), "failed");
    }
}
