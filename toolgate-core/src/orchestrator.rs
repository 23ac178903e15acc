//! End-to-end run orchestration
//!
//! The orchestrator wires the pipeline together for a single user
//! prompt: mint a credential, open the gateway session, discover tools,
//! then drive the agent's tool-calling loop. Each stage transition is
//! announced to registered hooks as a [`RunPhase`] change, and every
//! failure mode carries a distinguishable error category so callers can
//! tell an expired credential from an unreachable gateway from a model
//! failure.

use std::sync::Arc;

use crate::agent::{Agent, AgentError, AgentResponse, GatewayToolAdapter, DEFAULT_MAX_ITERATIONS};
use crate::auth::{CredentialIssuer, OAuth2ProviderConfig};
use crate::error::Result;
use crate::events::{AgentEvent, AgentHook, RunPhase};
use crate::provider::ModelProvider;
use crate::transport::GatewayClient;

/// Configuration for an [`Orchestrator`]
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Gateway invocation URL
    pub gateway_url: String,
    /// OAuth2 provider for credential issuance
    pub auth: OAuth2ProviderConfig,
    /// Optional system prompt for the agent
    pub system_prompt: Option<String>,
    /// Bound on model calls per run
    pub max_iterations: usize,
}

impl OrchestratorConfig {
    /// Create a configuration with the default iteration bound
    pub fn new(gateway_url: impl Into<String>, auth: OAuth2ProviderConfig) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            auth,
            system_prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
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
}

/// Drives one prompt through the full pipeline
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    config: OrchestratorConfig,
    hooks: Vec<Arc<dyn AgentHook>>,
}

impl Orchestrator {
    /// Create an orchestrator over a model provider
    pub fn new(provider: impl ModelProvider + 'static, config: OrchestratorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            hooks: Vec::new(),
        }
    }

    /// Register a hook to observe the run
    pub fn add_hook(&mut self, hook: Arc<dyn AgentHook>) {
        self.hooks.push(hook);
    }

    /// Handle one user prompt end to end.
    ///
    /// Authenticates, connects to the gateway, discovers tools, and runs
    /// the agent loop. An empty discovered tool set is fatal and fails
    /// the run before any model call is made.
    pub async fn handle(&self, prompt: &str) -> Result<AgentResponse> {
        self.set_phase(RunPhase::Init);

        let issuer = match CredentialIssuer::new(self.config.auth.clone()) {
            Ok(issuer) => Arc::new(issuer),
            Err(e) => return Err(self.failed(e.into())),
        };
        if let Err(e) = issuer.get_token().await {
            return Err(self.failed(e.into()));
        }
        self.set_phase(RunPhase::Authenticated);

        let mut client =
            match GatewayClient::connect(&self.config.gateway_url, Arc::clone(&issuer)).await {
                Ok(client) => client,
                Err(e) => return Err(self.failed(e.into())),
            };
        for hook in &self.hooks {
            client.add_hook(Arc::clone(hook));
        }
        let client = Arc::new(client);

        let tools = match GatewayToolAdapter::discover(&client).await {
            Ok(tools) => tools,
            Err(e) => return Err(self.failed(e.into())),
        };
        if tools.is_empty() {
            return Err(self.failed(AgentError::NoTools.into()));
        }
        self.set_phase(RunPhase::ToolsDiscovered);

        let mut builder = Agent::builder()
            .provider_arc(Arc::clone(&self.provider))
            .with_max_iterations(self.config.max_iterations)
            .add_tools(tools);
        if let Some(prompt) = &self.config.system_prompt {
            builder = builder.with_system_prompt(prompt.clone());
        }
        for hook in &self.hooks {
            builder = builder.with_hook(Arc::clone(hook));
        }
        let agent = match builder.build() {
            Ok(agent) => agent,
            Err(e) => return Err(self.failed(e.into())),
        };

        self.set_phase(RunPhase::Responding);
        match agent.run(prompt).await {
            Ok(response) => {
                self.set_phase(RunPhase::Done);
                Ok(response)
            }
            Err(e) => Err(self.failed(e.into())),
        }
    }

    fn set_phase(&self, phase: RunPhase) {
        self.emit(AgentEvent::PhaseChanged { phase });
    }

    fn failed(&self, error: crate::error::Error) -> crate::error::Error {
        self.set_phase(RunPhase::Failed);
        error
    }

    fn emit(&self, event: AgentEvent) {
        for hook in &self.hooks {
            hook.on_event(&event);
        }
    }
}
