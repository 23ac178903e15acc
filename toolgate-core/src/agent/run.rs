//! The tool-calling loop

use std::time::Instant;

use crate::events::AgentEvent;
use crate::types::{Message, StopReason, ToolDescriptor};

use super::types::{AgentError, AgentResponse, ToolCallInfo};
use super::Agent;

impl Agent {
    /// Run the agent with a user message
    ///
    /// Executes the tool-calling loop, calling the model and executing
    /// tools until the model returns a final text response. The loop is
    /// bounded: a run that exceeds `max_iterations` model calls fails
    /// with [`AgentError::IterationLimit`].
    pub async fn run(&self, user_message: &str) -> Result<AgentResponse, AgentError> {
        let run_start = Instant::now();
        let mut tool_call_infos: Vec<ToolCallInfo> = Vec::new();
        let mut model_call_count: usize = 0;

        self.emit_event(AgentEvent::RunStarted {
            input: user_message.to_string(),
        });

        let tool_defs: Vec<ToolDescriptor> = self
            .tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();

        let mut messages = vec![Message::user(user_message)];

        loop {
            if model_call_count >= self.max_iterations {
                return Err(self.fail(AgentError::IterationLimit(self.max_iterations), run_start));
            }

            let model_call_start = Instant::now();
            self.emit_event(AgentEvent::ModelCallStarted {
                iteration: model_call_count + 1,
                message_count: messages.len(),
                tool_count: tool_defs.len(),
            });

            let response = self
                .provider
                .generate(messages.clone(), tool_defs.clone(), self.system_prompt.clone())
                .await
                .map_err(|e| self.fail(AgentError::Provider(e), run_start))?;
            model_call_count += 1;

            self.emit_event(AgentEvent::ModelCallCompleted {
                stop_reason: response.stop_reason,
                duration: model_call_start.elapsed(),
            });

            messages.push(response.message.clone());

            match response.stop_reason {
                StopReason::ToolUse => {
                    let results = self
                        .process_tool_calls(&response.message, &mut tool_call_infos)
                        .await
                        .map_err(|e| self.fail(e, run_start))?;
                    messages.push(Message::tool_results(results));
                }
                StopReason::EndTurn | StopReason::StopSequence => {
                    let text = response.message.text();
                    if text.is_empty() {
                        return Err(self.fail(AgentError::NoResponse, run_start));
                    }

                    let duration = run_start.elapsed();
                    self.emit_event(AgentEvent::RunCompleted {
                        output: text.clone(),
                        duration,
                    });
                    return Ok(AgentResponse {
                        text,
                        tool_calls: tool_call_infos,
                        model_calls: model_call_count,
                        duration,
                    });
                }
                StopReason::MaxTokens => {
                    return Err(self.fail(
                        AgentError::UnexpectedStopReason("max_tokens".to_string()),
                        run_start,
                    ));
                }
                StopReason::Unknown => {
                    return Err(self.fail(
                        AgentError::UnexpectedStopReason("unknown".to_string()),
                        run_start,
                    ));
                }
            }
        }
    }

    fn fail(&self, error: AgentError, run_start: Instant) -> AgentError {
        self.emit_event(AgentEvent::RunFailed {
            error: error.to_string(),
            duration: run_start.elapsed(),
        });
        error
    }
}
