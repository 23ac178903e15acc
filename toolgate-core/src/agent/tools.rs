//! Tool execution for the agent loop

use std::time::Instant;

use serde_json::json;

use crate::events::AgentEvent;
use crate::types::{Message, ToolResultBlock, ToolResultStatus, ToolUseBlock};

use super::tool::json_type_name;
use super::types::{AgentError, ToolCallInfo};
use super::Agent;

impl Agent {
    /// Execute every tool use in `message` sequentially, in the order the
    /// model emitted them, and collect the result blocks to feed back.
    pub(super) async fn process_tool_calls(
        &self,
        message: &Message,
        tool_call_infos: &mut Vec<ToolCallInfo>,
    ) -> Result<Vec<ToolResultBlock>, AgentError> {
        let mut results = Vec::new();
        for tool_use in message.tool_uses() {
            let block = self.execute_tool(tool_use, tool_call_infos).await?;
            results.push(block);
        }
        Ok(results)
    }

    /// Execute one tool call. Handler-level failures become error result
    /// blocks the model can react to; transport failures abort the run.
    async fn execute_tool(
        &self,
        tool_use: &ToolUseBlock,
        tool_call_infos: &mut Vec<ToolCallInfo>,
    ) -> Result<ToolResultBlock, AgentError> {
        let tool_start = Instant::now();

        self.emit_event(AgentEvent::ToolRequested {
            tool_use_id: tool_use.id.clone(),
            name: tool_use.name.clone(),
            input: tool_use.input.clone(),
        });

        if !tool_use.input.is_object() {
            let error = format!(
                "tool input must be a JSON object, got: {}",
                json_type_name(&tool_use.input)
            );
            return Ok(self.fail_tool(tool_use, json!({"error": error}), tool_start, tool_call_infos));
        }

        let Some(tool) = self.tools.iter().find(|t| t.name() == tool_use.name) else {
            let error = format!("Unknown tool: {}", tool_use.name);
            return Ok(self.fail_tool(tool_use, json!({"error": error}), tool_start, tool_call_infos));
        };

        let result = tool.execute_raw(tool_use.input.clone()).await?;

        let duration = tool_start.elapsed();
        let success = result.is_success();
        if success {
            self.emit_event(AgentEvent::ToolCompleted {
                tool_use_id: tool_use.id.clone(),
                name: tool_use.name.clone(),
                duration,
            });
        } else {
            self.emit_event(AgentEvent::ToolFailed {
                tool_use_id: tool_use.id.clone(),
                name: tool_use.name.clone(),
                error: result.body.to_string(),
                duration,
            });
        }

        tool_call_infos.push(ToolCallInfo {
            name: tool_use.name.clone(),
            input: tool_use.input.clone(),
            output: result.body.clone(),
            success,
            duration,
        });

        Ok(ToolResultBlock {
            tool_use_id: tool_use.id.clone(),
            content: result.body,
            status: if success {
                ToolResultStatus::Success
            } else {
                ToolResultStatus::Error
            },
        })
    }

    fn fail_tool(
        &self,
        tool_use: &ToolUseBlock,
        body: serde_json::Value,
        tool_start: Instant,
        tool_call_infos: &mut Vec<ToolCallInfo>,
    ) -> ToolResultBlock {
        let duration = tool_start.elapsed();
        self.emit_event(AgentEvent::ToolFailed {
            tool_use_id: tool_use.id.clone(),
            name: tool_use.name.clone(),
            error: body.to_string(),
            duration,
        });
        tool_call_infos.push(ToolCallInfo {
            name: tool_use.name.clone(),
            input: tool_use.input.clone(),
            output: body.clone(),
            success: false,
            duration,
        });
        ToolResultBlock {
            tool_use_id: tool_use.id.clone(),
            content: body,
            status: ToolResultStatus::Error,
        }
    }
}
