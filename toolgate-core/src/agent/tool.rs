use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::transport::{GatewayClient, TransportError};
use crate::types::{ToolDescriptor, ToolInvocationRequest, ToolInvocationResult};

/// Type-erased tool the agent loop can store in collections.
///
/// A tool resolves to a [`ToolInvocationResult`] envelope; handler-level
/// failures travel inside the envelope (non-2xx `status_code`) so they
/// can be fed back to the model, while transport failures surface as
/// errors and abort the run.
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    fn execute_raw(
        &self,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocationResult, TransportError>> + Send + '_>>;
}

/// Adapter that exposes a gateway tool to the agent loop.
///
/// The tool keeps the raw (possibly prefix-namespaced) identifier the
/// gateway advertised; the gateway resolves the prefix on dispatch.
pub struct GatewayToolAdapter {
    client: Arc<GatewayClient>,
    descriptor: ToolDescriptor,
}

impl GatewayToolAdapter {
    /// Wrap one discovered tool
    pub fn new(client: Arc<GatewayClient>, descriptor: ToolDescriptor) -> Self {
        Self { client, descriptor }
    }

    /// Discover the gateway's tools and wrap each as a [`DynTool`]
    pub async fn discover(
        client: &Arc<GatewayClient>,
    ) -> Result<Vec<Box<dyn DynTool>>, TransportError> {
        let descriptors = client.list_tools().await?;
        Ok(descriptors
            .into_iter()
            .map(|descriptor| {
                Box::new(Self::new(Arc::clone(client), descriptor)) as Box<dyn DynTool>
            })
            .collect())
    }
}

impl DynTool for GatewayToolAdapter {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn input_schema(&self) -> Value {
        self.descriptor.input_schema.clone()
    }

    fn execute_raw(
        &self,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocationResult, TransportError>> + Send + '_>>
    {
        Box::pin(async move {
            let arguments: Map<String, Value> = match input {
                Value::Object(map) => map,
                other => {
                    return Err(TransportError::Protocol(format!(
                        "tool input must be a JSON object, got: {}",
                        json_type_name(&other)
                    )))
                }
            };
            let request = ToolInvocationRequest::new(self.descriptor.name.clone(), arguments);
            self.client.invoke_tool(&request).await
        })
    }
}

pub(super) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
