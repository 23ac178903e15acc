//! Tool registration and lookup.
//!
//! Tools implement the typed [`GatewayTool`] trait; the registry stores
//! them type-erased behind [`ToolHandler`] and serves descriptor listings
//! to the wire layer. Descriptors are immutable once registered.

use std::future::Future;
use std::pin::Pin;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use toolgate_core::types::ToolDescriptor;

use crate::error::HandlerError;

/// Trait for implementing gateway tools.
///
/// Tools define an input type with `#[derive(Deserialize, JsonSchema)]`;
/// the input schema the gateway advertises is generated from that type.
///
/// # Example
///
/// ```rust
/// use schemars::JsonSchema;
/// use serde::Deserialize;
/// use serde_json::{json, Value};
/// use toolgate_gateway::{GatewayTool, HandlerError};
///
/// #[derive(Deserialize, JsonSchema)]
/// struct PingInput {
///     message: String,
/// }
///
/// struct PingTool;
///
/// impl GatewayTool for PingTool {
///     type Input = PingInput;
///
///     fn name(&self) -> &str { "ping" }
///     fn description(&self) -> &str { "Echo a message" }
///
///     fn handle(
///         &self,
///         input: Self::Input,
///     ) -> impl std::future::Future<Output = Result<Value, HandlerError>> + Send {
///         async move { Ok(json!({"echo": input.message})) }
///     }
/// }
/// ```
pub trait GatewayTool: Send + Sync {
    /// The input type for this tool. Must implement `Deserialize` and `JsonSchema`.
    type Input: DeserializeOwned + JsonSchema + Send;

    /// The tool name as advertised to callers (e.g. "get_order_tool")
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// Execute the tool with typed input
    fn handle(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Value, HandlerError>> + Send;

    /// JSON schema for this tool's input, generated from the type definition
    fn input_schema(&self) -> Value {
        let schema = schemars::schema_for!(Self::Input);
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

/// Object-safe trait for dynamic dispatch (used internally by the registry).
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    fn handle_raw(
        &self,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send + '_>>;
}

struct HandlerWrapper<T>(T);

impl<T: GatewayTool> ToolHandler for HandlerWrapper<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    fn input_schema(&self) -> Value {
        self.0.input_schema()
    }

    fn handle_raw(
        &self,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send + '_>> {
        Box::pin(async move {
            let typed: T::Input = serde_json::from_value(input)?;
            self.0.handle(typed).await
        })
    }
}

/// Registry of gateway tools, preserving registration order for listings.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Later registrations never shadow earlier ones;
    /// lookup always returns the first match.
    pub fn register<T: GatewayTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if self.tools.iter().any(|t| t.name() == name) {
            eprintln!(
                "Warning: Tool '{}' is already registered. The earlier registration wins.",
                name
            );
        }
        self.tools.push(Box::new(HandlerWrapper(tool)));
    }

    /// Look up a tool by its resolved name
    pub fn get(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Descriptors for every registered tool, in registration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
