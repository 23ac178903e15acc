//! Built-in tool handlers.

mod orders;

pub use orders::{GetOrderTool, UpdateOrderTool};

use crate::registry::ToolRegistry;

/// Registry pre-loaded with the order management tools
pub fn order_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(GetOrderTool);
    registry.register(UpdateOrderTool::new());
    registry
}
