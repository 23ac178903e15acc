//! Agent loop behavior tests

mod common;

use common::{BrokenTransportTool, FailingTool, MockProvider, OrderTool};
use serde_json::json;
use toolgate_core::agent::{Agent, AgentError};

#[tokio::test]
async fn test_simple_text_response() {
    let provider = MockProvider::new().with_text("Hello, world!");

    let agent = Agent::builder().provider(provider).build().unwrap();

    let response = agent.run("Say hello").await.unwrap();
    assert_eq!(response, "Hello, world!");
    assert_eq!(response.model_calls, 1);
    assert!(response.tool_calls.is_empty());
}

#[tokio::test]
async fn test_tool_use_then_answer() {
    let provider = MockProvider::new()
        .with_tool_use(
            "orderLambdaTarget___get_order_tool",
            json!({"orderId": "123"}),
        )
        .with_text("Order 123 is processing.");

    let tool = OrderTool::new("orderLambdaTarget___get_order_tool");
    let invocations = tool.invocations.clone();

    let agent = Agent::builder()
        .provider(provider.clone())
        .add_tool(Box::new(tool))
        .build()
        .unwrap();

    let response = agent.run("What is the status of order 123?").await.unwrap();
    assert_eq!(response, "Order 123 is processing.");
    assert_eq!(response.model_calls, 2);
    assert_eq!(provider.call_count(), 2);

    // The tool ran exactly once with the model's arguments
    let invocations = invocations.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0]["orderId"], "123");

    assert_eq!(response.tool_calls.len(), 1);
    assert!(response.tool_calls[0].success);
    assert_eq!(response.tool_calls[0].output["status"], "processing");
}

#[tokio::test]
async fn test_sequential_tool_calls() {
    let provider = MockProvider::new()
        .with_tool_use("get_order_tool", json!({"orderId": "1"}))
        .with_tool_use("get_order_tool", json!({"orderId": "2"}))
        .with_text("Both orders are processing.");

    let tool = OrderTool::new("get_order_tool");
    let invocations = tool.invocations.clone();

    let agent = Agent::builder()
        .provider(provider)
        .add_tool(Box::new(tool))
        .build()
        .unwrap();

    let response = agent.run("Check orders 1 and 2").await.unwrap();
    assert_eq!(response.model_calls, 3);
    assert_eq!(invocations.lock().unwrap().len(), 2);
    assert_eq!(response.tool_calls.len(), 2);
}

#[tokio::test]
async fn test_iteration_limit_stops_runaway_loop() {
    // The model asks for a tool on every call and never finishes
    let mut provider = MockProvider::new();
    for _ in 0..5 {
        provider = provider.with_tool_use("get_order_tool", json!({"orderId": "123"}));
    }

    let agent = Agent::builder()
        .provider(provider.clone())
        .add_tool(Box::new(OrderTool::new("get_order_tool")))
        .with_max_iterations(3)
        .build()
        .unwrap();

    let err = agent.run("loop forever").await.unwrap_err();
    assert!(matches!(err, AgentError::IterationLimit(3)));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_handler_failure_fed_back_to_model() {
    let provider = MockProvider::new()
        .with_tool_use("update_order_tool", json!({"orderId": "9"}))
        .with_text("The update failed, sorry.");

    let agent = Agent::builder()
        .provider(provider)
        .add_tool(Box::new(FailingTool::new("update_order_tool")))
        .build()
        .unwrap();

    // A failing handler does not abort the run; the model sees the error
    let response = agent.run("Update order 9").await.unwrap();
    assert_eq!(response, "The update failed, sorry.");
    assert_eq!(response.tool_calls.len(), 1);
    assert!(!response.tool_calls[0].success);
    assert_eq!(response.tool_calls[0].output["error"], "handler exploded");
}

#[tokio::test]
async fn test_unknown_tool_request_fed_back_to_model() {
    let provider = MockProvider::new()
        .with_tool_use("no_such_tool", json!({}))
        .with_text("That tool does not exist.");

    let agent = Agent::builder()
        .provider(provider)
        .add_tool(Box::new(OrderTool::new("get_order_tool")))
        .build()
        .unwrap();

    let response = agent.run("Use a made-up tool").await.unwrap();
    assert_eq!(response.tool_calls.len(), 1);
    assert!(!response.tool_calls[0].success);
    assert_eq!(
        response.tool_calls[0].output["error"],
        "Unknown tool: no_such_tool"
    );
}

#[tokio::test]
async fn test_transport_failure_aborts_run() {
    let provider = MockProvider::new()
        .with_tool_use("get_order_tool", json!({"orderId": "1"}))
        .with_text("never reached");

    let agent = Agent::builder()
        .provider(provider)
        .add_tool(Box::new(BrokenTransportTool::new("get_order_tool")))
        .build()
        .unwrap();

    let err = agent.run("Check order 1").await.unwrap_err();
    assert!(matches!(err, AgentError::Transport(_)));
}

#[tokio::test]
async fn test_empty_final_answer_is_no_response() {
    use toolgate_core::types::StopReason;

    let provider = MockProvider::new().with_stop_reason(StopReason::EndTurn);

    let agent = Agent::builder().provider(provider).build().unwrap();

    let err = agent.run("Say something").await.unwrap_err();
    assert!(matches!(err, AgentError::NoResponse));
}

#[tokio::test]
async fn test_max_tokens_is_unexpected_stop() {
    use toolgate_core::types::StopReason;

    let provider = MockProvider::new().with_stop_reason(StopReason::MaxTokens);

    let agent = Agent::builder().provider(provider).build().unwrap();

    let err = agent.run("Write a novel").await.unwrap_err();
    assert!(matches!(err, AgentError::UnexpectedStopReason(_)));
}

#[tokio::test]
async fn test_builder_requires_provider() {
    let err = Agent::builder().build().unwrap_err();
    assert!(matches!(err, AgentError::Provider(_)));
}
