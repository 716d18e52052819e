//! End-to-end tests for the JSON-RPC boundary: request in, envelope out.

use serde_json::{json, Value};
use tempfile::tempdir;

use tooldeck::protocol::Request;
use tooldeck::server::handle_request;
use tooldeck_tools::ToolRegistry;

fn request(value: Value) -> Request {
    serde_json::from_value(value).expect("valid request")
}

fn registry(workspace: &std::path::Path) -> ToolRegistry {
    ToolRegistry::new(workspace.to_path_buf())
}

fn result_of(response: tooldeck::protocol::Response) -> Value {
    let value = serde_json::to_value(&response).unwrap();
    assert!(value.get("error").is_none(), "unexpected error: {value}");
    value["result"].clone()
}

fn envelope_text(result: &Value) -> String {
    assert_eq!(result["content"][0]["type"], "text");
    result["content"][0]["text"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({"id": 1, "method": "initialize", "params": {}})),
    )
    .await
    .unwrap();

    let result = result_of(response);
    assert_eq!(result["serverInfo"]["name"], "tooldeck");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn tools_list_exposes_catalog_with_schemas() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({"id": 2, "method": "tools/list"})),
    )
    .await
    .unwrap();

    let result = result_of(response);
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 27);

    let edit = tools
        .iter()
        .find(|tool| tool["name"] == "edit_file")
        .expect("edit_file in catalog");
    assert!(edit["description"].as_str().unwrap().contains("method"));
    assert_eq!(edit["inputSchema"]["type"], "object");
    assert!(edit["inputSchema"]["properties"]["method"]["enum"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "patch"));
}

#[tokio::test]
async fn tools_call_wraps_success_in_text_envelope() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), "greetings").unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({
            "id": 3,
            "method": "tools/call",
            "params": {"name": "read_file", "arguments": {"path": "hello.txt"}}
        })),
    )
    .await
    .unwrap();

    let text = envelope_text(&result_of(response));
    assert!(text.contains("greetings"));
}

#[tokio::test]
async fn tools_call_failure_stays_inside_envelope() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({
            "id": 4,
            "method": "tools/call",
            "params": {"name": "read_file", "arguments": {"path": "missing.txt"}}
        })),
    )
    .await
    .unwrap();

    // The transport-level response is a success; the failure lives in the
    // text, which callers pattern-match on.
    let text = envelope_text(&result_of(response));
    assert!(text.starts_with("Error executing tool read_file:"));
}

#[tokio::test]
async fn edit_file_round_trip_through_the_boundary() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("doc.txt"),
        "Hello World\nThis is a test\nGoodbye World",
    )
    .unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({
            "id": 5,
            "method": "tools/call",
            "params": {
                "name": "edit_file",
                "arguments": {
                    "path": "doc.txt",
                    "method": "replace",
                    "target": "World",
                    "replacement": "Universe"
                }
            }
        })),
    )
    .await
    .unwrap();

    let text = envelope_text(&result_of(response));
    assert!(text.contains("Successfully edited doc.txt"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("doc.txt")).unwrap(),
        "Hello Universe\nThis is a test\nGoodbye Universe"
    );
}

#[tokio::test]
async fn unknown_method_is_a_jsonrpc_error() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({"id": 6, "method": "resources/list"})),
    )
    .await
    .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["code"], -32601);
}

#[tokio::test]
async fn tools_call_without_name_is_invalid_params() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({"id": 7, "method": "tools/call", "params": {}})),
    )
    .await
    .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["code"], -32602);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let dir = tempdir().unwrap();
    let registry = registry(dir.path());

    let response = handle_request(
        &registry,
        request(json!({"method": "notifications/initialized"})),
    )
    .await;
    assert!(response.is_none());
}
