//! Integration tests for klq-mcp, driven through the protocol handler.
//!
//! Covers the handshake, each tool, resources, prompts, and malformed input.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use klq::NumericCoercion;
use klq_mcp::protocol::ProtocolHandler;
use klq_mcp::session::QuerySession;
use klq_mcp::transport::framing;
use klq_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

/// Write fixture tables into `dir` and open a session over them.
fn fixture_session(dir: &tempfile::TempDir, numeric: NumericCoercion) -> QuerySession {
    std::fs::write(
        dir.path().join("devices.json"),
        json!([
            { "device": "N1", "company": "Neuralink", "channels": 1024, "type": "invasive" },
            { "device": "Utah Array", "company": "Blackrock", "channels": 96, "type": "invasive" },
            { "device": "Muse", "company": "Interaxon", "channels": 4, "type": "non-invasive" },
            { "device": "Stentrode", "company": "Synchron", "channels": 16, "type": "endovascular" }
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("techniques.json"),
        json!([
            { "id": "T1", "severity": "critical", "tactic": "Exfiltration" },
            { "id": "T2", "severity": "high", "tactic": "Exfiltration" },
            { "id": "T3", "severity": "critical", "tactic": "Impact" }
        ])
        .to_string(),
    )
    .unwrap();
    QuerySession::open(dir.path(), numeric).unwrap()
}

fn handler_for(dir: &tempfile::TempDir) -> ProtocolHandler {
    ProtocolHandler::new(Arc::new(Mutex::new(fixture_session(
        dir,
        NumericCoercion::Lenient,
    ))))
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Build an initialize request.
fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

/// Send a JSON-RPC message through the handler and return the response.
async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

/// Send and unwrap the response.
async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

/// Call a tool and return its result object.
async fn call_tool(handler: &ProtocolHandler, name: &str, arguments: Value) -> Value {
    let resp = send_unwrap(
        handler,
        mcp_request(1, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await;
    assert!(resp.get("result").is_some(), "expected result, got: {resp}");
    resp["result"].clone()
}

/// Parse the JSON payload of a successful tool call.
fn tool_json(result: &Value) -> Value {
    let text = result["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

async fn read_resource(handler: &ProtocolHandler, uri: &str) -> Value {
    send_unwrap(handler, mcp_request(2, "resources/read", json!({ "uri": uri }))).await
}

// ─────────────────────── handshake ───────────────────────

#[tokio::test]
async fn test_initialize_reports_server() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["id"], 0);
    assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
    assert_eq!(resp["result"]["serverInfo"]["name"], "klq-mcp");
    assert!(resp["result"]["capabilities"]["tools"].is_object());
    assert!(resp["result"]["instructions"]
        .as_str()
        .unwrap()
        .contains("klq_query"));

    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
}

#[tokio::test]
async fn test_future_protocol_version_still_initializes() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let msg = mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2099-01-01",
            "capabilities": {},
            "clientInfo": { "name": "future", "version": "9" }
        }),
    );
    let resp = send_unwrap(&handler, msg).await;
    assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
}

#[tokio::test]
async fn test_ping_and_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let ping = send_unwrap(&handler, mcp_request(5, "ping", json!({}))).await;
    assert_eq!(ping["result"], json!({}));
    let shutdown = send_unwrap(&handler, mcp_request(6, "shutdown", json!({}))).await;
    assert_eq!(shutdown["id"], 6);
    assert!(shutdown.get("error").is_none());
}

// ─────────────────────── tools ───────────────────────

#[tokio::test]
async fn test_tools_list() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["klq_query", "klq_tables", "klq_presets", "klq_parse"]);
}

#[tokio::test]
async fn test_query_tool_runs_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let result = call_tool(
        &handler,
        "klq_query",
        json!({ "query": "devices | where channels > 10 | sort by channels desc | project device, channels" }),
    )
    .await;
    assert!(result.get("isError").is_none());

    let payload = tool_json(&result);
    assert_eq!(payload["tableName"], "devices");
    assert_eq!(payload["total"], 3);
    assert_eq!(payload["truncated"], false);
    let devices: Vec<&str> = payload["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["device"].as_str().unwrap())
        .collect();
    assert_eq!(devices, vec!["N1", "Utah Array", "Stentrode"]);
    assert_eq!(payload["rows"][2]["channels"], 16);
}

#[tokio::test]
async fn test_query_tool_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let payload = tool_json(
        &call_tool(
            &handler,
            "klq_query",
            json!({ "query": "devices", "max_rows": 2 }),
        )
        .await,
    );
    assert_eq!(payload["total"], 4);
    assert_eq!(payload["returned"], 2);
    assert_eq!(payload["truncated"], true);
}

#[tokio::test]
async fn test_query_tool_reports_engine_errors() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let result = call_tool(&handler, "klq_query", json!({ "query": "gadgets | take 1" })).await;
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "Unknown table \"gadgets\". Available: devices, techniques");

    let result = call_tool(&handler, "klq_query", json!({ "query": "devices | explode x" })).await;
    assert_eq!(result["isError"], true);
    assert_eq!(
        result["content"][0]["text"],
        "Unknown operation: \"explode x\""
    );
}

#[tokio::test]
async fn test_query_tool_missing_query_is_invalid_params() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(3, "tools/call", json!({ "name": "klq_query", "arguments": {} })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn test_summarize_through_tool() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let payload = tool_json(
        &call_tool(
            &handler,
            "klq_query",
            json!({ "query": "techniques | summarize count() by tactic" }),
        )
        .await,
    );
    assert_eq!(
        payload["rows"],
        json!([
            { "tactic": "Exfiltration", "count": 2 },
            { "tactic": "Impact", "count": 1 }
        ])
    );
}

#[tokio::test]
async fn test_strict_session_rejects_non_numeric() {
    let dir = tempfile::tempdir().unwrap();
    let session = fixture_session(&dir, NumericCoercion::Strict);
    let handler = ProtocolHandler::new(Arc::new(Mutex::new(session)));

    let result = call_tool(
        &handler,
        "klq_query",
        json!({ "query": "techniques | where severity > 3" }),
    )
    .await;
    assert_eq!(result["isError"], true);
}

#[tokio::test]
async fn test_tables_tool() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let payload = tool_json(&call_tool(&handler, "klq_tables", json!({})).await);
    assert_eq!(payload["table_count"], 2);
    assert_eq!(payload["total_records"], 7);
    assert_eq!(payload["tables"][0]["name"], "devices");
    assert_eq!(
        payload["tables"][0]["fields"],
        json!(["device", "company", "channels", "type"])
    );
    assert_eq!(handler.session().lock().await.registry().len(), 2);
}

#[tokio::test]
async fn test_presets_tool() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let payload = tool_json(&call_tool(&handler, "klq_presets", json!({ "group": "ops" })).await);
    assert_eq!(payload["count"], 4);

    let result = call_tool(&handler, "klq_presets", json!({ "group": "nope" })).await;
    assert_eq!(result["isError"], true);
}

#[tokio::test]
async fn test_parse_tool() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let payload = tool_json(
        &call_tool(
            &handler,
            "klq_parse",
            json!({ "query": "devices|sort by channels|limit 3" }),
        )
        .await,
    );
    assert_eq!(payload["table"], "devices");
    assert_eq!(payload["stages"][0]["stage"], "sort_by");
    assert_eq!(
        payload["normalized"],
        "devices | sort by channels asc | take 3"
    );

    let result = call_tool(&handler, "klq_parse", json!({ "query": "devices | where x" })).await;
    assert_eq!(result["isError"], true);
}

#[tokio::test]
async fn test_unknown_tool() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(1, "tools/call", json!({ "name": "drop_table", "arguments": {} })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32803);
}

// ─────────────────────── resources ───────────────────────

#[tokio::test]
async fn test_resources_list_and_templates() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "resources/list", json!({}))).await;
    let uris: Vec<&str> = resp["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert!(uris.contains(&"klq://tables"));
    assert!(uris.contains(&"klq://syntax"));

    let resp = send_unwrap(&handler, mcp_request(2, "resources/templates/list", json!({}))).await;
    assert_eq!(
        resp["result"]["resourceTemplates"][0]["uriTemplate"],
        "klq://table/{name}"
    );
}

#[tokio::test]
async fn test_read_table_resource() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = read_resource(&handler, "klq://table/techniques").await;
    let content = &resp["result"]["contents"][0];
    assert_eq!(content["mimeType"], "application/json");
    let table: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(table["count"], 3);
    assert_eq!(table["rows"][2]["id"], "T3");
}

#[tokio::test]
async fn test_read_unknown_table_resource() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = read_resource(&handler, "klq://table/gadgets").await;
    assert_eq!(resp["error"]["code"], -32851);
    assert_eq!(resp["error"]["data"]["kind"], "UnknownTable");

    let resp = read_resource(&handler, "klq://nowhere").await;
    assert_eq!(resp["error"]["code"], -32802);
}

#[tokio::test]
async fn test_read_syntax_lists_tables() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = read_resource(&handler, "klq://syntax").await;
    let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains("summarize count() by"));
    assert!(text.contains("devices"));
}

// ─────────────────────── prompts ───────────────────────

#[tokio::test]
async fn test_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;
    assert_eq!(resp["result"]["prompts"].as_array().unwrap().len(), 2);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            2,
            "prompts/get",
            json!({ "name": "explore_table", "arguments": { "table": "devices" } }),
        ),
    )
    .await;
    let text = resp["result"]["messages"][0]["content"]["text"]
        .as_str()
        .unwrap();
    assert!(text.contains("devices | take 5"));

    let resp = send_unwrap(
        &handler,
        mcp_request(3, "prompts/get", json!({ "name": "explore_table", "arguments": {} })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

// ─────────────────────── malformed input ───────────────────────

#[tokio::test]
async fn test_malformed_json() {
    let result = framing::parse_message(r#"{"broken":"#);
    let err = result.unwrap_err();
    assert_eq!(err.code(), -32700);

    assert!(framing::parse_message("").is_err());
    assert!(framing::parse_message(r#"{"jsonrpc":"2.0","id":1,"method":"#).is_err());
}

#[tokio::test]
async fn test_unknown_method() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, mcp_request(9, "tables/drop", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
    assert_eq!(resp["id"], 9);
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let msg = json!({ "jsonrpc": "1.0", "id": 4, "method": "ping" });
    let resp = send_unwrap(&handler, msg).await;
    assert_eq!(resp["error"]["code"], -32600);
}

#[tokio::test]
async fn test_client_responses_get_no_reply() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = json!({ "jsonrpc": "2.0", "id": 12, "result": {} });
    assert!(send(&handler, resp).await.is_none());
    let err = json!({
        "jsonrpc": "2.0",
        "id": "x",
        "error": { "code": -32603, "message": "client failed" }
    });
    assert!(send(&handler, err).await.is_none());
}

#[tokio::test]
async fn test_huge_id_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_for(&dir);

    let resp = send_unwrap(&handler, mcp_request(i64::MAX, "ping", json!({}))).await;
    assert_eq!(resp["id"], i64::MAX);
}

// ─────────────────────── data loading ───────────────────────

#[tokio::test]
async fn test_corrupted_table_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "[{\"a\": ").unwrap();
    assert!(QuerySession::open(dir.path(), NumericCoercion::Lenient).is_err());
}

#[tokio::test]
async fn test_missing_data_path_serves_no_tables() {
    let dir = tempfile::tempdir().unwrap();
    let session = QuerySession::open(&dir.path().join("absent"), NumericCoercion::Lenient).unwrap();
    let handler = ProtocolHandler::new(Arc::new(Mutex::new(session)));

    let result = call_tool(&handler, "klq_query", json!({ "query": "devices" })).await;
    assert_eq!(result["isError"], true);
    assert_eq!(
        result["content"][0]["text"],
        "Unknown table \"devices\". Available: "
    );
}

#[tokio::test]
async fn test_concurrent_queries_share_session() {
    let dir = tempfile::tempdir().unwrap();
    let handler = Arc::new(handler_for(&dir));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(async move {
            let msg = mcp_request(
                i,
                "tools/call",
                json!({ "name": "klq_query", "arguments": { "query": "devices | count" } }),
            );
            send_unwrap(&handler, msg).await
        }));
    }
    for task in tasks {
        let resp = task.await.unwrap();
        let payload = tool_json(&resp["result"]);
        assert_eq!(payload["rows"], json!([{ "count": 4 }]));
    }
}
