//! The stdio request loop.
//!
//! One JSON document per line on stdin, one response per line on stdout.
//! Requests are handled in arrival order; tool-level failures stay inside
//! the success-shaped text envelope, so JSON-RPC errors only cover framing
//! problems (parse errors, unknown methods, missing params).

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use tooldeck_tools::ToolRegistry;

use crate::protocol::{Request, Response, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Serve the registry over stdin/stdout until EOF.
pub async fn run(registry: ToolRegistry) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                write_response(
                    &mut stdout,
                    Response::err(Value::Null, PARSE_ERROR, err.to_string()),
                )
                .await?;
                continue;
            }
        };

        if let Some(response) = handle_request(&registry, request).await {
            write_response(&mut stdout, response).await?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle one request. Notifications return `None`.
pub async fn handle_request(registry: &ToolRegistry, request: Request) -> Option<Response> {
    debug!(method = %request.method, "handling request");

    if request.is_notification() {
        // notifications/initialized and friends need no reply.
        return None;
    }
    let id = request.id.clone().unwrap_or(Value::Null);

    let response = match request.method.as_str() {
        "initialize" => Response::ok(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "tooldeck",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "ping" => Response::ok(id, json!({})),
        "tools/list" => match serde_json::to_value(registry.definitions()) {
            Ok(tools) => Response::ok(id, json!({ "tools": tools })),
            Err(err) => Response::err(id, PARSE_ERROR, err.to_string()),
        },
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return Some(Response::err(id, INVALID_PARAMS, "name is required"));
            };
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            let envelope = registry.execute(name, arguments).await;
            match serde_json::to_value(&envelope) {
                Ok(result) => Response::ok(id, result),
                Err(err) => Response::err(id, PARSE_ERROR, err.to_string()),
            }
        }
        _ => Response::err(id, METHOD_NOT_FOUND, "method not found"),
    };
    Some(response)
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    response: Response,
) -> Result<()> {
    let mut payload = serde_json::to_vec(&response)?;
    payload.push(b'\n');
    stdout.write_all(&payload).await?;
    stdout.flush().await?;
    Ok(())
}
