//! Tool trait definition.
//!
//! All tool implementations are registered behind this trait. Implementations
//! must be Send + Sync because the registry is shared across requests.
//!
//! ## Return Contract
//!
//! `execute` returns the human-readable text of the operation on success.
//! Expected failures are returned as `ToolError` values; the registry is the
//! single place where errors are rendered into the text envelope as
//! `Error executing tool <name>: <message>`.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match exactly what the caller requests).
    fn name(&self) -> &'static str;

    /// Tool description for the catalog listing.
    fn description(&self) -> &'static str;

    /// JSON Schema for tool parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// `workspace` is the root directory the server was started in; relative
    /// paths in arguments resolve against it.
    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError>;
}

/// Decode a caller-supplied argument map into a typed request struct.
///
/// All validation of required fields happens here, before the tool touches
/// the file system.
pub fn decode_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|err| ToolError::InvalidArgs(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct DemoArgs {
        path: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn decode_fills_defaults() {
        let args: DemoArgs = decode_args(json!({"path": "a.txt"})).unwrap();
        assert_eq!(args.path, "a.txt");
        assert_eq!(args.count, 0);
    }

    #[test]
    fn decode_rejects_missing_required_field() {
        let err = decode_args::<DemoArgs>(json!({"count": 3})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
        assert!(err.to_string().contains("path"));
    }

    #[test]
    fn decode_rejects_wrong_type() {
        let err = decode_args::<DemoArgs>(json!({"path": 1})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }
}
