//! Typed error sum for tool execution.
//!
//! Every failure a tool can produce is one of these variants. Errors travel
//! up with `?` and are only rendered to text once, at the registry boundary.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors produced by tool handlers.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller-supplied arguments are missing or malformed for the requested
    /// operation. Raised before any file I/O happens.
    #[error("{0}")]
    InvalidArgs(String),

    /// A patch could not be applied to the target content.
    #[error("{0}")]
    EditConflict(String),

    /// The target path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The target path exists but is not accessible.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Underlying file-system or subprocess failure.
    #[error("{0}")]
    Io(String),
}

impl ToolError {
    /// Classify an `io::Error` for a path-based operation, mapping the
    /// common kinds onto their dedicated variants.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => ToolError::NotFound(shown),
            io::ErrorKind::PermissionDenied => ToolError::PermissionDenied(shown),
            _ => ToolError::Io(format!("{}: {}", shown, err)),
        }
    }

    pub fn invalid_args(msg: impl Into<String>) -> Self {
        ToolError::InvalidArgs(msg.into())
    }
}
