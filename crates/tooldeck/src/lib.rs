//! tooldeck - a coding-agent operations server.
//!
//! Exposes a fixed catalog of file-system, shell-execution, text-search, and
//! utility operations over MCP-style JSON-RPC on stdin/stdout. Logging goes
//! to stderr; stdout belongs to the protocol.

pub mod cli;
pub mod logging;
pub mod protocol;
pub mod server;
