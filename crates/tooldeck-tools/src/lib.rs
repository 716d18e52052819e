//! Tool registry for the tooldeck operation server.
//!
//! The registry is built once at startup from the static catalog and never
//! mutated afterwards. It is the single boundary where typed tool errors are
//! rendered into the uniform text envelope.

mod registry;

pub use registry::{ToolDefinition, ToolRegistry, ToolRegistryConfig};

// Re-export the Tool trait for implementors.
pub use tooldeck_core::Tool;
