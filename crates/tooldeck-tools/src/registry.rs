//! Tool registry implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use tooldeck_core::{Tool, ToolError, ToolResponse};
use tooldeck_file_ops::{
    CopyFileTool, CreateDirectoryTool, CreateFileTool, DeleteDirectoryTool, DeleteFileTool,
    EditFileTool, ListDirectoryTool, MoveFileTool, ReadFileTool, WriteFileTool,
};
use tooldeck_search_ops::{
    FindAndReplaceTool, SearchDuplicatesTool, SearchFilesTool, SearchTextTool,
};
use tooldeck_settings::DeckSettings;
use tooldeck_shell_exec::{
    GetEnvironmentTool, GetWorkingDirectoryTool, RunCommandStreamTool, RunCommandTool, ShellConfig,
    WhichCommandTool,
};
use tooldeck_util_ops::{
    CalculateFileStatsTool, DelayTool, EncodeDecodeTool, FormatJsonTool, GenerateUuidTool,
    GetSystemInfoTool, HashTextTool, ValidateRegexTool,
};

/// Configuration options for the ToolRegistry.
#[derive(Clone, Default)]
pub struct ToolRegistryConfig {
    pub settings: DeckSettings,
}

/// One entry of the discoverable catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Immutable registry mapping operation names to handlers.
///
/// ## Thread Safety
///
/// All registered tools are Send + Sync; the registry itself is shared
/// behind an `Arc` and never mutated after construction.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    workspace: PathBuf,
}

impl ToolRegistry {
    /// Create a registry for the given workspace with default settings.
    pub fn new(workspace: PathBuf) -> Self {
        Self::with_config(workspace, ToolRegistryConfig::default())
    }

    /// Create a registry with custom configuration.
    pub fn with_config(workspace: PathBuf, config: ToolRegistryConfig) -> Self {
        let shell_config = ShellConfig {
            shell: config.settings.terminal.shell.clone(),
            default_timeout_ms: config.settings.limits.default_timeout_ms,
            stream_timeout_ms: config.settings.limits.stream_timeout_ms,
            max_output_bytes: config.settings.limits.max_output_bytes,
        };

        let tool_list: Vec<Arc<dyn Tool>> = vec![
            // File operations
            Arc::new(ReadFileTool),
            Arc::new(WriteFileTool),
            Arc::new(CreateFileTool),
            Arc::new(EditFileTool),
            Arc::new(DeleteFileTool),
            Arc::new(CopyFileTool),
            Arc::new(MoveFileTool),
            Arc::new(ListDirectoryTool),
            Arc::new(CreateDirectoryTool),
            Arc::new(DeleteDirectoryTool),
            // Terminal operations
            Arc::new(RunCommandTool::new(shell_config.clone())),
            Arc::new(RunCommandStreamTool::new(shell_config)),
            Arc::new(GetEnvironmentTool),
            Arc::new(GetWorkingDirectoryTool),
            Arc::new(WhichCommandTool),
            // Search operations
            Arc::new(SearchTextTool),
            Arc::new(SearchFilesTool),
            Arc::new(FindAndReplaceTool),
            Arc::new(SearchDuplicatesTool),
            // Utility operations
            Arc::new(DelayTool),
            Arc::new(GetSystemInfoTool),
            Arc::new(GenerateUuidTool),
            Arc::new(EncodeDecodeTool),
            Arc::new(HashTextTool),
            Arc::new(FormatJsonTool),
            Arc::new(ValidateRegexTool),
            Arc::new(CalculateFileStatsTool),
        ];

        let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();
        for tool in tool_list {
            tools.insert(tool.name().to_string(), tool);
        }

        Self { tools, workspace }
    }

    /// Execute a tool by name, rendering the outcome into the uniform text
    /// envelope.
    ///
    /// Every failure, including an unknown tool name, comes back as a
    /// success-shaped envelope whose text starts with
    /// `Error executing tool <name>:` -- the envelope never signals failure
    /// structurally.
    pub async fn execute(&self, name: &str, args: Value) -> ToolResponse {
        let Some(tool) = self.tools.get(name) else {
            let err = ToolError::UnknownTool(name.to_string());
            return ToolResponse::text(format!("Error executing tool {}: {}", name, err));
        };
        let tool = Arc::clone(tool);

        match tool.execute(args, &self.workspace).await {
            Ok(text) => ToolResponse::text(text),
            Err(err) => {
                tracing::debug!(tool = name, error = %err, "tool execution failed");
                ToolResponse::text(format!("Error executing tool {}: {}", name, err))
            }
        }
    }

    /// List all available tool names.
    pub fn available_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions for the catalog listing, sorted by name for a
    /// deterministic listing.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters(),
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// The workspace path tools resolve relative paths against.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}
