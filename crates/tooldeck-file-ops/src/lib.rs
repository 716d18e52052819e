//! File operation tools: read_file, write_file, create_file, edit_file,
//! delete_file, copy_file, move_file, list_directory, create_directory,
//! delete_directory.
//!
//! The interesting piece is the edit dispatcher in [`edit`]; everything else
//! is a validated pass-through to `std::fs` with formatted output.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use tooldeck_core::{decode_args, Tool, ToolError};

pub mod edit;
pub mod path;
pub mod report;

pub use edit::{apply_edit, EditSpec, PatchFormat};
pub use report::summarize;

use path::resolve_path;

/// Check if content is likely binary by looking for null bytes in the first
/// 8000 bytes.
fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(8000);
    content[..check_len].contains(&0)
}

fn default_true() -> bool {
    true
}

fn modified_rfc3339(meta: &fs::Metadata) -> Option<String> {
    meta.modified()
        .ok()
        .map(|time| chrono::DateTime::<chrono::Utc>::from(time).to_rfc3339())
}

// ============================================================================
// read_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct ReadFileArgs {
    path: String,
    line_start: Option<usize>,
    line_end: Option<usize>,
}

/// Tool for reading file contents.
pub struct ReadFileTool;

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the contents of a file. Supports an optional line range for reading specific sections."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to read (relative to workspace)"
                },
                "line_start": {
                    "type": "integer",
                    "description": "Starting line number (1-based)"
                },
                "line_end": {
                    "type": "integer",
                    "description": "Ending line number (1-based, inclusive)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: ReadFileArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if !resolved.exists() {
            return Err(ToolError::NotFound(args.path));
        }
        if resolved.is_dir() {
            return Err(ToolError::invalid_args(format!(
                "Path is a directory: {}",
                args.path
            )));
        }

        let bytes = fs::read(&resolved).map_err(|err| ToolError::from_io(&resolved, err))?;
        if is_binary(&bytes) {
            return Err(ToolError::invalid_args(format!(
                "Cannot read binary file: {}",
                args.path
            )));
        }
        let content = String::from_utf8(bytes)
            .map_err(|err| ToolError::Io(format!("file is not valid UTF-8: {}", err)))?;

        let meta = fs::metadata(&resolved).map_err(|err| ToolError::from_io(&resolved, err))?;

        let body = match (args.line_start, args.line_end) {
            (None, None) => content,
            (start, end) => {
                let lines: Vec<&str> = content.lines().collect();
                let start_idx = start.unwrap_or(1).saturating_sub(1);
                if start_idx >= lines.len() {
                    return Err(ToolError::invalid_args(format!(
                        "Line {} is beyond end of file ({} lines)",
                        start.unwrap_or(1),
                        lines.len()
                    )));
                }
                let end_idx = end.unwrap_or(lines.len()).min(lines.len());
                lines[start_idx..end_idx].join("\n")
            }
        };

        Ok(format!(
            "File: {}\nSize: {} bytes\nModified: {}\n\n{}",
            args.path,
            meta.len(),
            modified_rfc3339(&meta).unwrap_or_else(|| "unknown".into()),
            body
        ))
    }
}

// ============================================================================
// write_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
    path: String,
    content: String,
    #[serde(default = "default_true")]
    create_dirs: bool,
}

/// Tool for writing file contents (creates or overwrites).
pub struct WriteFileTool;

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write content to a file, replacing any existing content. Creates parent directories by default."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to write (relative to workspace)"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                },
                "create_dirs": {
                    "type": "boolean",
                    "description": "Create parent directories if they don't exist",
                    "default": true
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: WriteFileArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if resolved.is_dir() {
            return Err(ToolError::invalid_args(format!(
                "Path is a directory: {}",
                args.path
            )));
        }
        if args.create_dirs {
            if let Some(parent) = resolved.parent() {
                fs::create_dir_all(parent).map_err(|err| ToolError::from_io(parent, err))?;
            }
        }

        fs::write(&resolved, &args.content).map_err(|err| ToolError::from_io(&resolved, err))?;
        Ok(format!(
            "Successfully wrote {} bytes to {}",
            args.content.len(),
            args.path
        ))
    }
}

// ============================================================================
// create_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct CreateFileArgs {
    path: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    overwrite: bool,
    #[serde(default = "default_true")]
    create_dirs: bool,
}

/// Tool for creating a new file; refuses to clobber unless asked.
pub struct CreateFileTool;

#[async_trait::async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &'static str {
        "create_file"
    }

    fn description(&self) -> &'static str {
        "Create a new file with optional content. Fails if the file already exists unless overwrite is set."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path for the new file (relative to workspace)"
                },
                "content": {
                    "type": "string",
                    "description": "Initial content for the file",
                    "default": ""
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "Overwrite if the file exists",
                    "default": false
                },
                "create_dirs": {
                    "type": "boolean",
                    "description": "Create parent directories if they don't exist",
                    "default": true
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: CreateFileArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if resolved.exists() && !args.overwrite {
            return Err(ToolError::invalid_args(format!(
                "File {} already exists and overwrite is false",
                args.path
            )));
        }
        if args.create_dirs {
            if let Some(parent) = resolved.parent() {
                fs::create_dir_all(parent).map_err(|err| ToolError::from_io(parent, err))?;
            }
        }

        fs::write(&resolved, &args.content).map_err(|err| ToolError::from_io(&resolved, err))?;
        Ok(format!(
            "Successfully wrote {} bytes to {}",
            args.content.len(),
            args.path
        ))
    }
}

// ============================================================================
// edit_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct EditFileArgs {
    path: String,
    #[serde(flatten)]
    spec: EditSpec,
}

/// Tool for editing a file via one of four strategies; see [`edit::EditSpec`].
pub struct EditFileTool;

#[async_trait::async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &'static str {
        "edit_file"
    }

    fn description(&self) -> &'static str {
        "Edit a file using one of four methods: replace (regex, all matches), line_range (1-based inclusive), char_range (0-based splice), or patch (unified or tagged). Reports a diff of the change."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to edit (relative to workspace)"
                },
                "method": {
                    "type": "string",
                    "enum": ["replace", "line_range", "char_range", "patch"],
                    "description": "Editing method to use"
                },
                "target": {
                    "type": "string",
                    "description": "Regex to find (replace method); every non-overlapping match is replaced"
                },
                "replacement": {
                    "type": "string",
                    "description": "Replacement text (replace, line_range, char_range methods)"
                },
                "start_line": {
                    "type": "integer",
                    "description": "Start line number (1-based, line_range method)"
                },
                "end_line": {
                    "type": "integer",
                    "description": "End line number (1-based inclusive, line_range method; defaults to start_line)"
                },
                "start_char": {
                    "type": "integer",
                    "description": "Start character offset (0-based inclusive, char_range method)"
                },
                "end_char": {
                    "type": "integer",
                    "description": "End character offset (0-based exclusive, char_range method)"
                },
                "body": {
                    "type": "string",
                    "description": "Patch body (patch method)"
                },
                "format": {
                    "type": "string",
                    "enum": ["unified", "tagged"],
                    "description": "Patch body format (patch method)",
                    "default": "unified"
                }
            },
            "required": ["path", "method"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        // Decoding validates the selected method's required fields before
        // any file I/O happens.
        let args: EditFileArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if !resolved.exists() {
            return Err(ToolError::NotFound(args.path));
        }

        let original =
            fs::read_to_string(&resolved).map_err(|err| ToolError::from_io(&resolved, err))?;

        let new_content = apply_edit(&original, &args.spec)?;

        fs::write(&resolved, &new_content).map_err(|err| ToolError::from_io(&resolved, err))?;

        let summary = summarize(&original, &new_content, &args.path);
        tracing::debug!(path = %args.path, "edited file");
        Ok(format!(
            "Successfully edited {}\n\nChanges made:\n{}",
            args.path, summary
        ))
    }
}

// ============================================================================
// delete_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct DeleteFileArgs {
    path: String,
}

/// Tool for deleting a single file.
pub struct DeleteFileTool;

#[async_trait::async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &'static str {
        "delete_file"
    }

    fn description(&self) -> &'static str {
        "Delete a file from the filesystem."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to delete (relative to workspace)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: DeleteFileArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if !resolved.exists() {
            return Err(ToolError::NotFound(args.path));
        }
        if resolved.is_dir() {
            return Err(ToolError::invalid_args(format!(
                "Path is a directory, not a file: {}",
                args.path
            )));
        }

        fs::remove_file(&resolved).map_err(|err| ToolError::from_io(&resolved, err))?;
        Ok(format!("Successfully deleted file {}", args.path))
    }
}

// ============================================================================
// copy_file / move_file
// ============================================================================

#[derive(Debug, Deserialize)]
struct TransferArgs {
    source: String,
    destination: String,
    #[serde(default)]
    overwrite: bool,
}

fn copy_resolved(args: &TransferArgs, workspace: &Path) -> Result<(), ToolError> {
    let source = resolve_path(&args.source, workspace)?;
    let destination = resolve_path(&args.destination, workspace)?;

    if !source.exists() {
        return Err(ToolError::NotFound(args.source.clone()));
    }
    if destination.exists() && !args.overwrite {
        return Err(ToolError::invalid_args(format!(
            "Destination {} already exists and overwrite is false",
            args.destination
        )));
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|err| ToolError::from_io(parent, err))?;
    }
    fs::copy(&source, &destination).map_err(|err| ToolError::from_io(&source, err))?;
    Ok(())
}

/// Tool for copying a file.
pub struct CopyFileTool;

#[async_trait::async_trait]
impl Tool for CopyFileTool {
    fn name(&self) -> &'static str {
        "copy_file"
    }

    fn description(&self) -> &'static str {
        "Copy a file to a new location."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source": { "type": "string", "description": "Source file path" },
                "destination": { "type": "string", "description": "Destination file path" },
                "overwrite": {
                    "type": "boolean",
                    "description": "Overwrite the destination if it exists",
                    "default": false
                }
            },
            "required": ["source", "destination"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: TransferArgs = decode_args(args)?;
        copy_resolved(&args, workspace)?;
        Ok(format!(
            "Successfully copied {} to {}",
            args.source, args.destination
        ))
    }
}

/// Tool for moving/renaming a file (copy then delete).
pub struct MoveFileTool;

#[async_trait::async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &'static str {
        "move_file"
    }

    fn description(&self) -> &'static str {
        "Move or rename a file."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source": { "type": "string", "description": "Source file path" },
                "destination": { "type": "string", "description": "Destination file path" },
                "overwrite": {
                    "type": "boolean",
                    "description": "Overwrite the destination if it exists",
                    "default": false
                }
            },
            "required": ["source", "destination"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: TransferArgs = decode_args(args)?;
        copy_resolved(&args, workspace)?;
        let source = resolve_path(&args.source, workspace)?;
        fs::remove_file(&source).map_err(|err| ToolError::from_io(&source, err))?;
        Ok(format!(
            "Successfully moved {} to {}",
            args.source, args.destination
        ))
    }
}

// ============================================================================
// list_directory
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListDirectoryArgs {
    #[serde(default = "default_dot")]
    path: String,
    #[serde(default)]
    recursive: bool,
    #[serde(default)]
    include_hidden: bool,
    pattern: Option<String>,
}

fn default_dot() -> String {
    ".".to_string()
}

/// Plain directory walk. VCS ignore files are not consulted; listings
/// reflect the file system as-is.
fn walk(base: &Path, recursive: bool, include_hidden: bool) -> Vec<ignore::DirEntry> {
    let mut builder = ignore::WalkBuilder::new(base);
    builder
        .hidden(!include_hidden)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .follow_links(false);
    if !recursive {
        builder.max_depth(Some(1));
    }

    let mut entries: Vec<ignore::DirEntry> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.depth() > 0)
        .collect();
    entries.sort_by(|a, b| a.path().cmp(b.path()));
    entries
}

/// Tool for listing files and directories.
pub struct ListDirectoryTool;

#[async_trait::async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn description(&self) -> &'static str {
        "List files and directories in a given path, optionally recursive and filtered by a glob pattern."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path to list",
                    "default": "."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "List recursively",
                    "default": false
                },
                "include_hidden": {
                    "type": "boolean",
                    "description": "Include hidden files/directories",
                    "default": false
                },
                "pattern": {
                    "type": "string",
                    "description": "Glob pattern to filter results"
                }
            }
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: ListDirectoryArgs = decode_args(args)?;
        let base = resolve_path(&args.path, workspace)?;

        if !base.is_dir() {
            return Err(ToolError::invalid_args(format!(
                "Not a directory: {}",
                args.path
            )));
        }

        let pattern = args
            .pattern
            .as_deref()
            .map(glob::Pattern::new)
            .transpose()
            .map_err(|err| ToolError::invalid_args(format!("invalid glob pattern: {}", err)))?;

        let mut listing = Vec::new();
        for entry in walk(&base, args.recursive, args.include_hidden) {
            let rel = entry
                .path()
                .strip_prefix(&base)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            if let Some(pattern) = &pattern {
                if !pattern.matches(&rel) {
                    continue;
                }
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let meta = entry.metadata().ok();
            listing.push(json!({
                "name": rel,
                "type": if is_dir { "directory" } else { "file" },
                "size": if is_dir { Value::Null } else {
                    meta.as_ref().map(|m| json!(m.len())).unwrap_or(Value::Null)
                },
                "modified": meta
                    .as_ref()
                    .and_then(modified_rfc3339)
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            }));
        }

        let rendered = serde_json::to_string_pretty(&listing)
            .map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!(
            "Directory listing for {}:\n\n{}",
            args.path, rendered
        ))
    }
}

// ============================================================================
// create_directory / delete_directory
// ============================================================================

#[derive(Debug, Deserialize)]
struct CreateDirectoryArgs {
    path: String,
    #[serde(default = "default_true")]
    recursive: bool,
}

/// Tool for creating a directory.
pub struct CreateDirectoryTool;

#[async_trait::async_trait]
impl Tool for CreateDirectoryTool {
    fn name(&self) -> &'static str {
        "create_directory"
    }

    fn description(&self) -> &'static str {
        "Create a directory."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path to create"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Create parent directories if they don't exist",
                    "default": true
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: CreateDirectoryArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        let result = if args.recursive {
            fs::create_dir_all(&resolved)
        } else {
            fs::create_dir(&resolved)
        };
        result.map_err(|err| ToolError::from_io(&resolved, err))?;
        Ok(format!("Successfully created directory {}", args.path))
    }
}

#[derive(Debug, Deserialize)]
struct DeleteDirectoryArgs {
    path: String,
    #[serde(default)]
    recursive: bool,
}

/// Tool for deleting a directory.
pub struct DeleteDirectoryTool;

#[async_trait::async_trait]
impl Tool for DeleteDirectoryTool {
    fn name(&self) -> &'static str {
        "delete_directory"
    }

    fn description(&self) -> &'static str {
        "Delete a directory. Non-recursive deletion fails on non-empty directories."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path to delete"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Delete recursively",
                    "default": false
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: DeleteDirectoryArgs = decode_args(args)?;
        let resolved = resolve_path(&args.path, workspace)?;

        if !resolved.exists() {
            return Err(ToolError::NotFound(args.path));
        }
        if !resolved.is_dir() {
            return Err(ToolError::invalid_args(format!(
                "Not a directory: {}",
                args.path
            )));
        }

        let result = if args.recursive {
            fs::remove_dir_all(&resolved)
        } else {
            fs::remove_dir(&resolved)
        };
        result.map_err(|err| ToolError::from_io(&resolved, err))?;
        Ok(format!("Successfully deleted directory {}", args.path))
    }
}
