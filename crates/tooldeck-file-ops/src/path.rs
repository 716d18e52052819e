//! Workspace-rooted path resolution.

use std::path::{Path, PathBuf};

use tooldeck_core::ToolError;

/// Resolve a path relative to the workspace and ensure it stays within it.
///
/// For paths that do not exist yet (file creation), the deepest existing
/// ancestor is canonicalized and checked instead, then the missing
/// components are appended back.
pub fn resolve_path(path_str: &str, workspace: &Path) -> Result<PathBuf, ToolError> {
    let path = Path::new(path_str);
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    };

    let workspace_canonical = workspace
        .canonicalize()
        .map_err(|err| ToolError::Io(format!("cannot resolve workspace path: {}", err)))?;

    let canonical = if resolved.exists() {
        resolved
            .canonicalize()
            .map_err(|err| ToolError::Io(format!("cannot resolve path: {}", err)))?
    } else {
        // Walk up to the deepest existing ancestor.
        let mut check_path = resolved.as_path();
        let mut missing_parts: Vec<&std::ffi::OsStr> = Vec::new();
        while !check_path.exists() {
            if let Some(name) = check_path.file_name() {
                missing_parts.push(name);
            }
            match check_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => check_path = parent,
                _ => {
                    check_path = workspace;
                    break;
                }
            }
        }

        let canonical_ancestor = check_path
            .canonicalize()
            .map_err(|err| ToolError::Io(format!("cannot resolve path: {}", err)))?;
        if !canonical_ancestor.starts_with(&workspace_canonical) {
            return Err(outside_workspace(path_str, workspace));
        }

        missing_parts.reverse();
        let mut result = canonical_ancestor;
        for part in missing_parts {
            result = result.join(part);
        }
        result
    };

    if !canonical.starts_with(&workspace_canonical) {
        return Err(outside_workspace(path_str, workspace));
    }

    Ok(canonical)
}

fn outside_workspace(path_str: &str, workspace: &Path) -> ToolError {
    ToolError::PermissionDenied(format!(
        "path '{}' is outside workspace (workspace: {})",
        path_str,
        workspace.display()
    ))
}
