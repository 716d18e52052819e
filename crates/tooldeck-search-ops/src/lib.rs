//! Search operation tools: search_text, search_files, find_and_replace,
//! search_duplicates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use similar::TextDiff;

use tooldeck_core::{decode_args, Tool, ToolError};

fn default_dot() -> String {
    ".".to_string()
}

fn default_star() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_results() -> usize {
    100
}

fn default_max_files() -> usize {
    50
}

fn default_context_lines() -> usize {
    2
}

/// Resolve a search directory: relative paths join the workspace.
fn resolve_dir(dir: &str, workspace: &Path) -> Result<PathBuf, ToolError> {
    let path = Path::new(dir);
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    };
    if !resolved.is_dir() {
        return Err(ToolError::NotFound(dir.to_string()));
    }
    Ok(resolved)
}

fn compile_glob(pattern: &str) -> Result<glob::Pattern, ToolError> {
    glob::Pattern::new(pattern)
        .map_err(|err| ToolError::invalid_args(format!("invalid glob pattern: {}", err)))
}

fn build_regex(pattern: &str, case_sensitive: bool, whole_word: bool) -> Result<Regex, ToolError> {
    let source = if whole_word {
        format!(r"\b{}\b", pattern)
    } else {
        pattern.to_string()
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| ToolError::invalid_args(format!("invalid search pattern: {}", err)))
}

/// Walk a directory and return `(absolute, relative)` path pairs, sorted.
///
/// VCS ignore files are not consulted; searches see the file system as-is.
fn walk_paths(
    base: &Path,
    recursive: bool,
    include_hidden: bool,
    files_only: bool,
) -> Vec<(PathBuf, String)> {
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

    let mut paths: Vec<(PathBuf, String)> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.depth() > 0)
        .filter(|entry| {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            !files_only || is_file
        })
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(base)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            (entry.into_path(), rel)
        })
        .collect();
    paths.sort_by(|a, b| a.1.cmp(&b.1));
    paths
}

fn file_name_of(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Candidate files for content-based tools: name-glob included, exclude-glob
/// filtered out.
fn collect_files(
    base: &Path,
    file_pattern: &str,
    exclude_pattern: Option<&str>,
    recursive: bool,
) -> Result<Vec<(PathBuf, String)>, ToolError> {
    let include = compile_glob(file_pattern)?;
    let exclude = exclude_pattern.map(compile_glob).transpose()?;

    Ok(walk_paths(base, recursive, false, true)
        .into_iter()
        .filter(|(_, rel)| include.matches(file_name_of(rel)) || include.matches(rel))
        .filter(|(_, rel)| {
            exclude
                .as_ref()
                .map(|pattern| !pattern.matches(rel) && !pattern.matches(file_name_of(rel)))
                .unwrap_or(true)
        })
        .collect())
}

fn display_path(directory: &str, rel: &str) -> String {
    if directory == "." {
        rel.to_string()
    } else {
        format!("{}/{}", directory.trim_end_matches('/'), rel)
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ============================================================================
// search_text
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchTextArgs {
    pattern: String,
    #[serde(default = "default_dot")]
    directory: String,
    #[serde(default = "default_star")]
    file_pattern: String,
    exclude_pattern: Option<String>,
    #[serde(default = "default_true")]
    recursive: bool,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default)]
    whole_word: bool,
    #[serde(default = "default_max_results")]
    max_results: usize,
    #[serde(default = "default_context_lines")]
    context_lines: usize,
}

struct SearchHit {
    file: String,
    line: usize,
    column: usize,
    matched: String,
    context: String,
}

/// Tool for searching text patterns in files.
pub struct SearchTextTool;

#[async_trait::async_trait]
impl Tool for SearchTextTool {
    fn name(&self) -> &'static str {
        "search_text"
    }

    fn description(&self) -> &'static str {
        "Search for text patterns in files. Patterns are regular expressions; matches report file, line, column and surrounding context."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string", "description": "Text pattern to search for (regex)" },
                "directory": { "type": "string", "description": "Directory to search in", "default": "." },
                "file_pattern": { "type": "string", "description": "File pattern to include (glob)", "default": "*" },
                "exclude_pattern": { "type": "string", "description": "File pattern to exclude (glob)" },
                "recursive": { "type": "boolean", "description": "Search recursively", "default": true },
                "case_sensitive": { "type": "boolean", "description": "Case sensitive search", "default": false },
                "whole_word": { "type": "boolean", "description": "Match whole words only", "default": false },
                "max_results": { "type": "integer", "description": "Maximum number of results", "default": 100 },
                "context_lines": { "type": "integer", "description": "Number of context lines to show", "default": 2 }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: SearchTextArgs = decode_args(args)?;
        let base = resolve_dir(&args.directory, workspace)?;
        let regex = build_regex(&args.pattern, args.case_sensitive, args.whole_word)?;
        let files = collect_files(
            &base,
            &args.file_pattern,
            args.exclude_pattern.as_deref(),
            args.recursive,
        )?;

        let mut hits = Vec::new();
        'files: for (abs, rel) in &files {
            let Ok(content) = fs::read_to_string(abs) else {
                // Binary or unreadable files are skipped, not fatal.
                continue;
            };
            let lines: Vec<&str> = content.lines().collect();
            for (i, line) in lines.iter().enumerate() {
                for found in regex.find_iter(line) {
                    if hits.len() >= args.max_results {
                        break 'files;
                    }
                    let column = line[..found.start()].chars().count() + 1;
                    let ctx_start = i.saturating_sub(args.context_lines);
                    let ctx_end = (i + args.context_lines).min(lines.len().saturating_sub(1));
                    hits.push(SearchHit {
                        file: display_path(&args.directory, rel),
                        line: i + 1,
                        column,
                        matched: found.as_str().to_string(),
                        context: lines[ctx_start..=ctx_end].join("\n"),
                    });
                }
            }
        }

        let mut rendered = String::new();
        for hit in &hits {
            rendered.push_str(&format!(
                "{}:{}:{}\n  Match: \"{}\"\n  Context:\n{}\n\n",
                hit.file,
                hit.line,
                hit.column,
                hit.matched,
                hit.context
                    .lines()
                    .map(|line| format!("    {}", line))
                    .collect::<Vec<_>>()
                    .join("\n")
            ));
        }

        Ok(format!(
            "Text search results for \"{}\":\n\nFound {} matches in {} files\n\n{}",
            args.pattern,
            hits.len(),
            files.len(),
            rendered.trim_end()
        ))
    }
}

// ============================================================================
// search_files
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    File,
    Directory,
    #[default]
    Both,
}

#[derive(Debug, Deserialize)]
struct SearchFilesArgs {
    pattern: String,
    #[serde(default = "default_dot")]
    directory: String,
    #[serde(default = "default_true")]
    recursive: bool,
    #[serde(default)]
    include_hidden: bool,
    #[serde(default, rename = "type")]
    kind: EntryKind,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

/// Tool for finding files by name pattern.
pub struct SearchFilesTool;

#[async_trait::async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &'static str {
        "search_files"
    }

    fn description(&self) -> &'static str {
        "Search for files and directories by name pattern (glob)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string", "description": "File name pattern (glob)" },
                "directory": { "type": "string", "description": "Directory to search in", "default": "." },
                "recursive": { "type": "boolean", "description": "Search recursively", "default": true },
                "include_hidden": { "type": "boolean", "description": "Include hidden files", "default": false },
                "type": {
                    "type": "string",
                    "enum": ["file", "directory", "both"],
                    "description": "Type of items to search for",
                    "default": "both"
                },
                "max_results": { "type": "integer", "description": "Maximum number of results", "default": 100 }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: SearchFilesArgs = decode_args(args)?;
        let base = resolve_dir(&args.directory, workspace)?;
        let pattern = compile_glob(&args.pattern)?;

        let mut results = Vec::new();
        for (abs, rel) in walk_paths(&base, args.recursive, args.include_hidden, false) {
            if results.len() >= args.max_results {
                break;
            }
            let is_dir = abs.is_dir();
            match args.kind {
                EntryKind::File if is_dir => continue,
                EntryKind::Directory if !is_dir => continue,
                _ => {}
            }
            if !pattern.matches(file_name_of(&rel)) && !pattern.matches(&rel) {
                continue;
            }
            let meta = fs::metadata(&abs).ok();
            results.push(json!({
                "path": display_path(&args.directory, &rel),
                "type": if is_dir { "directory" } else { "file" },
                "size": if is_dir { Value::Null } else {
                    meta.as_ref().map(|m| json!(m.len())).unwrap_or(Value::Null)
                },
                "modified": meta
                    .as_ref()
                    .and_then(|m| m.modified().ok())
                    .map(|t| json!(chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()))
                    .unwrap_or(Value::Null),
            }));
        }

        let rendered =
            serde_json::to_string_pretty(&results).map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!(
            "File search results for \"{}\":\n\nFound {} items\n\n{}",
            args.pattern,
            results.len(),
            rendered
        ))
    }
}

// ============================================================================
// find_and_replace
// ============================================================================

#[derive(Debug, Deserialize)]
struct FindAndReplaceArgs {
    find_pattern: String,
    replace_with: String,
    #[serde(default = "default_dot")]
    directory: String,
    #[serde(default = "default_star")]
    file_pattern: String,
    exclude_pattern: Option<String>,
    #[serde(default = "default_true")]
    recursive: bool,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default = "default_true")]
    dry_run: bool,
    #[serde(default = "default_max_files")]
    max_files: usize,
}

fn replace_preview(original: &str, modified: &str, max_lines: usize) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let rendered = diff.unified_diff().context_radius(1).to_string();
    rendered
        .lines()
        .take(max_lines * 2)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tool for project-wide find and replace, dry-run by default.
pub struct FindAndReplaceTool;

#[async_trait::async_trait]
impl Tool for FindAndReplaceTool {
    fn name(&self) -> &'static str {
        "find_and_replace"
    }

    fn description(&self) -> &'static str {
        "Find and replace text across multiple files. Runs as a dry-run preview unless dry_run is set to false."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "find_pattern": { "type": "string", "description": "Pattern to find (regex)" },
                "replace_with": { "type": "string", "description": "Text to replace with" },
                "directory": { "type": "string", "description": "Directory to search in", "default": "." },
                "file_pattern": { "type": "string", "description": "File pattern to include (glob)", "default": "*" },
                "exclude_pattern": { "type": "string", "description": "File pattern to exclude (glob)" },
                "recursive": { "type": "boolean", "description": "Search recursively", "default": true },
                "case_sensitive": { "type": "boolean", "description": "Case sensitive search", "default": false },
                "dry_run": { "type": "boolean", "description": "Preview changes without applying them", "default": true },
                "max_files": { "type": "integer", "description": "Maximum number of files to process", "default": 50 }
            },
            "required": ["find_pattern", "replace_with"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: FindAndReplaceArgs = decode_args(args)?;
        let base = resolve_dir(&args.directory, workspace)?;
        let regex = build_regex(&args.find_pattern, args.case_sensitive, false)?;
        let files = collect_files(
            &base,
            &args.file_pattern,
            args.exclude_pattern.as_deref(),
            args.recursive,
        )?;

        let mut results = Vec::new();
        let mut total_matches = 0usize;
        for (abs, rel) in files.iter().take(args.max_files) {
            let Ok(content) = fs::read_to_string(abs) else {
                continue;
            };
            let count = regex.find_iter(&content).count();
            if count == 0 {
                continue;
            }
            let new_content = regex
                .replace_all(&content, args.replace_with.as_str())
                .into_owned();

            if !args.dry_run {
                fs::write(abs, &new_content).map_err(|err| ToolError::from_io(abs, err))?;
            }

            total_matches += count;
            let mut entry = json!({
                "file": display_path(&args.directory, rel),
                "matches": count,
            });
            if args.dry_run {
                entry["preview"] = json!(replace_preview(&content, &new_content, 3));
            }
            results.push(entry);
        }

        let action = if args.dry_run {
            "Would replace"
        } else {
            "Replaced"
        };
        let rendered =
            serde_json::to_string_pretty(&results).map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!(
            "Find and Replace Results:\n\n{} {} occurrences in {} files\n\n{}",
            action,
            total_matches,
            results.len(),
            rendered
        ))
    }
}

// ============================================================================
// search_duplicates
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DuplicateMethod {
    #[default]
    Content,
    Name,
    Size,
}

impl DuplicateMethod {
    fn as_str(&self) -> &'static str {
        match self {
            DuplicateMethod::Content => "content",
            DuplicateMethod::Name => "name",
            DuplicateMethod::Size => "size",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchDuplicatesArgs {
    #[serde(default = "default_dot")]
    directory: String,
    #[serde(default)]
    method: DuplicateMethod,
    #[serde(default = "default_true")]
    recursive: bool,
    #[serde(default)]
    min_size: u64,
    #[serde(default = "default_star")]
    file_pattern: String,
}

/// Tool for finding duplicate files by content hash, name, or size.
pub struct SearchDuplicatesTool;

#[async_trait::async_trait]
impl Tool for SearchDuplicatesTool {
    fn name(&self) -> &'static str {
        "search_duplicates"
    }

    fn description(&self) -> &'static str {
        "Find duplicate files based on content hash, file name, or file size."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": { "type": "string", "description": "Directory to search in", "default": "." },
                "method": {
                    "type": "string",
                    "enum": ["content", "name", "size"],
                    "description": "Duplicate detection method",
                    "default": "content"
                },
                "recursive": { "type": "boolean", "description": "Search recursively", "default": true },
                "min_size": { "type": "integer", "description": "Minimum file size to consider (bytes)", "default": 0 },
                "file_pattern": { "type": "string", "description": "File pattern to include (glob)", "default": "*" }
            }
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: SearchDuplicatesArgs = decode_args(args)?;
        let base = resolve_dir(&args.directory, workspace)?;
        let files = collect_files(&base, &args.file_pattern, None, args.recursive)?;

        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (abs, rel) in &files {
            let Ok(meta) = fs::metadata(abs) else {
                continue;
            };
            if meta.len() < args.min_size {
                continue;
            }
            let key = match args.method {
                DuplicateMethod::Content => {
                    let Ok(bytes) = fs::read(abs) else { continue };
                    hex_digest(&Md5::digest(&bytes))
                }
                DuplicateMethod::Name => file_name_of(rel).to_string(),
                DuplicateMethod::Size => meta.len().to_string(),
            };
            groups
                .entry(key)
                .or_default()
                .push(display_path(&args.directory, rel));
        }
        groups.retain(|_, paths| paths.len() > 1);

        let rendered =
            serde_json::to_string_pretty(&groups).map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!(
            "Duplicate search results (method: {}):\n\nFound {} duplicate groups\n\n{}",
            args.method.as_str(),
            groups.len(),
            rendered
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    // ========================================================================
    // search_text
    // ========================================================================

    #[tokio::test]
    async fn test_search_text_finds_matches() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "hello world\nsecond line");
        write(dir.path(), "sub/b.txt", "another hello here");

        let out = SearchTextTool
            .execute(json!({"pattern": "hello"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 2 matches"));
        assert!(out.contains("a.txt:1:1"));
        assert!(out.contains("sub/b.txt:1:9"));
    }

    #[tokio::test]
    async fn test_search_text_case_sensitivity() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "Hello\nhello");

        let out = SearchTextTool
            .execute(
                json!({"pattern": "Hello", "case_sensitive": true}),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(out.contains("Found 1 matches"));

        let out = SearchTextTool
            .execute(json!({"pattern": "Hello"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 2 matches"));
    }

    #[tokio::test]
    async fn test_search_text_whole_word() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "cat catalog concatenate\ncat again");

        let out = SearchTextTool
            .execute(json!({"pattern": "cat", "whole_word": true}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 2 matches"));
    }

    #[tokio::test]
    async fn test_search_text_respects_max_results() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "x\nx\nx\nx\nx");

        let out = SearchTextTool
            .execute(json!({"pattern": "x", "max_results": 3}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 3 matches"));
    }

    #[tokio::test]
    async fn test_search_text_context_lines() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "before\nneedle\nafter");

        let out = SearchTextTool
            .execute(json!({"pattern": "needle", "context_lines": 1}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("    before"));
        assert!(out.contains("    after"));
    }

    #[tokio::test]
    async fn test_search_text_invalid_regex() {
        let dir = tempdir().unwrap();
        let err = SearchTextTool
            .execute(json!({"pattern": "(unclosed"}), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    // ========================================================================
    // search_files
    // ========================================================================

    #[tokio::test]
    async fn test_search_files_by_pattern() {
        let dir = tempdir().unwrap();
        write(dir.path(), "keep.rs", "");
        write(dir.path(), "skip.txt", "");
        write(dir.path(), "nested/also.rs", "");

        let out = SearchFilesTool
            .execute(json!({"pattern": "*.rs"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("keep.rs"));
        assert!(out.contains("nested/also.rs"));
        assert!(!out.contains("skip.txt"));
    }

    #[tokio::test]
    async fn test_search_files_type_filter() {
        let dir = tempdir().unwrap();
        write(dir.path(), "thing/file.txt", "");

        let out = SearchFilesTool
            .execute(json!({"pattern": "thing", "type": "directory"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("\"directory\""));
        assert!(out.contains("Found 1 items"));
    }

    // ========================================================================
    // find_and_replace
    // ========================================================================

    #[tokio::test]
    async fn test_find_and_replace_dry_run_preserves_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "old value\nold again");

        let out = FindAndReplaceTool
            .execute(
                json!({"find_pattern": "old", "replace_with": "new"}),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(out.contains("Would replace 2 occurrences in 1 files"));
        assert!(out.contains("preview"));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "old value\nold again"
        );
    }

    #[tokio::test]
    async fn test_find_and_replace_applies_when_not_dry_run() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "old value");
        write(dir.path(), "b.txt", "old too");

        let out = FindAndReplaceTool
            .execute(
                json!({
                    "find_pattern": "old",
                    "replace_with": "new",
                    "dry_run": false
                }),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(out.contains("Replaced 2 occurrences in 2 files"));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "new value"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("b.txt")).unwrap(),
            "new too"
        );
    }

    #[tokio::test]
    async fn test_find_and_replace_exclude_pattern() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "old");
        write(dir.path(), "b.log", "old");

        FindAndReplaceTool
            .execute(
                json!({
                    "find_pattern": "old",
                    "replace_with": "new",
                    "exclude_pattern": "*.log",
                    "dry_run": false
                }),
                dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dir.path().join("b.log")).unwrap(), "old");
    }

    // ========================================================================
    // search_duplicates
    // ========================================================================

    #[tokio::test]
    async fn test_search_duplicates_by_content() {
        let dir = tempdir().unwrap();
        write(dir.path(), "one.txt", "identical payload");
        write(dir.path(), "sub/two.txt", "identical payload");
        write(dir.path(), "three.txt", "different");

        let out = SearchDuplicatesTool
            .execute(json!({"method": "content"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 1 duplicate groups"));
        assert!(out.contains("one.txt"));
        assert!(out.contains("sub/two.txt"));
        assert!(!out.contains("three.txt"));
    }

    #[tokio::test]
    async fn test_search_duplicates_by_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "x/same.txt", "a");
        write(dir.path(), "y/same.txt", "b");

        let out = SearchDuplicatesTool
            .execute(json!({"method": "name"}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 1 duplicate groups"));
        assert!(out.contains("x/same.txt"));
        assert!(out.contains("y/same.txt"));
    }

    #[tokio::test]
    async fn test_search_duplicates_min_size() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "tiny");
        write(dir.path(), "b.txt", "tiny");

        let out = SearchDuplicatesTool
            .execute(json!({"method": "content", "min_size": 100}), dir.path())
            .await
            .unwrap();
        assert!(out.contains("Found 0 duplicate groups"));
    }
}
