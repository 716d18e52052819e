//! Terminal operation tools: run_command, run_command_stream,
//! get_environment, get_working_directory, which_command.
//!
//! Commands run through the user's shell with piped stdio and a
//! caller-specified timeout. On expiry the subprocess is killed and whatever
//! output was captured so far is still returned as a normal result.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use tooldeck_core::{decode_args, Tool, ToolError};

/// Exit code reported when a command is killed on timeout.
const TIMEOUT_EXIT_CODE: i32 = 124;

/// Limits and shell selection shared by the execution tools.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Shell binary override; `$SHELL` and `/bin/sh` are the fallbacks.
    pub shell: Option<String>,
    /// Default timeout for `run_command` in milliseconds.
    pub default_timeout_ms: u64,
    /// Default timeout for `run_command_stream` in milliseconds.
    pub stream_timeout_ms: u64,
    /// Cap on captured output per stream, in bytes.
    pub max_output_bytes: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            shell: None,
            default_timeout_ms: 30_000,
            stream_timeout_ms: 60_000,
            max_output_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Shell resolution order: config override, `$SHELL`, `/bin/sh`.
fn resolve_shell(config: &ShellConfig) -> String {
    if cfg!(target_os = "windows") {
        return "cmd".to_string();
    }
    config
        .shell
        .clone()
        .or_else(|| std::env::var("SHELL").ok())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

fn shell_arg() -> &'static str {
    if cfg!(target_os = "windows") {
        "/c"
    } else {
        "-c"
    }
}

/// Resolve a working directory relative to the workspace.
fn resolve_cwd(cwd: Option<&str>, workspace: &Path) -> PathBuf {
    match cwd {
        Some(dir) => {
            let path = Path::new(dir);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workspace.join(path)
            }
        }
        None => workspace.to_path_buf(),
    }
}

/// Clamp captured output, noting the truncation.
fn truncate_output(text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n[output truncated to {} bytes]", &text[..end], max)
}

/// Captured result of one command execution.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u128,
    pub timed_out: bool,
}

/// Run `command` through the shell, capturing stdout/stderr line by line so
/// partial output survives a timeout kill.
pub async fn run_shell(
    command: &str,
    working_dir: &Path,
    timeout_ms: u64,
    env: Option<&HashMap<String, String>>,
    config: &ShellConfig,
) -> Result<CommandOutcome, ToolError> {
    let started = Instant::now();
    let shell = resolve_shell(config);

    debug!(shell = %shell, command = %command, "executing shell command");

    let mut cmd = Command::new(&shell);
    cmd.arg(shell_arg())
        .arg(command)
        .current_dir(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null());
    if let Some(env) = env {
        cmd.envs(env);
    }

    let mut child = cmd
        .spawn()
        .map_err(|err| ToolError::Io(format!("failed to spawn command: {}", err)))?;

    // Reader tasks accumulate into shared buffers so partial output survives
    // a timeout kill even if a grandchild process keeps the pipes open.
    let (stdout_buf, stdout_task) = spawn_reader(child.stdout.take());
    let (stderr_buf, stderr_task) = spawn_reader(child.stderr.take());

    let timeout = tokio::time::Duration::from_millis(timeout_ms);
    let (timed_out, exit_code) = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => (false, status.code().unwrap_or(-1)),
        Ok(Err(err)) => {
            return Err(ToolError::Io(format!("failed to wait for command: {}", err)));
        }
        Err(_) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            (true, TIMEOUT_EXIT_CODE)
        }
    };

    if timed_out {
        // Give the readers a short grace period to drain, then snapshot.
        let grace = tokio::time::Duration::from_millis(200);
        let _ = tokio::time::timeout(grace, async {
            let _ = stdout_task.await;
            let _ = stderr_task.await;
        })
        .await;
    } else {
        let _ = stdout_task.await;
        let _ = stderr_task.await;
    }

    let stdout = snapshot(&stdout_buf);
    let stderr = snapshot(&stderr_buf);

    Ok(CommandOutcome {
        stdout: truncate_output(stdout, config.max_output_bytes),
        stderr: truncate_output(stderr, config.max_output_bytes),
        exit_code,
        duration_ms: started.elapsed().as_millis(),
        timed_out,
    })
}

type SharedBuffer = std::sync::Arc<std::sync::Mutex<String>>;

fn snapshot(buffer: &SharedBuffer) -> String {
    buffer.lock().map(|guard| guard.clone()).unwrap_or_default()
}

fn spawn_reader<R>(stream: Option<R>) -> (SharedBuffer, tokio::task::JoinHandle<()>)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let buffer: SharedBuffer = Default::default();
    let sink = buffer.clone();
    let task = tokio::spawn(async move {
        let Some(stream) = stream else { return };
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if let Ok(mut guard) = sink.lock() {
                        guard.push_str(&line);
                    }
                }
            }
        }
    });
    (buffer, task)
}

/// Render an outcome the way callers expect to read it.
fn format_outcome(
    outcome: &CommandOutcome,
    command: &str,
    working_dir: &Path,
    streamed: bool,
) -> String {
    let mut out = format!(
        "{}Command: {}\nWorking Directory: {}\nExit Code: {}\nDuration: {}ms\n",
        if streamed { "[STREAMED] " } else { "" },
        command,
        working_dir.display(),
        outcome.exit_code,
        outcome.duration_ms,
    );
    if outcome.timed_out {
        out.push_str("Timed out: command was killed; partial output below\n");
    }
    out.push('\n');
    if !outcome.stdout.is_empty() {
        out.push_str("--- STDOUT ---\n");
        out.push_str(&outcome.stdout);
        if !outcome.stdout.ends_with('\n') {
            out.push('\n');
        }
    }
    if !outcome.stderr.is_empty() {
        out.push_str("--- STDERR ---\n");
        out.push_str(&outcome.stderr);
        if !outcome.stderr.ends_with('\n') {
            out.push('\n');
        }
    }
    if outcome.stdout.is_empty() && outcome.stderr.is_empty() {
        out.push_str("(No output)\n");
    }
    out
}

// ============================================================================
// run_command
// ============================================================================

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    command: String,
    working_directory: Option<String>,
    timeout: Option<u64>,
    env: Option<HashMap<String, String>>,
}

/// Tool for executing a shell command with a timeout.
pub struct RunCommandTool {
    config: ShellConfig,
}

impl RunCommandTool {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &'static str {
        "run_command"
    }

    fn description(&self) -> &'static str {
        "Execute a terminal command in a specified directory and capture its output. Timed-out commands are killed and report partial output."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Command to execute" },
                "working_directory": {
                    "type": "string",
                    "description": "Working directory for command execution",
                    "default": "."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Command timeout in milliseconds",
                    "default": 30000
                },
                "env": {
                    "type": "object",
                    "description": "Environment variables to set",
                    "additionalProperties": { "type": "string" }
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: RunCommandArgs = decode_args(args)?;
        let working_dir = resolve_cwd(args.working_directory.as_deref(), workspace);
        if !working_dir.exists() {
            return Err(ToolError::NotFound(format!(
                "working directory {}",
                working_dir.display()
            )));
        }

        let timeout_ms = args.timeout.unwrap_or(self.config.default_timeout_ms);
        let outcome = run_shell(
            &args.command,
            &working_dir,
            timeout_ms,
            args.env.as_ref(),
            &self.config,
        )
        .await?;
        Ok(format_outcome(&outcome, &args.command, &working_dir, false))
    }
}

// ============================================================================
// run_command_stream
// ============================================================================

#[derive(Debug, Deserialize)]
struct RunCommandStreamArgs {
    command: String,
    working_directory: Option<String>,
    timeout: Option<u64>,
}

/// Tool for executing a command with line-buffered incremental capture.
pub struct RunCommandStreamTool {
    config: ShellConfig,
}

impl RunCommandStreamTool {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl Tool for RunCommandStreamTool {
    fn name(&self) -> &'static str {
        "run_command_stream"
    }

    fn description(&self) -> &'static str {
        "Execute a command with line-buffered capture, for longer-running output-heavy commands."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Command to execute" },
                "working_directory": {
                    "type": "string",
                    "description": "Working directory for command execution",
                    "default": "."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Command timeout in milliseconds",
                    "default": 60000
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: RunCommandStreamArgs = decode_args(args)?;
        let working_dir = resolve_cwd(args.working_directory.as_deref(), workspace);
        if !working_dir.exists() {
            return Err(ToolError::NotFound(format!(
                "working directory {}",
                working_dir.display()
            )));
        }

        let timeout_ms = args.timeout.unwrap_or(self.config.stream_timeout_ms);
        let outcome = run_shell(&args.command, &working_dir, timeout_ms, None, &self.config).await?;
        Ok(format_outcome(&outcome, &args.command, &working_dir, true))
    }
}

// ============================================================================
// get_environment
// ============================================================================

#[derive(Debug, Deserialize)]
struct GetEnvironmentArgs {
    filter: Option<String>,
}

/// Tool for inspecting environment variables.
pub struct GetEnvironmentTool;

#[async_trait::async_trait]
impl Tool for GetEnvironmentTool {
    fn name(&self) -> &'static str {
        "get_environment"
    }

    fn description(&self) -> &'static str {
        "Get current environment variables, optionally filtered by a name pattern."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filter": {
                    "type": "string",
                    "description": "Filter environment variables by name pattern (regex, case-insensitive)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: GetEnvironmentArgs = decode_args(args)?;
        let filter = args
            .filter
            .as_deref()
            .map(|pattern| {
                regex::RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
            })
            .transpose()
            .map_err(|err| ToolError::invalid_args(format!("invalid filter pattern: {}", err)))?;

        let env: BTreeMap<String, String> = std::env::vars()
            .filter(|(name, _)| {
                filter
                    .as_ref()
                    .map(|regex| regex.is_match(name))
                    .unwrap_or(true)
            })
            .collect();

        let rendered =
            serde_json::to_string_pretty(&env).map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!("Environment Variables:\n\n{}", rendered))
    }
}

// ============================================================================
// get_working_directory
// ============================================================================

/// Tool reporting the server's current working directory.
pub struct GetWorkingDirectoryTool;

#[async_trait::async_trait]
impl Tool for GetWorkingDirectoryTool {
    fn name(&self) -> &'static str {
        "get_working_directory"
    }

    fn description(&self) -> &'static str {
        "Get the current working directory."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let cwd = std::env::current_dir()
            .map_err(|err| ToolError::Io(format!("failed to get working directory: {}", err)))?;
        Ok(format!("Current Working Directory: {}", cwd.display()))
    }
}

// ============================================================================
// which_command
// ============================================================================

#[derive(Debug, Deserialize)]
struct WhichCommandArgs {
    command: String,
}

/// Find every match of `name` on `$PATH`.
fn which_on_path(name: &str) -> Vec<PathBuf> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .filter(|candidate| candidate.is_file() && is_executable(candidate))
        .collect()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Tool for locating a command on PATH.
pub struct WhichCommandTool;

#[async_trait::async_trait]
impl Tool for WhichCommandTool {
    fn name(&self) -> &'static str {
        "which_command"
    }

    fn description(&self) -> &'static str {
        "Find the path of a command (equivalent to which/where)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Command name to locate" }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: WhichCommandArgs = decode_args(args)?;
        let matches = which_on_path(&args.command);
        if matches.is_empty() {
            return Ok(format!("Command '{}' not found", args.command));
        }
        let listing = matches
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Command '{}' found at:\n{}", args.command, listing))
    }
}
