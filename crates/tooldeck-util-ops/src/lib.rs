//! Utility tools: delay, get_system_info, generate_uuid, encode_decode,
//! hash_text, format_json, validate_regex, calculate_file_stats.
//!
//! Every one of these is a thin, validated pass-through to a library
//! primitive with formatted output.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

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

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ============================================================================
// delay
// ============================================================================

#[derive(Debug, Deserialize)]
struct DelayArgs {
    milliseconds: Option<u64>,
    seconds: Option<f64>,
}

/// Tool that waits for a specified amount of time.
pub struct DelayTool;

#[async_trait::async_trait]
impl Tool for DelayTool {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn description(&self) -> &'static str {
        "Wait for a specified amount of time."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "milliseconds": { "type": "number", "description": "Time to wait in milliseconds" },
                "seconds": { "type": "number", "description": "Time to wait in seconds (alternative to milliseconds)" }
            }
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: DelayArgs = decode_args(args)?;
        let requested_ms = args
            .milliseconds
            .or_else(|| args.seconds.map(|s| (s * 1000.0) as u64))
            .unwrap_or(0);
        if requested_ms == 0 {
            return Err(ToolError::invalid_args("Delay time must be greater than 0"));
        }

        let started = Instant::now();
        tokio::time::sleep(tokio::time::Duration::from_millis(requested_ms)).await;
        let actual = started.elapsed().as_millis();

        Ok(format!(
            "Delayed for {}ms (requested: {}ms)",
            actual, requested_ms
        ))
    }
}

// ============================================================================
// get_system_info
// ============================================================================

#[derive(Debug, Deserialize)]
struct SystemInfoArgs {
    #[serde(default)]
    detailed: bool,
}

/// Tool reporting basic process and host information.
pub struct GetSystemInfoTool;

#[async_trait::async_trait]
impl Tool for GetSystemInfoTool {
    fn name(&self) -> &'static str {
        "get_system_info"
    }

    fn description(&self) -> &'static str {
        "Get system information."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "detailed": {
                    "type": "boolean",
                    "description": "Include detailed system information",
                    "default": false
                }
            }
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: SystemInfoArgs = decode_args(args)?;

        let mut info = json!({
            "platform": std::env::consts::OS,
            "architecture": std::env::consts::ARCH,
            "family": std::env::consts::FAMILY,
            "serverVersion": env!("CARGO_PKG_VERSION"),
            "pid": std::process::id(),
            "cpus": std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        });

        if args.detailed {
            let detail = info.as_object_mut().ok_or_else(|| {
                ToolError::Io("system info rendering failed".to_string())
            })?;
            detail.insert(
                "hostname".into(),
                json!(std::env::var("HOSTNAME")
                    .or_else(|_| std::env::var("COMPUTERNAME"))
                    .unwrap_or_else(|_| "unknown".into())),
            );
            detail.insert(
                "currentDir".into(),
                json!(std::env::current_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "unknown".into())),
            );
            detail.insert(
                "tempDir".into(),
                json!(std::env::temp_dir().display().to_string()),
            );
            detail.insert("envVarCount".into(), json!(std::env::vars().count()));
            detail.insert("timestamp".into(), json!(chrono::Utc::now().to_rfc3339()));
        }

        let rendered =
            serde_json::to_string_pretty(&info).map_err(|err| ToolError::Io(err.to_string()))?;
        let header = if args.detailed {
            "System Information (Detailed)"
        } else {
            "System Information"
        };
        Ok(format!("{}:\n\n{}", header, rendered))
    }
}

// ============================================================================
// generate_uuid
// ============================================================================

fn default_uuid_version() -> u8 {
    4
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct GenerateUuidArgs {
    #[serde(default = "default_uuid_version")]
    version: u8,
    #[serde(default = "default_count")]
    count: usize,
}

/// Tool for generating UUIDs.
pub struct GenerateUuidTool;

#[async_trait::async_trait]
impl Tool for GenerateUuidTool {
    fn name(&self) -> &'static str {
        "generate_uuid"
    }

    fn description(&self) -> &'static str {
        "Generate one or more UUIDs (version 1 or 4)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "version": {
                    "type": "number",
                    "enum": [1, 4],
                    "description": "UUID version (1 or 4)",
                    "default": 4
                },
                "count": {
                    "type": "number",
                    "description": "Number of UUIDs to generate",
                    "default": 1,
                    "minimum": 1,
                    "maximum": 100
                }
            }
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: GenerateUuidArgs = decode_args(args)?;
        if args.count < 1 || args.count > 100 {
            return Err(ToolError::invalid_args("count must be between 1 and 100"));
        }

        let mut uuids = Vec::with_capacity(args.count);
        for _ in 0..args.count {
            let uuid = match args.version {
                4 => uuid::Uuid::new_v4(),
                1 => {
                    let node_id: [u8; 6] = rand::random();
                    uuid::Uuid::now_v1(&node_id)
                }
                other => {
                    return Err(ToolError::invalid_args(format!(
                        "Unsupported UUID version: {}",
                        other
                    )));
                }
            };
            uuids.push(uuid.to_string());
        }

        if args.count == 1 {
            Ok(uuids.remove(0))
        } else {
            Ok(format!(
                "Generated {} UUIDs:\n{}",
                args.count,
                uuids.join("\n")
            ))
        }
    }
}

// ============================================================================
// encode_decode
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum CodecMethod {
    Base64Encode,
    Base64Decode,
    UrlEncode,
    UrlDecode,
    HtmlEncode,
    HtmlDecode,
}

impl CodecMethod {
    fn as_str(&self) -> &'static str {
        match self {
            CodecMethod::Base64Encode => "base64-encode",
            CodecMethod::Base64Decode => "base64-decode",
            CodecMethod::UrlEncode => "url-encode",
            CodecMethod::UrlDecode => "url-decode",
            CodecMethod::HtmlEncode => "html-encode",
            CodecMethod::HtmlDecode => "html-decode",
        }
    }
}

#[derive(Debug, Deserialize)]
struct EncodeDecodeArgs {
    text: String,
    method: CodecMethod,
}

fn html_encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn html_decode(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Tool for encoding and decoding text.
pub struct EncodeDecodeTool;

#[async_trait::async_trait]
impl Tool for EncodeDecodeTool {
    fn name(&self) -> &'static str {
        "encode_decode"
    }

    fn description(&self) -> &'static str {
        "Encode or decode text using base64, URL, or HTML entity methods."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to encode/decode" },
                "method": {
                    "type": "string",
                    "enum": ["base64-encode", "base64-decode", "url-encode", "url-decode", "html-encode", "html-decode"],
                    "description": "Encoding/decoding method"
                }
            },
            "required": ["text", "method"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: EncodeDecodeArgs = decode_args(args)?;
        let result = match args.method {
            CodecMethod::Base64Encode => BASE64.encode(args.text.as_bytes()),
            CodecMethod::Base64Decode => {
                let bytes = BASE64.decode(args.text.as_bytes()).map_err(|err| {
                    ToolError::invalid_args(format!("Encoding/decoding failed: {}", err))
                })?;
                String::from_utf8(bytes).map_err(|err| {
                    ToolError::invalid_args(format!("Encoding/decoding failed: {}", err))
                })?
            }
            CodecMethod::UrlEncode => urlencoding::encode(&args.text).into_owned(),
            CodecMethod::UrlDecode => urlencoding::decode(&args.text)
                .map_err(|err| {
                    ToolError::invalid_args(format!("Encoding/decoding failed: {}", err))
                })?
                .into_owned(),
            CodecMethod::HtmlEncode => html_encode(&args.text),
            CodecMethod::HtmlDecode => html_decode(&args.text),
        };

        Ok(format!("{} result:\n{}", args.method.as_str(), result))
    }
}

// ============================================================================
// hash_text
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum HashEncoding {
    #[default]
    Hex,
    Base64,
}

#[derive(Debug, Deserialize)]
struct HashTextArgs {
    text: String,
    #[serde(default)]
    algorithm: HashAlgorithm,
    #[serde(default)]
    encoding: HashEncoding,
}

/// Tool for hashing text.
pub struct HashTextTool;

#[async_trait::async_trait]
impl Tool for HashTextTool {
    fn name(&self) -> &'static str {
        "hash_text"
    }

    fn description(&self) -> &'static str {
        "Generate a hash of text using md5, sha1, sha256 or sha512."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to hash" },
                "algorithm": {
                    "type": "string",
                    "enum": ["md5", "sha1", "sha256", "sha512"],
                    "description": "Hash algorithm",
                    "default": "sha256"
                },
                "encoding": {
                    "type": "string",
                    "enum": ["hex", "base64"],
                    "description": "Output encoding",
                    "default": "hex"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: HashTextArgs = decode_args(args)?;
        let digest: Vec<u8> = match args.algorithm {
            HashAlgorithm::Md5 => md5::Md5::digest(args.text.as_bytes()).to_vec(),
            HashAlgorithm::Sha1 => Sha1::digest(args.text.as_bytes()).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(args.text.as_bytes()).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(args.text.as_bytes()).to_vec(),
        };
        let rendered = match args.encoding {
            HashEncoding::Hex => hex_digest(&digest),
            HashEncoding::Base64 => BASE64.encode(&digest),
        };
        let encoding = match args.encoding {
            HashEncoding::Hex => "hex",
            HashEncoding::Base64 => "base64",
        };
        Ok(format!(
            "{} hash ({}):\n{}",
            args.algorithm.as_str().to_uppercase(),
            encoding,
            rendered
        ))
    }
}

// ============================================================================
// format_json
// ============================================================================

fn default_indent() -> usize {
    2
}

#[derive(Debug, Deserialize)]
struct FormatJsonArgs {
    json: String,
    #[serde(default = "default_indent")]
    indent: usize,
    #[serde(default)]
    sort_keys: bool,
}

fn sort_value_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, sort_value_keys(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_value_keys).collect()),
        other => other,
    }
}

fn pretty_with_indent(value: &Value, indent: usize) -> Result<String, ToolError> {
    use serde::Serialize;
    let indent_str = " ".repeat(indent.min(16));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| ToolError::Io(err.to_string()))?;
    String::from_utf8(out).map_err(|err| ToolError::Io(err.to_string()))
}

/// Tool for formatting and validating JSON.
pub struct FormatJsonTool;

#[async_trait::async_trait]
impl Tool for FormatJsonTool {
    fn name(&self) -> &'static str {
        "format_json"
    }

    fn description(&self) -> &'static str {
        "Format and validate a JSON string."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "json": { "type": "string", "description": "JSON string to format" },
                "indent": { "type": "number", "description": "Indentation spaces", "default": 2 },
                "sort_keys": { "type": "boolean", "description": "Sort object keys", "default": false }
            },
            "required": ["json"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: FormatJsonArgs = decode_args(args)?;
        // Invalid JSON is a normal text outcome here, not an error.
        let parsed: Value = match serde_json::from_str(&args.json) {
            Ok(value) => value,
            Err(err) => return Ok(format!("Invalid JSON: {}", err)),
        };
        let value = if args.sort_keys {
            sort_value_keys(parsed)
        } else {
            parsed
        };
        Ok(format!(
            "Formatted JSON:\n{}",
            pretty_with_indent(&value, args.indent)?
        ))
    }
}

// ============================================================================
// validate_regex
// ============================================================================

#[derive(Debug, Deserialize)]
struct ValidateRegexArgs {
    pattern: String,
    test_string: Option<String>,
    #[serde(default)]
    flags: String,
}

fn build_flagged_regex(pattern: &str, flags: &str) -> Result<regex::Regex, regex::Error> {
    let mut builder = regex::RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            // 'g' and friends have no meaning here; matches are always
            // enumerated globally.
            _ => {}
        }
    }
    builder.build()
}

/// Tool for validating and testing regular expressions.
pub struct ValidateRegexTool;

#[async_trait::async_trait]
impl Tool for ValidateRegexTool {
    fn name(&self) -> &'static str {
        "validate_regex"
    }

    fn description(&self) -> &'static str {
        "Validate a regular expression and optionally test it against a string."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string", "description": "Regular expression pattern" },
                "test_string": { "type": "string", "description": "String to test against the pattern" },
                "flags": { "type": "string", "description": "Regex flags (i, m, s, x)", "default": "" }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> Result<String, ToolError> {
        let args: ValidateRegexArgs = decode_args(args)?;
        // An invalid pattern is a normal text outcome, not an error.
        let regex = match build_flagged_regex(&args.pattern, &args.flags) {
            Ok(regex) => regex,
            Err(err) => return Ok(format!("Invalid regular expression: {}", err)),
        };

        let mut out = format!(
            "Regular expression is valid: /{}/{}\n",
            args.pattern, args.flags
        );
        if let Some(test_string) = &args.test_string {
            let matches: Vec<_> = regex.find_iter(test_string).collect();
            out.push_str(&format!("\nTest string: \"{}\"\n", test_string));
            out.push_str(&format!(
                "Matches: {}\n",
                if matches.is_empty() { "No" } else { "Yes" }
            ));
            if !matches.is_empty() {
                out.push_str("All matches:\n");
                for (index, found) in matches.iter().enumerate() {
                    let position = test_string[..found.start()].chars().count();
                    out.push_str(&format!(
                        "  {}: \"{}\" at position {}\n",
                        index + 1,
                        found.as_str(),
                        position
                    ));
                }
            }
        }
        Ok(out)
    }
}

// ============================================================================
// calculate_file_stats
// ============================================================================

#[derive(Debug, Deserialize)]
struct FileStatsArgs {
    #[serde(default = "default_dot")]
    directory: String,
    #[serde(default = "default_true")]
    recursive: bool,
    #[serde(default = "default_star")]
    file_pattern: String,
}

const SIZE_RANGES: [(&str, u64); 4] = [
    ("tiny (< 1KB)", 1024),
    ("small (1KB - 10KB)", 10 * 1024),
    ("medium (10KB - 100KB)", 100 * 1024),
    ("large (100KB - 1MB)", 1024 * 1024),
];

fn size_bucket(size: u64) -> &'static str {
    for (label, limit) in SIZE_RANGES {
        if size < limit {
            return label;
        }
    }
    "huge (> 1MB)"
}

/// Tool for calculating aggregate statistics over files in a directory.
pub struct CalculateFileStatsTool;

#[async_trait::async_trait]
impl Tool for CalculateFileStatsTool {
    fn name(&self) -> &'static str {
        "calculate_file_stats"
    }

    fn description(&self) -> &'static str {
        "Calculate statistics for files in a directory: totals, extension breakdown, and size distribution."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": { "type": "string", "description": "Directory to analyze", "default": "." },
                "recursive": { "type": "boolean", "description": "Include subdirectories", "default": true },
                "file_pattern": { "type": "string", "description": "File pattern to include", "default": "*" }
            }
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> Result<String, ToolError> {
        let args: FileStatsArgs = decode_args(args)?;
        let base = {
            let path = Path::new(&args.directory);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workspace.join(path)
            }
        };
        if !base.is_dir() {
            return Err(ToolError::NotFound(args.directory));
        }
        let pattern = glob::Pattern::new(&args.file_pattern)
            .map_err(|err| ToolError::invalid_args(format!("invalid glob pattern: {}", err)))?;

        let mut builder = ignore::WalkBuilder::new(&base);
        builder
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .follow_links(false);
        if !args.recursive {
            builder.max_depth(Some(1));
        }

        let mut total_files = 0u64;
        let mut total_size = 0u64;
        let mut extensions: BTreeMap<String, u64> = BTreeMap::new();
        let mut size_ranges: BTreeMap<&'static str, u64> = BTreeMap::new();
        for (label, _) in SIZE_RANGES {
            size_ranges.insert(label, 0);
        }
        size_ranges.insert("huge (> 1MB)", 0);

        for entry in builder.build().filter_map(Result::ok) {
            if entry.depth() == 0 || !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !pattern.matches(&name) {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            let size = meta.len();

            total_files += 1;
            total_size += size;
            let ext = entry
                .path()
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_else(|| "(no extension)".to_string());
            *extensions.entry(ext).or_insert(0) += 1;
            *size_ranges.entry(size_bucket(size)).or_insert(0) += 1;
        }

        let stats = json!({
            "directory": args.directory,
            "totalFiles": total_files,
            "totalSize": total_size,
            "averageSize": if total_files > 0 { total_size / total_files } else { 0 },
            "extensionBreakdown": extensions,
            "sizeDistribution": size_ranges,
        });
        let rendered =
            serde_json::to_string_pretty(&stats).map_err(|err| ToolError::Io(err.to_string()))?;
        Ok(format!("File Statistics:\n\n{}", rendered))
    }
}
