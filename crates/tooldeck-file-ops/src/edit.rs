//! The file-edit dispatcher.
//!
//! An edit request selects one of four content-transformation strategies via
//! its `method` field. Each strategy is a pure content-in/content-out
//! function; the tool around them reads the file once, materializes the new
//! content fully in memory, writes it back, and reports a diff.

use serde::Deserialize;

use regex::Regex;
use tooldeck_core::ToolError;
use tooldeck_udiff::{apply, apply_tagged, PatchSet};

/// Patch body syntax for the `patch` method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchFormat {
    #[default]
    Unified,
    Tagged,
}

/// One edit request, tagged by `method`.
///
/// Exactly one variant is populated per request, and the required fields of
/// the selected variant are validated during decoding, before any file I/O.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum EditSpec {
    /// Replace every non-overlapping match of a regular expression.
    ///
    /// `target` is always interpreted as a regex; callers wanting a literal
    /// substring must escape metacharacters themselves.
    Replace { target: String, replacement: String },

    /// Replace an inclusive 1-based line range.
    LineRange {
        start_line: usize,
        #[serde(default)]
        end_line: Option<usize>,
        #[serde(default)]
        replacement: String,
    },

    /// Splice a character range: `[start_char, end_char)`, 0-based.
    ///
    /// Out-of-range offsets clamp to the content length; offsets are
    /// character offsets, not byte offsets.
    CharRange {
        start_char: usize,
        end_char: usize,
        #[serde(default)]
        replacement: String,
    },

    /// Apply a unified-diff or tagged patch body.
    Patch {
        body: String,
        #[serde(default)]
        format: PatchFormat,
    },
}

/// Produce the new content for `spec` applied to `original`.
///
/// Pure: no file I/O happens here.
pub fn apply_edit(original: &str, spec: &EditSpec) -> Result<String, ToolError> {
    match spec {
        EditSpec::Replace {
            target,
            replacement,
        } => apply_replace(original, target, replacement),
        EditSpec::LineRange {
            start_line,
            end_line,
            replacement,
        } => apply_line_range(original, *start_line, *end_line, replacement),
        EditSpec::CharRange {
            start_char,
            end_char,
            replacement,
        } => apply_char_range(original, *start_char, *end_char, replacement),
        EditSpec::Patch { body, format } => apply_patch(original, body, *format),
    }
}

fn apply_replace(content: &str, target: &str, replacement: &str) -> Result<String, ToolError> {
    let regex = Regex::new(target)
        .map_err(|err| ToolError::invalid_args(format!("invalid target pattern: {}", err)))?;
    Ok(regex.replace_all(content, replacement).into_owned())
}

fn apply_line_range(
    content: &str,
    start_line: usize,
    end_line: Option<usize>,
    replacement: &str,
) -> Result<String, ToolError> {
    if start_line == 0 {
        return Err(ToolError::invalid_args("start_line is 1-based"));
    }
    // A split yields N lines for N-1 separators, so a trailing newline
    // produces an addressable empty final line.
    let mut lines: Vec<&str> = content.split('\n').collect();
    let start = start_line - 1;
    if start >= lines.len() {
        return Err(ToolError::invalid_args(format!(
            "start line {} is out of range ({} lines)",
            start_line,
            lines.len()
        )));
    }

    let end = match end_line {
        Some(end) if end < start_line => {
            return Err(ToolError::invalid_args(format!(
                "end_line {} is before start_line {}",
                end, start_line
            )));
        }
        Some(end) => (end - 1).min(lines.len() - 1),
        None => start,
    };

    let replacement_lines: Vec<&str> = replacement.split('\n').collect();
    lines.splice(start..=end, replacement_lines);
    Ok(lines.join("\n"))
}

fn apply_char_range(
    content: &str,
    start_char: usize,
    end_char: usize,
    replacement: &str,
) -> Result<String, ToolError> {
    if end_char < start_char {
        return Err(ToolError::invalid_args(format!(
            "end_char {} is before start_char {}",
            end_char, start_char
        )));
    }

    let total = content.chars().count();
    let start = start_char.min(total);
    let end = end_char.min(total);

    let mut result = String::with_capacity(content.len() + replacement.len());
    result.extend(content.chars().take(start));
    result.push_str(replacement);
    result.extend(content.chars().skip(end));
    Ok(result)
}

fn apply_patch(content: &str, body: &str, format: PatchFormat) -> Result<String, ToolError> {
    let conflict = |err: tooldeck_udiff::PatchError| ToolError::EditConflict(err.to_string());
    match format {
        PatchFormat::Unified => {
            let patch = PatchSet::parse(body).map_err(conflict)?;
            apply(content, &patch).map_err(conflict)
        }
        PatchFormat::Tagged => apply_tagged(content, body).map_err(conflict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> EditSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn replace_hits_all_matches() {
        let spec = decode(json!({
            "method": "replace",
            "target": "World",
            "replacement": "Universe"
        }));
        let result = apply_edit("Hello World\nThis is a test\nGoodbye World", &spec).unwrap();
        assert_eq!(result, "Hello Universe\nThis is a test\nGoodbye Universe");
    }

    #[test]
    fn replace_leaves_no_matches_behind() {
        let spec = decode(json!({
            "method": "replace",
            "target": "foo",
            "replacement": "bar"
        }));
        let result = apply_edit("foo x foo y foo", &spec).unwrap();
        assert_eq!(Regex::new("foo").unwrap().find_iter(&result).count(), 0);
    }

    #[test]
    fn replace_target_is_a_regex() {
        let spec = decode(json!({
            "method": "replace",
            "target": r"\d+",
            "replacement": "N"
        }));
        assert_eq!(apply_edit("a1 b22 c333", &spec).unwrap(), "aN bN cN");
    }

    #[test]
    fn replace_invalid_pattern_is_rejected() {
        let spec = decode(json!({
            "method": "replace",
            "target": "(unclosed",
            "replacement": ""
        }));
        let err = apply_edit("text", &spec).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    #[test]
    fn line_range_replaces_inclusive_span() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 2,
            "end_line": 3,
            "replacement": "New Line 2\nNew Line 3"
        }));
        let result = apply_edit("Line 1\nLine 2\nLine 3\nLine 4", &spec).unwrap();
        assert_eq!(result, "Line 1\nNew Line 2\nNew Line 3\nLine 4");
    }

    #[test]
    fn line_range_single_line_when_end_omitted() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 2,
            "replacement": "middle"
        }));
        assert_eq!(apply_edit("a\nb\nc", &spec).unwrap(), "a\nmiddle\nc");
    }

    #[test]
    fn line_range_preserves_surrounding_lines() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 2,
            "end_line": 2,
            "replacement": "X"
        }));
        let result = apply_edit("a\nb\nc\nd", &spec).unwrap();
        assert_eq!(result, "a\nX\nc\nd");
    }

    #[test]
    fn line_range_out_of_range_start_is_rejected() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 10,
            "replacement": "x"
        }));
        let err = apply_edit("only\ntwo", &spec).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn line_range_zero_start_is_rejected() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 0,
            "replacement": "x"
        }));
        assert!(apply_edit("a", &spec).is_err());
    }

    #[test]
    fn line_range_end_clamps_to_last_line() {
        let spec = decode(json!({
            "method": "line_range",
            "start_line": 2,
            "end_line": 99,
            "replacement": "tail"
        }));
        assert_eq!(apply_edit("a\nb\nc", &spec).unwrap(), "a\ntail");
    }

    #[test]
    fn char_range_splices() {
        let spec = decode(json!({
            "method": "char_range",
            "start_char": 6,
            "end_char": 11,
            "replacement": "Universe"
        }));
        assert_eq!(apply_edit("Hello World", &spec).unwrap(), "Hello Universe");
    }

    #[test]
    fn char_range_matches_slice_identity() {
        let content = "abcdefgh";
        let (start, end) = (2usize, 5usize);
        let spec = decode(json!({
            "method": "char_range",
            "start_char": start,
            "end_char": end,
            "replacement": "XYZ"
        }));
        let result = apply_edit(content, &spec).unwrap();
        assert_eq!(result, format!("{}XYZ{}", &content[..start], &content[end..]));
    }

    #[test]
    fn char_range_clamps_out_of_range_offsets() {
        let spec = decode(json!({
            "method": "char_range",
            "start_char": 3,
            "end_char": 999,
            "replacement": "!"
        }));
        assert_eq!(apply_edit("abcdef", &spec).unwrap(), "abc!");
    }

    #[test]
    fn char_range_counts_characters_not_bytes() {
        let spec = decode(json!({
            "method": "char_range",
            "start_char": 0,
            "end_char": 2,
            "replacement": "xy"
        }));
        assert_eq!(apply_edit("äöü", &spec).unwrap(), "xyü");
    }

    #[test]
    fn patch_unified_applies() {
        let spec = decode(json!({
            "method": "patch",
            "body": "--- a/f\n+++ b/f\n@@ -1,1 +1,1 @@\n-old\n+new\n"
        }));
        assert_eq!(apply_edit("old", &spec).unwrap(), "new");
    }

    #[test]
    fn patch_empty_body_is_a_conflict() {
        let spec = decode(json!({"method": "patch", "body": ""}));
        let err = apply_edit("content", &spec).unwrap_err();
        assert!(matches!(err, ToolError::EditConflict(_)));
    }

    #[test]
    fn patch_tagged_applies() {
        let spec = decode(json!({
            "method": "patch",
            "format": "tagged",
            "body": "<replace target=\"old\">new</replace>"
        }));
        assert_eq!(apply_edit("old old", &spec).unwrap(), "new new");
    }

    #[test]
    fn decode_rejects_missing_variant_fields() {
        let result = serde_json::from_value::<EditSpec>(json!({
            "method": "replace",
            "target": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn decode_rejects_unknown_method() {
        let result = serde_json::from_value::<EditSpec>(json!({"method": "magic"}));
        assert!(result.is_err());
    }
}
