//! Tag-based patch format.
//!
//! The body contains markup tags instead of unified-diff syntax:
//!
//! ```text
//! <replace target="old text">new text</replace>
//! <insert after="anchor">appended text</insert>
//! <delete target="unwanted"/>
//! ```
//!
//! Targets are literal substrings, and every occurrence is replaced. Tags
//! apply in document order, each against the content as updated by the tags
//! before it, which makes multi-tag interaction deterministic.

use crate::error::PatchError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedTag {
    target: String,
    replacement: String,
}

/// Apply a tagged patch body to `original`.
///
/// Fails with `NoTags` when the body contains no recognized tags.
pub fn apply_tagged(original: &str, body: &str) -> Result<String, PatchError> {
    let tags = parse_tags(body);
    if tags.is_empty() {
        return Err(PatchError::NoTags);
    }

    let mut result = original.to_string();
    for tag in &tags {
        if tag.target.is_empty() {
            continue;
        }
        result = result.replace(&tag.target, &tag.replacement);
    }
    Ok(result)
}

fn parse_tags(body: &str) -> Vec<ParsedTag> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let Some(off) = body[pos..].find('<') else {
            break;
        };
        let start = pos + off;
        let rest = &body[start..];

        let parsed = parse_element(rest, "replace")
            .or_else(|| parse_element(rest, "delete"))
            .or_else(|| parse_insert(rest));

        match parsed {
            Some((consumed, tag)) => {
                tags.push(tag);
                pos = start + consumed;
            }
            None => pos = start + 1,
        }
    }

    tags
}

/// Parse `<name target="...">body</name>` or the self-closing
/// `<name target="..."/>`. Attribute values cannot contain quotes.
fn parse_element(text: &str, name: &str) -> Option<(usize, ParsedTag)> {
    let open = format!("<{} target=\"", name);
    if !text.starts_with(&open) {
        return None;
    }
    let val_start = open.len();
    let val_len = text[val_start..].find('"')?;
    let target = text[val_start..val_start + val_len].to_string();

    let mut idx = val_start + val_len + 1;
    if text[idx..].starts_with("/>") {
        return Some((
            idx + 2,
            ParsedTag {
                target,
                replacement: String::new(),
            },
        ));
    }
    if !text[idx..].starts_with('>') {
        return None;
    }
    idx += 1;

    let close = format!("</{}>", name);
    let body_len = text[idx..].find(&close)?;
    let inner = &text[idx..idx + body_len];
    let consumed = idx + body_len + close.len();

    // `delete` is sugar for replacing with nothing, whatever its body says.
    let replacement = if name == "delete" {
        String::new()
    } else {
        inner.to_string()
    };
    Some((consumed, ParsedTag { target, replacement }))
}

/// Parse `<insert after="anchor">body</insert>`: sugar for replacing the
/// anchor with itself plus the body.
fn parse_insert(text: &str) -> Option<(usize, ParsedTag)> {
    let open = "<insert after=\"";
    if !text.starts_with(open) {
        return None;
    }
    let val_start = open.len();
    let val_len = text[val_start..].find('"')?;
    let anchor = text[val_start..val_start + val_len].to_string();

    let mut idx = val_start + val_len + 1;
    if !text[idx..].starts_with('>') {
        return None;
    }
    idx += 1;

    let close = "</insert>";
    let body_len = text[idx..].find(close)?;
    let inner = &text[idx..idx + body_len];
    let consumed = idx + body_len + close.len();

    Some((
        consumed,
        ParsedTag {
            replacement: format!("{}{}", anchor, inner),
            target: anchor,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_single_tag() {
        let result = apply_tagged(
            "hello world",
            "<replace target=\"world\">there</replace>",
        )
        .unwrap();
        assert_eq!(result, "hello there");
    }

    #[test]
    fn replace_hits_every_occurrence() {
        let result = apply_tagged(
            "Hello World\nThis is a test\nGoodbye World",
            "<replace target=\"World\">Universe</replace>",
        )
        .unwrap();
        assert_eq!(result, "Hello Universe\nThis is a test\nGoodbye Universe");
    }

    #[test]
    fn tags_apply_in_document_order() {
        let result = apply_tagged(
            "aaa",
            "<replace target=\"a\">b</replace><replace target=\"b\">c</replace>",
        )
        .unwrap();
        // The second tag sees the first tag's output.
        assert_eq!(result, "ccc");
    }

    #[test]
    fn multiline_replacement_body() {
        let result = apply_tagged(
            "start MARK end",
            "<replace target=\"MARK\">line one\nline two</replace>",
        )
        .unwrap();
        assert_eq!(result, "start line one\nline two end");
    }

    #[test]
    fn delete_tag_removes_target() {
        let result = apply_tagged("keep DROP keep", "<delete target=\"DROP \"/>").unwrap();
        assert_eq!(result, "keep keep");
    }

    #[test]
    fn insert_tag_appends_after_anchor() {
        let result =
            apply_tagged("one two", "<insert after=\"one\"> and a half</insert>").unwrap();
        assert_eq!(result, "one and a half two");
    }

    #[test]
    fn empty_body_is_rejected() {
        assert_eq!(apply_tagged("content", ""), Err(PatchError::NoTags));
    }

    #[test]
    fn body_without_tags_is_rejected() {
        assert_eq!(
            apply_tagged("content", "no tags here"),
            Err(PatchError::NoTags)
        );
    }

    #[test]
    fn missing_target_leaves_content_unchanged() {
        let result = apply_tagged(
            "hello",
            "<replace target=\"absent\">something</replace>",
        )
        .unwrap();
        assert_eq!(result, "hello");
    }

    #[test]
    fn unterminated_tag_is_skipped() {
        assert_eq!(
            apply_tagged("x", "<replace target=\"x\">never closed"),
            Err(PatchError::NoTags)
        );
    }
}
