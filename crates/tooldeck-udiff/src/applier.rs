//! Apply parsed hunks to file content, all-or-nothing.

use crate::error::PatchError;
use crate::parser::{Hunk, PatchSet};

/// Apply every hunk of `patch` to `original`.
///
/// Hunks are applied in order against a working copy. Each hunk must match:
/// first at the position its header indicates, then (if the file has
/// drifted) at a unique exact match anywhere in the content. If any hunk
/// fails to match, the whole operation fails and the caller keeps the
/// original content; there is no partial application.
pub fn apply(original: &str, patch: &PatchSet) -> Result<String, PatchError> {
    if patch.hunks.is_empty() {
        return Err(PatchError::NoHunks);
    }

    let mut lines: Vec<String> = original.split('\n').map(String::from).collect();
    // Cumulative line delta from hunks already applied; hunk headers are
    // numbered against the unpatched file.
    let mut offset: isize = 0;

    for (idx, hunk) in patch.hunks.iter().enumerate() {
        let old_block = hunk.old_lines();
        let new_block: Vec<String> = hunk.new_lines().into_iter().map(String::from).collect();

        let hint = expected_position(hunk) + offset;
        let pos = locate(&lines, &old_block, hint).ok_or(PatchError::ContextMismatch {
            hunk: idx + 1,
            line: hunk.old_start,
        })?;

        lines.splice(pos..pos + old_block.len(), new_block.iter().cloned());
        offset += new_block.len() as isize - old_block.len() as isize;
    }

    Ok(lines.join("\n"))
}

/// 0-based index where the hunk's old lines should start.
///
/// For pure insertions (`old_count == 0`) the unified-diff convention is
/// that `old_start` names the line AFTER which to insert.
fn expected_position(hunk: &Hunk) -> isize {
    if hunk.old_count == 0 {
        hunk.old_start as isize
    } else {
        hunk.old_start as isize - 1
    }
}

fn matches_at(lines: &[String], pos: usize, block: &[&str]) -> bool {
    pos + block.len() <= lines.len()
        && block
            .iter()
            .enumerate()
            .all(|(i, expected)| lines[pos + i] == *expected)
}

/// Find where `block` sits in `lines`: the hinted position when it matches,
/// otherwise a unique exact match anywhere. Empty blocks (pure insertions)
/// can only use the hint.
fn locate(lines: &[String], block: &[&str], hint: isize) -> Option<usize> {
    if block.is_empty() {
        let pos = hint.max(0) as usize;
        return (pos <= lines.len()).then_some(pos);
    }

    if hint >= 0 && matches_at(lines, hint as usize, block) {
        return Some(hint as usize);
    }

    let last = lines.len().checked_sub(block.len())?;
    let mut found = None;
    for pos in 0..=last {
        if matches_at(lines, pos, block) {
            if found.is_some() {
                // Ambiguous: refuse to guess.
                return None;
            }
            found = Some(pos);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(body: &str) -> PatchSet {
        PatchSet::parse(body).unwrap()
    }

    #[test]
    fn apply_simple_hunk() {
        let content = "fn main() {\n    println!(\"Hello\");\n}";
        let body = "\
--- a/main.rs
+++ b/main.rs
@@ -1,3 +1,3 @@
 fn main() {
-    println!(\"Hello\");
+    println!(\"Hello, world!\");
 }
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "fn main() {\n    println!(\"Hello, world!\");\n}");
    }

    #[test]
    fn apply_multiple_hunks_in_order() {
        let content = "a\nb\nc\nd\ne\nf";
        let body = "\
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
-a
+A
 b
@@ -5,2 +5,2 @@
-e
+E
 f
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "A\nb\nc\nd\nE\nf");
    }

    #[test]
    fn line_delta_between_hunks_is_tracked() {
        let content = "one\ntwo\nthree\nfour\nfive";
        let body = "\
--- a/f
+++ b/f
@@ -1,2 +1,4 @@
 one
+inserted a
+inserted b
 two
@@ -4,2 +6,2 @@
-four
+FOUR
 five
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "one\ninserted a\ninserted b\ntwo\nthree\nFOUR\nfive");
    }

    #[test]
    fn mismatch_fails_whole_patch() {
        let content = "alpha\nbeta\ngamma";
        let body = "\
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
 alpha
-DIFFERENT
+changed
";
        let err = apply(content, &patch(body)).unwrap_err();
        assert!(matches!(err, PatchError::ContextMismatch { hunk: 1, .. }));
    }

    #[test]
    fn one_good_one_bad_hunk_fails_wholesale() {
        let content = "a\nb\nc\nd";
        let body = "\
--- a/f
+++ b/f
@@ -1,1 +1,1 @@
-a
+A
@@ -3,1 +3,1 @@
-NOT THERE
+x
";
        let err = apply(content, &patch(body)).unwrap_err();
        assert!(matches!(err, PatchError::ContextMismatch { hunk: 2, .. }));
    }

    #[test]
    fn drifted_content_matches_unique_location() {
        // Two extra lines at the top shift everything; the hunk still has a
        // unique exact match.
        let content = "// header\n// header 2\na\nb\nc";
        let body = "\
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
 a
-b
+B
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "// header\n// header 2\na\nB\nc");
    }

    #[test]
    fn ambiguous_match_is_rejected() {
        let content = "x\ny\nx\ny";
        let body = "\
--- a/f
+++ b/f
@@ -10,2 +10,2 @@
 x
-y
+z
";
        // Header points past the end, and the block appears twice.
        let err = apply(content, &patch(body)).unwrap_err();
        assert!(matches!(err, PatchError::ContextMismatch { .. }));
    }

    #[test]
    fn pure_insertion_at_top() {
        let content = "first\nsecond";
        let body = "\
--- a/f
+++ b/f
@@ -0,0 +1,1 @@
+inserted
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "inserted\nfirst\nsecond");
    }

    #[test]
    fn pure_insertion_after_line() {
        let content = "first\nsecond";
        let body = "\
--- a/f
+++ b/f
@@ -1,0 +2,1 @@
+between
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "first\nbetween\nsecond");
    }

    #[test]
    fn deletion_only_hunk() {
        let content = "keep\ndrop\nkeep too";
        let body = "\
--- a/f
+++ b/f
@@ -1,3 +1,2 @@
 keep
-drop
 keep too
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "keep\nkeep too");
    }

    #[test]
    fn trailing_newline_preserved() {
        let content = "a\nb\n";
        let body = "\
--- a/f
+++ b/f
@@ -1,1 +1,1 @@
-a
+A
";
        let result = apply(content, &patch(body)).unwrap();
        assert_eq!(result, "A\nb\n");
    }
}
