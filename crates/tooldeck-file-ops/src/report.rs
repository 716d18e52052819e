//! Change reporting: a unified-diff-style summary of an edit.

use similar::TextDiff;

/// Summarize the difference between two texts for human display.
///
/// Pure and total: identical inputs yield a "no changes" line, everything
/// else a unified diff with a small header. Deterministic for identical
/// inputs.
pub fn summarize(original: &str, modified: &str, label: &str) -> String {
    if original == modified {
        return format!("No changes detected in {}", label);
    }

    let diff = TextDiff::from_lines(original, modified);
    diff.unified_diff()
        .context_radius(3)
        .header(
            &format!("{} (original)", label),
            &format!("{} (modified)", label),
        )
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_report_no_changes() {
        let summary = summarize("same\ncontent", "same\ncontent", "file.txt");
        assert_eq!(summary, "No changes detected in file.txt");
    }

    #[test]
    fn empty_inputs_report_no_changes() {
        assert_eq!(summarize("", "", "x"), "No changes detected in x");
    }

    #[test]
    fn changed_line_shows_removal_and_addition() {
        let summary = summarize("line1\nline2\nline3", "line1\nmodified\nline3", "f");
        assert!(summary.contains("-line2"));
        assert!(summary.contains("+modified"));
        assert!(summary.contains("f (original)"));
        assert!(summary.contains("f (modified)"));
    }

    #[test]
    fn every_change_is_reflected() {
        let summary = summarize("a\nb\nc", "a\nB\nc\nd", "f");
        assert!(summary.contains("-b"));
        assert!(summary.contains("+B"));
        assert!(summary.contains("+d"));
    }

    #[test]
    fn summary_is_deterministic() {
        let first = summarize("x\ny", "x\nz", "f");
        let second = summarize("x\ny", "x\nz", "f");
        assert_eq!(first, second);
    }
}
