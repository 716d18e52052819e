//! Parse unified-diff documents into hunks.

use crate::error::PatchError;

/// A single line inside a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
    Context(String),
    Removed(String),
    Added(String),
}

/// One contiguous change region of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based start line in the old file (0 for insertions at the top).
    pub old_start: usize,
    pub old_count: usize,
    /// 1-based start line in the new file.
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// The lines this hunk expects to find in the old content.
    pub fn old_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                HunkLine::Context(text) | HunkLine::Removed(text) => Some(text.as_str()),
                HunkLine::Added(_) => None,
            })
            .collect()
    }

    /// The lines this hunk produces in the new content.
    pub fn new_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                HunkLine::Context(text) | HunkLine::Added(text) => Some(text.as_str()),
                HunkLine::Removed(_) => None,
            })
            .collect()
    }
}

/// The hunks of the first file entry in a unified-diff document.
///
/// Multi-file patch bodies are accepted, but only the first file's hunks are
/// kept; everything after the second `--- ` header is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub hunks: Vec<Hunk>,
}

impl PatchSet {
    /// Parse a unified-diff body.
    ///
    /// Fails with `NoHunks` when the body is empty or contains no `@@`
    /// hunks, and with `MalformedHunk` when a hunk header or body line is
    /// unparseable or the header counts do not match the hunk's lines.
    pub fn parse(body: &str) -> Result<PatchSet, PatchError> {
        let mut set = PatchSet::default();
        let lines: Vec<&str> = body
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if let Some(rest) = line.strip_prefix("--- ") {
                // A second file header after parsed hunks: honor the first
                // file entry only.
                if !set.hunks.is_empty() {
                    break;
                }
                set.old_name = Some(rest.trim().to_string());
                i += 1;
                continue;
            }
            if let Some(rest) = line.strip_prefix("+++ ") {
                if set.hunks.is_empty() {
                    set.new_name = Some(rest.trim().to_string());
                }
                i += 1;
                continue;
            }
            if line.starts_with("@@") {
                let (hunk, consumed) = parse_hunk(&lines, i)?;
                set.hunks.push(hunk);
                i += consumed;
                continue;
            }
            // `diff --git`, `index ...` and other noise outside hunks.
            i += 1;
        }

        if set.hunks.is_empty() {
            return Err(PatchError::NoHunks);
        }
        Ok(set)
    }
}

/// Parse one hunk starting at `start` (the `@@` header). Returns the hunk
/// and the number of lines consumed including the header.
fn parse_hunk(lines: &[&str], start: usize) -> Result<(Hunk, usize), PatchError> {
    let header = lines[start];
    let (old_start, old_count, new_start, new_count) =
        parse_hunk_header(header).ok_or_else(|| PatchError::MalformedHunk {
            line: start + 1,
            reason: format!("bad hunk header {:?}", header),
        })?;

    let mut hunk = Hunk {
        old_start,
        old_count,
        new_start,
        new_count,
        lines: Vec::new(),
    };
    let mut old_rem = old_count;
    let mut new_rem = new_count;
    let mut i = start + 1;

    while i < lines.len() && (old_rem > 0 || new_rem > 0) {
        let line = lines[i];
        if line.starts_with('\\') {
            // "\ No newline at end of file"
            i += 1;
            continue;
        }
        if let Some(text) = line.strip_prefix('+') {
            if new_rem == 0 {
                return Err(PatchError::MalformedHunk {
                    line: i + 1,
                    reason: "more added lines than the header declares".into(),
                });
            }
            new_rem -= 1;
            hunk.lines.push(HunkLine::Added(text.to_string()));
        } else if let Some(text) = line.strip_prefix('-') {
            if old_rem == 0 {
                return Err(PatchError::MalformedHunk {
                    line: i + 1,
                    reason: "more removed lines than the header declares".into(),
                });
            }
            old_rem -= 1;
            hunk.lines.push(HunkLine::Removed(text.to_string()));
        } else if line.is_empty() || line.starts_with(' ') {
            // Some producers emit blank context lines without the leading
            // space.
            let text = line.strip_prefix(' ').unwrap_or("");
            if old_rem == 0 || new_rem == 0 {
                return Err(PatchError::MalformedHunk {
                    line: i + 1,
                    reason: "more context lines than the header declares".into(),
                });
            }
            old_rem -= 1;
            new_rem -= 1;
            hunk.lines.push(HunkLine::Context(text.to_string()));
        } else {
            return Err(PatchError::MalformedHunk {
                line: i + 1,
                reason: format!("unexpected line in hunk: {:?}", line),
            });
        }
        i += 1;
    }

    if old_rem > 0 || new_rem > 0 {
        return Err(PatchError::MalformedHunk {
            line: start + 1,
            reason: "hunk is shorter than its header declares".into(),
        });
    }

    Ok((hunk, i - start))
}

/// Parse `@@ -old_start[,old_count] +new_start[,new_count] @@`.
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let rest = line.strip_prefix("@@ -")?;
    let end = rest.find(" @@")?;
    let spec = &rest[..end];
    let (old, new) = spec.split_once(" +")?;
    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(spec: &str) -> Option<(usize, usize)> {
    match spec.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((spec.parse().ok()?, 1)),
    }
}
