//! Patch error surface.

use std::fmt;

/// Reasons a patch body cannot be parsed or applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The body contained no parseable hunks.
    NoHunks,
    /// A hunk header or hunk body line could not be parsed.
    MalformedHunk { line: usize, reason: String },
    /// A hunk's old-side lines do not match the content.
    ContextMismatch { hunk: usize, line: usize },
    /// A tagged patch body contained no recognized tags.
    NoTags,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::NoHunks => write!(f, "patch contains no hunks"),
            PatchError::MalformedHunk { line, reason } => {
                write!(f, "malformed hunk at patch line {}: {}", line, reason)
            }
            PatchError::ContextMismatch { hunk, line } => write!(
                f,
                "hunk {} does not match the file content near line {}",
                hunk, line
            ),
            PatchError::NoTags => write!(f, "patch contains no recognized tags"),
        }
    }
}

impl std::error::Error for PatchError {}
