//! Patch parsing and application for file edits.
//!
//! This crate parses unified-diff documents and applies their hunks to file
//! content, strictly: either every hunk applies at its expected location, or
//! the whole patch is rejected and the caller keeps the original content.
//! A minimal tag-based patch format (`<replace target="...">...</replace>`)
//! is supported as an alternative.
//!
//! # Architecture
//!
//! This is a **Layer 2 (Infrastructure)** crate:
//! - Depends on: nothing (pure Rust implementation)
//! - Used by: tooldeck-file-ops (edit dispatcher)
//!
//! # Usage
//!
//! ```rust
//! use tooldeck_udiff::{apply, PatchSet};
//!
//! let body = "--- a/f\n+++ b/f\n@@ -1,1 +1,1 @@\n-old\n+new\n";
//! let patch = PatchSet::parse(body).unwrap();
//! let new_content = apply("old", &patch).unwrap();
//! assert_eq!(new_content, "new");
//! ```

mod applier;
mod error;
mod parser;
mod tagged;

pub use applier::apply;
pub use error::PatchError;
pub use parser::{Hunk, HunkLine, PatchSet};
pub use tagged::apply_tagged;
