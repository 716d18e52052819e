//! The uniform response envelope.
//!
//! Every operation, success or failure, renders as a list of text content
//! blocks: `{ "content": [{ "type": "text", "text": "..." }] }`. The envelope
//! itself never signals failure structurally; callers inspect the text.

use serde::{Deserialize, Serialize};

/// A single content block inside a tool response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// The envelope returned for every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
}

impl ToolResponse {
    /// Wrap a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// The concatenated text of all blocks, for assertions and display.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
