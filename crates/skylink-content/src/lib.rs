#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! SkyLink Content
//!
//! Turns CMS field values into HTML. A rich field arrives either as an
//! array of rich-text blocks or as a markdown string; [`render_content`]
//! accepts both.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use skylink_content::render_content;
//!
//! let blocks = json!([{"type": "paragraph", "children": [{"type": "text", "text": "Hi"}]}]);
//! assert_eq!(render_content(&blocks), "<p>Hi</p>");
//! assert_eq!(render_content(&json!("**Hi**")), "<p><strong>Hi</strong></p>\n");
//! ```

pub mod markdown;
pub mod rich_text;

pub use markdown::{excerpt, markdown_to_html, markdown_to_text};
pub use rich_text::{blocks_to_html, blocks_to_text, escape_html};

use serde_json::Value;

/// Renders a rich CMS field, whichever shape it arrived in.
///
/// Strings are treated as markdown, arrays as rich-text blocks. Anything
/// else renders as an empty string.
pub fn render_content(value: &Value) -> String {
    match value {
        Value::String(md) => markdown_to_html(md),
        Value::Array(_) => blocks_to_html(value),
        _ => String::new(),
    }
}

/// Plain-text rendering of a rich CMS field, for terminals and summaries.
pub fn render_plain(value: &Value) -> String {
    match value {
        Value::String(md) => markdown_to_text(md),
        Value::Array(_) => blocks_to_text(value),
        _ => String::new(),
    }
}
