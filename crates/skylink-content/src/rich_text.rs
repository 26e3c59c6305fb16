//! Rich-text block rendering.
//!
//! The CMS stores rich fields as a JSON tree of blocks:
//!
//! ```json
//! [
//!   {"type": "heading", "level": 2, "children": [{"type": "text", "text": "Rates"}]},
//!   {"type": "paragraph", "children": [
//!     {"type": "text", "text": "Ship "},
//!     {"type": "text", "text": "today", "bold": true},
//!     {"type": "link", "url": "/quote", "children": [{"type": "text", "text": "quote"}]}
//!   ]},
//!   {"type": "list", "format": "ordered", "children": [
//!     {"type": "list-item", "children": [{"type": "text", "text": "Pack"}]}
//!   ]}
//! ]
//! ```
//!
//! All text and attribute values are HTML-escaped. Unknown block types are
//! skipped.

use pulldown_cmark_escape::{escape_href, escape_html as write_escaped_html};
use serde_json::Value;

/// Escapes `&`, `<`, `>`, `"` and `'`.
///
/// ```rust
/// use skylink_content::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

// Writes into a `String` never fail.
fn push_escaped(out: &mut String, text: &str) {
    let _ = write_escaped_html(out, text);
}

fn push_href(out: &mut String, url: &str) {
    let _ = escape_href(out, url);
}

/// Renders a block array (or a single block object) to HTML.
pub fn blocks_to_html(blocks: &Value) -> String {
    let mut out = String::new();
    match blocks {
        Value::Array(items) => {
            for block in items {
                render_block(block, &mut out);
            }
        }
        Value::Object(_) => render_block(blocks, &mut out),
        _ => {}
    }
    out
}

/// Plain text of a block array: blocks separated by blank lines, list
/// items on their own lines.
pub fn blocks_to_text(blocks: &Value) -> String {
    let parts: Vec<String> = match blocks {
        Value::Array(items) => items.iter().map(block_text).collect(),
        Value::Object(_) => vec![block_text(blocks)],
        _ => Vec::new(),
    };

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn block_type(block: &Value) -> Option<&str> {
    match block.get("type").and_then(Value::as_str) {
        Some(kind) => Some(kind),
        None if block.get("text").is_some() => Some("text"),
        None => None,
    }
}

fn str_field<'a>(block: &'a Value, key: &str) -> Option<&'a str> {
    block.get(key).and_then(Value::as_str)
}

fn children(block: &Value) -> &[Value] {
    block
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn render_children(block: &Value, out: &mut String) {
    for child in children(block) {
        render_block(child, out);
    }
}

fn render_block(block: &Value, out: &mut String) {
    match block_type(block) {
        Some("paragraph") => wrap("p", block, out),
        Some("heading") => {
            let level = block
                .get("level")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6);
            wrap(&format!("h{level}"), block, out);
        }
        Some("list") => {
            let tag = if str_field(block, "format") == Some("ordered") {
                "ol"
            } else {
                "ul"
            };
            wrap(tag, block, out);
        }
        Some("list-item") => wrap("li", block, out),
        Some("quote") => wrap("blockquote", block, out),
        Some("code") => {
            out.push_str("<pre><code>");
            push_escaped(out, &plain_children(block));
            out.push_str("</code></pre>");
        }
        Some("image") => render_image(block, out),
        Some("link") => match str_field(block, "url").filter(|url| is_safe_url(url)) {
            Some(url) => {
                out.push_str("<a href=\"");
                push_href(out, url);
                out.push_str("\">");
                render_children(block, out);
                out.push_str("</a>");
            }
            None => render_children(block, out),
        },
        Some("text") => render_text(block, out),
        Some(other) => log::debug!("Skipping unknown rich-text block type '{other}'"),
        None => log::debug!("Skipping rich-text node without a type"),
    }
}

fn wrap(tag: &str, block: &Value, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_children(block, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_image(block: &Value, out: &mut String) {
    let image = block.get("image").unwrap_or(block);
    let Some(url) = str_field(image, "url").filter(|url| is_safe_url(url)) else {
        log::debug!("Skipping image block without a usable url");
        return;
    };
    let alt = str_field(image, "alternativeText").unwrap_or_default();

    out.push_str("<img src=\"");
    push_href(out, url);
    out.push_str("\" alt=\"");
    push_escaped(out, alt);
    out.push_str("\">");
}

const MARKS: [(&str, &str); 5] = [
    ("code", "code"),
    ("strikethrough", "s"),
    ("underline", "u"),
    ("italic", "em"),
    ("bold", "strong"),
];

fn render_text(node: &Value, out: &mut String) {
    let mut html = escape_html(str_field(node, "text").unwrap_or_default());
    if html.is_empty() {
        return;
    }

    // Innermost first.
    for (mark, tag) in MARKS {
        if node.get(mark).and_then(Value::as_bool).unwrap_or(false) {
            html = format!("<{tag}>{html}</{tag}>");
        }
    }
    out.push_str(&html);
}

/// False for `javascript:`, `vbscript:` and `data:` URLs.
///
/// Browsers drop tab and newline characters anywhere in a URL and leading
/// control characters or spaces before reading the scheme, so the check does
/// too.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let lowered: String = url
        .trim_start_matches(|c: char| c.is_ascii_control() || c == ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    !(lowered.starts_with("javascript:")
        || lowered.starts_with("vbscript:")
        || lowered.starts_with("data:"))
}

fn plain_children(block: &Value) -> String {
    children(block).iter().map(block_text).collect()
}

fn block_text(block: &Value) -> String {
    match block_type(block) {
        Some("text") => str_field(block, "text").unwrap_or_default().to_string(),
        Some("list") => {
            let ordered = str_field(block, "format") == Some("ordered");
            children(block)
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let text = block_text(item);
                    if ordered {
                        format!("{}. {}", i + 1, text.trim())
                    } else {
                        format!("- {}", text.trim())
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Some("image") => {
            let image = block.get("image").unwrap_or(block);
            str_field(image, "alternativeText")
                .unwrap_or_default()
                .to_string()
        }
        _ => plain_children(block),
    }
}
