//! Markdown rendering via `pulldown-cmark`.
//!
//! Raw HTML in the source is escaped rather than passed through, and links
//! and images with script URLs lose their target.

use crate::rich_text::is_safe_url;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

fn parser(markdown: &str) -> Parser<'_> {
    Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH)
}

/// Renders markdown to HTML.
///
/// ```rust
/// use skylink_content::markdown_to_html;
///
/// assert_eq!(markdown_to_html("# Hi"), "<h1>Hi</h1>\n");
/// assert!(markdown_to_html("<b>x</b>").contains("&lt;b&gt;"));
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    let events = parser(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, events);
    out
}

/// Strips markdown down to its text, one space between blocks.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();
    let mut in_code_block = false;

    for event in parser(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) | Event::Code(t) if !in_code_block => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                text.push(' ')
            }
            _ => {}
        }
    }

    normalize_whitespace(&text)
}

/// First paragraph of `markdown` as plain text, cut to `max_chars`.
///
/// Headings are skipped. Truncation happens at a word boundary when one
/// exists and appends `...`. Returns `None` when there is no paragraph.
///
/// ```rust
/// use skylink_content::excerpt;
///
/// let md = "# Title\n\nWe ship **worldwide** in days.\n\nMore.";
/// assert_eq!(excerpt(md, 100).as_deref(), Some("We ship worldwide in days."));
/// assert_eq!(excerpt(md, 12).as_deref(), Some("We ship..."));
/// ```
pub fn excerpt(markdown: &str, max_chars: usize) -> Option<String> {
    let mut in_heading = false;
    let mut in_paragraph = false;
    let mut paragraph = String::new();

    for event in parser(markdown) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,
            Event::Start(Tag::Paragraph) if !in_heading => {
                in_paragraph = true;
                paragraph.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let text = normalize_whitespace(&paragraph);
                if !text.is_empty() {
                    return Some(truncate_chars(&text, max_chars));
                }
                in_paragraph = false;
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => paragraph.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => paragraph.push(' '),
            _ => {}
        }
    }

    None
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let end = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => space,
        _ => cut,
    };
    format!("{}...", head[..end].trim_end())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
