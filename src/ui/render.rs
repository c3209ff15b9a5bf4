//! Terminal rendering of outlines, pages and editor tabs

use crate::inspector::Tab;
use crate::node::{LoadState, NodeKind};
use crate::page::{Page, PageContent};
use crate::tree::OutlineNode;
use crate::ui::{muted, table::property_table, theme, Icons};
use owo_colors::OwoColorize;
use regex::Regex;
use std::sync::OnceLock;

fn block_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|h[1-6]|li|div|tr)>").expect("static pattern")
    })
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"))
}

/// Plain-text approximation of rich text markup for terminals
pub fn strip_markup(markup: &str) -> String {
    let with_breaks = block_break().replace_all(markup, "\n");
    let text = any_tag().replace_all(&with_breaks, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn kind_icon(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Root | NodeKind::Frameset => Icons::FOLDER,
        NodeKind::Frame | NodeKind::TextFrame => Icons::FRAME,
        NodeKind::TextDocument => Icons::FILE,
        NodeKind::TextTable => Icons::TABLE,
        NodeKind::TextList => Icons::LIST,
    }
}

/// Render an outline as an indented tree, one node per line
pub fn render_outline(outline: &OutlineNode) -> String {
    let mut lines = Vec::new();
    if outline.kind == NodeKind::Root {
        lines.push(format!("{} {}", Icons::TREE, "Document".style(theme().header.clone())));
    } else {
        lines.push(outline_line(outline));
    }
    render_children(outline, "", &mut lines);
    lines.join("\n")
}

fn outline_line(node: &OutlineNode) -> String {
    let label = node.label.as_deref().unwrap_or("");
    let mut line = format!(
        "{} {} {}",
        kind_icon(node.kind),
        label.style(theme().kind_style(node.kind)),
        muted(&node.path)
    );
    if node.load_state == LoadState::NotLoaded {
        line.push_str(&format!(" {}", Icons::HOURGLASS));
    }
    line
}

fn render_children(node: &OutlineNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, outline_line(child)));

        let next_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(child, &next_prefix, lines);
    }
}

/// Render one page the way its editor kind displays it
pub fn render_page(page: &Page) -> String {
    match &page.content {
        PageContent::Properties(table) if table.is_empty() => muted("(no properties)"),
        PageContent::Properties(table) => property_table(table),
        PageContent::PlainText(text) if text.is_empty() => muted("(empty)"),
        PageContent::PlainText(text) => text.clone(),
        PageContent::RichText(markup) => strip_markup(markup),
    }
}

/// Render every tab with a heading naming its label and editor kind
pub fn render_tabs(tabs: &[Tab]) -> String {
    tabs.iter()
        .map(|tab| {
            format!(
                "{} {} {}\n{}",
                Icons::TAB,
                tab.label.style(theme().header.clone()),
                muted(&format!("[{}]", tab.editor)),
                render_page(&tab.page)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let html = "<h1>First Header</h1><p>Some text with <b>bold</b> &amp; more</p>";
        assert_eq!(strip_markup(html), "First Header\nSome text with bold & more");
    }

    #[test]
    fn test_strip_markup_line_breaks() {
        assert_eq!(strip_markup("a<br/>b<BR>c"), "a\nb\nc");
    }

    #[test]
    fn test_render_text_page() {
        assert_eq!(render_page(&Page::plain_text("Text", "hello")), "hello");
        assert_eq!(render_page(&Page::rich_text("Preview", "<p>hi</p>")), "hi");
    }
}
