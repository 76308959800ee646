//! Markup-to-text rendering.
//!
//! Walks a [`Node`] tree and produces the canonical plain-text form of
//! an email body: `*bold*`, `/italic/`, `_underline_`, link targets in
//! angle brackets, newlines after block elements, blank lines between
//! paragraphs, and whitespace collapsed per the effective white-space
//! mode. The output is deterministic for a stable tree; nothing is
//! memoized and nothing in the input is mutated.

use bodytext_core::QUOTE_MARKER;

use crate::node::{DisplayMode, Node, NodeType, WhitespaceMode};
use crate::quote::{QUOTE_END, QUOTE_START, QUOTE_TOKEN_ATTR};

/// Class that switches an element and its subtree to plain rendering:
/// no emphasis markers, no link expansion.
const PLAIN_CLASS: &str = "plain";

/// Inherited facts carried down the recursion.
#[derive(Clone, Copy)]
struct RenderContext {
    plain: bool,
    whitespace: WhitespaceMode,
}

/// Renders a markup tree to plain text.
pub struct TextRenderer {
    _private: (),
}

impl TextRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Render the content of `root` to plain text.
    pub fn render(&self, root: &Node) -> String {
        self.render_filtered(root, &[])
    }

    /// Render the content of `root`, skipping elements whose tag is in
    /// `blacklist`. Blacklisting `blockquote` yields the author's own
    /// text without quoted replies.
    pub fn render_filtered(&self, root: &Node, blacklist: &[&str]) -> String {
        let ctx = RenderContext {
            plain: root.has_class(PLAIN_CLASS),
            whitespace: root.computed_whitespace(WhitespaceMode::Normal),
        };
        self.render_children(root, blacklist, ctx)
    }

    /// Rendered inner text of a node, as the quote extractor sees it.
    pub(crate) fn render_inner(&self, node: &Node) -> String {
        let ctx = RenderContext {
            plain: false,
            whitespace: node.computed_whitespace(WhitespaceMode::Normal),
        };
        self.render_children(node, &[], ctx)
    }

    fn render_children(&self, node: &Node, blacklist: &[&str], ctx: RenderContext) -> String {
        let child_count = node.children().count();
        let mut text = String::new();

        for (index, child) in node.children().enumerate() {
            match child.node_type {
                NodeType::Text => {
                    let raw = child.node_value.as_deref().unwrap_or("");
                    let raw = scrub_sentinels(raw);
                    if ctx.whitespace.collapses() {
                        let mut value = collapse_whitespace(&raw);
                        if value.starts_with(' ')
                            && (text.is_empty()
                                || text.ends_with(|c: char| c.is_whitespace()))
                        {
                            value.remove(0);
                        }
                        if index + 1 == child_count && value.ends_with(' ') {
                            value.pop();
                        }
                        text.push_str(&value);
                    } else {
                        text.push_str(&raw);
                    }
                }
                NodeType::Element => {
                    let tag = child.tag_name();
                    if blacklist.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                        continue;
                    }
                    let rendered = self.render_element(child, blacklist, ctx);
                    let is_block = child.computed_display() == DisplayMode::Block;
                    text.push_str(&rendered);
                    if is_block && !rendered.is_empty() {
                        text.push('\n');
                        if tag == "p" {
                            text.push('\n');
                        }
                    }
                }
                NodeType::Comment => {}
                NodeType::Document | NodeType::DocumentFragment => {
                    text.push_str(&self.render_children(child, blacklist, ctx));
                }
            }
        }

        text
    }

    fn render_element(&self, element: &Node, blacklist: &[&str], ctx: RenderContext) -> String {
        // Quote placeholders render as their token, nothing else.
        if let Some(index) = element.attr(QUOTE_TOKEN_ATTR) {
            return format!("{}{}{}", QUOTE_START, index, QUOTE_END);
        }

        let mut ctx = ctx;
        if !ctx.plain && element.has_class(PLAIN_CLASS) {
            ctx.plain = true;
        }
        ctx.whitespace = element.computed_whitespace(ctx.whitespace);

        match element.tag_name().as_str() {
            "a" => {
                let content = self.render_children(element, blacklist, ctx);
                if ctx.plain {
                    return content;
                }
                match element.attr("href") {
                    None => content,
                    Some(href) if content == href => format!("<{}>", href),
                    Some(href) => format!("{} <{}>", content, href),
                }
            }
            "b" | "strong" => {
                let content = self.render_children(element, blacklist, ctx);
                if ctx.plain {
                    content
                } else {
                    format!("*{}*", content)
                }
            }
            "i" | "em" => format!("/{}/", self.render_children(element, blacklist, ctx)),
            "u" => format!("_{}_", self.render_children(element, blacklist, ctx)),
            "blockquote" => {
                // Direct rendering mode only; the extraction path swaps
                // quotes for placeholders before rendering.
                let mut content = self.render_children(element, blacklist, ctx);
                if content.ends_with('\n') {
                    content.pop();
                }
                content
                    .split('\n')
                    .map(|line| format!("{}{}", QUOTE_MARKER, line))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            "br" => "\n".to_string(),
            "style" => String::new(),
            _ => self.render_children(element, blacklist, ctx),
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse runs of space, tab, CR and LF into one space. Non-breaking
/// spaces are kept; the quoted-text path normalizes them at the end.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_run = false;

    for c in s.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            if !in_run {
                result.push(' ');
                in_run = true;
            }
        } else {
            result.push(c);
            in_run = false;
        }
    }

    result
}

/// Remove the quote token sentinels from source text. They are from a
/// private use block and reserved for the extractor; content is not
/// allowed to carry them.
fn scrub_sentinels(s: &str) -> String {
    if s.contains(QUOTE_START) || s.contains(QUOTE_END) {
        s.chars()
            .filter(|c| *c != QUOTE_START && *c != QUOTE_END)
            .collect()
    } else {
        s.to_string()
    }
}
