//! BodyTextService - the main entry point for body-to-text conversion.

use bodytext_core::flowed;

use crate::node::{Node, NodeType};
use crate::quote::{resolve_nesting, QuoteExtractor};
use crate::render::TextRenderer;
use crate::{BodyTextError, Result};

/// The main service for converting message bodies to plain text.
///
/// All conversions are synchronous, run to completion, and leave the
/// caller's tree untouched, so a service can be shared and re-entered
/// freely.
pub struct BodyTextService {
    renderer: TextRenderer,
}

impl BodyTextService {
    /// Create a new BodyTextService
    pub fn new() -> Self {
        Self {
            renderer: TextRenderer::new(),
        }
    }

    /// Convert a message body to plain text with delineated quotes.
    ///
    /// Lines are delineated with LF. Quoted lines are prefixed with
    /// [`bodytext_core::QUOTE_MARKER`], where the number of markers
    /// indicates the depth of nesting of the quote.
    pub fn quoted_text(&self, root: &Node) -> Result<String> {
        check_root(root)?;
        let extractor = QuoteExtractor::new(&self.renderer);
        let (tokenized, quotes) = extractor.extract(root);
        let text = self.renderer.render(&tokenized);
        let text = resolve_nesting(&text, &quotes);
        Ok(replace_non_breaking_space(&text))
    }

    /// Convert a message body to RFC 3676 `format=flowed; delsp=no`
    /// text. This is the composer save path: quoted text reflowed for
    /// transport.
    pub fn flowed_text(&self, root: &Node) -> Result<String> {
        Ok(flowed::wrap(&self.quoted_text(root)?))
    }

    /// Render body text directly, skipping blacklisted tags. Passing
    /// `&["blockquote"]` yields the author's own words without quoted
    /// replies, which is what keyword scanning wants.
    pub fn body_text(&self, root: &Node, blacklist: &[&str]) -> Result<String> {
        check_root(root)?;
        Ok(self.renderer.render_filtered(root, blacklist))
    }

    /// The renderer this service converts with
    pub fn renderer(&self) -> &TextRenderer {
        &self.renderer
    }
}

impl Default for BodyTextService {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts all non-breaking space chars to plain spaces.
fn replace_non_breaking_space(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Only container nodes can be a conversion root.
fn check_root(root: &Node) -> Result<()> {
    match root.node_type {
        NodeType::Element | NodeType::Document | NodeType::DocumentFragment => Ok(()),
        other => Err(BodyTextError::InvalidInput(format!(
            "conversion root must be a container node, got {:?}",
            other
        ))),
    }
}
