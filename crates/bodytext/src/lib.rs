//! # bodytext
//!
//! Convert email DOM bodies to plain text.
//!
//! The conversion reproduces, byte for byte, the plain-text form a
//! mail protocol expects: inline styling becomes `*bold*`, `/italic/`
//! and `_underline_` markers, links are expanded to their targets,
//! nested quotes are delineated with per-level markers, and the result
//! can be reflowed as RFC 3676 `format=flowed` text for transport.
//!
//! ## Design
//!
//! The library accepts a CDP-style [`Node`] tree rather than an HTML
//! string. The host document engine already holds a laid-out DOM and
//! the computed style facts (display mode, white-space mode) the
//! renderer depends on; handing over the materialized tree keeps this
//! crate free of parsing and layout. With the `html` feature an HTML
//! string can be parsed into the same structure via `scraper`.
//!
//! ## Example
//!
//! ```rust
//! use bodytext::{BodyTextService, Node};
//!
//! let mut body = Node::element("div");
//! let mut p = Node::element("p");
//! p.add_child(Node::text("Hello world"));
//! body.add_child(p);
//!
//! let service = BodyTextService::new();
//! let text = service.quoted_text(&body).unwrap();
//! assert_eq!(text, "Hello world\n\n");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use bodytext::{parse_html, BodyTextService};
//!
//! let body = parse_html("<p>Hello <b>world</b></p>");
//! let service = BodyTextService::new();
//! let text = service.quoted_text(&body).unwrap();
//! assert_eq!(text, "Hello *world*\n\n");
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod quote;
mod render;
mod service;

#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{DisplayMode, Node, NodeType, WhitespaceMode};
pub use quote::{resolve_nesting, QuoteExtractor};
pub use render::TextRenderer;
pub use service::BodyTextService;

// String-level layer, re-exported for convenience.
pub use bodytext_core::{classify, flowed, DeceptiveLinkVerdict, QUOTE_MARKER};

/// Error type for body-to-text operations
#[derive(Debug, thiserror::Error)]
pub enum BodyTextError {
    /// The conversion root was not a node that can carry body content.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, BodyTextError>;
