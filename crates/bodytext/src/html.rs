//! HTML parsing support.
//!
//! This module parses HTML strings into the CDP-style [`Node`]
//! structure used by the conversion core. It exists for callers and
//! tests that do not already hold a materialized tree from a host
//! document engine.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML string into a Node tree.
///
/// # Example
///
/// ```rust
/// use bodytext::{parse_html, BodyTextService};
///
/// let body = parse_html("<p>Hello World</p>");
/// let service = BodyTextService::new();
/// let text = service.quoted_text(&body).unwrap();
/// assert_eq!(text, "Hello World\n\n");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();

    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            ScraperNode::Comment(comment) => {
                node.add_child(Node::comment(&comment.comment));
            }
            _ => {}
        }
    }

    node
}
