//! CDP-style DOM node structure for body-to-text conversion.
//!
//! The host document engine owns the real DOM; it hands this crate a
//! materialized tree in this structure, together with the computed
//! style facts the renderer depends on (display mode and white-space
//! mode). Any parser or embedder can produce these nodes.

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            1 => NodeType::Element,
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element, // Default fallback
        }
    }
}

/// Computed `display` as far as the renderer cares: block elements
/// force a trailing newline after their content, inline ones don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Block,
    Inline,
}

/// Computed `white-space` mode of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    Normal,
    Nowrap,
    Pre,
    PreLine,
}

impl WhitespaceMode {
    /// Whether runs of whitespace collapse to a single space in this
    /// mode.
    pub fn collapses(self) -> bool {
        !matches!(self, WhitespaceMode::Pre)
    }
}

/// Tags rendered with `display: block` by default. A host style engine
/// can override the computed value per node.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "html",
    "li", "main", "nav", "ol", "output", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// A DOM node following the CDP DOM.Node structure, plus the computed
/// style the conversion core consumes.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    /// Only present for element nodes
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,

    /// Host-computed display mode; `None` falls back to the per-tag
    /// default.
    pub display: Option<DisplayMode>,

    /// Host-computed white-space mode; `None` inherits from the parent.
    pub whitespace: Option<WhitespaceMode>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
            display: None,
            whitespace: None,
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let flat_attrs: Vec<String> = attrs
            .into_iter()
            .flat_map(|(k, v)| vec![k.to_string(), v.to_string()])
            .collect();

        Self {
            attributes: Some(flat_attrs),
            ..Self::element(tag_name)
        }
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            display: None,
            whitespace: None,
        }
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            display: None,
            whitespace: None,
        }
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
            display: None,
            whitespace: None,
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;
        let name_lower = name.to_lowercase();

        // CDP stores attributes as flat array: [name, value, name, value, ...]
        let mut iter = attrs.iter();
        while let Some(attr_name) = iter.next() {
            if let Some(attr_value) = iter.next() {
                if attr_name.to_lowercase() == name_lower {
                    return Some(attr_value.as_str());
                }
            }
        }
        None
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Check for a whitespace-separated token in the `class` attribute
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|value| value.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get all child nodes mutably
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.children.iter_mut().flat_map(|c| c.iter_mut())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        if let Some(ref mut children) = self.children {
            children.push(child);
        } else {
            self.children = Some(vec![child]);
        }
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if self.attributes.is_none() {
            self.attributes = Some(Vec::new());
        }

        if let Some(ref mut attrs) = self.attributes {
            let name_lower = name.to_lowercase();
            let mut i = 0;
            while i + 1 < attrs.len() {
                if attrs[i].to_lowercase() == name_lower {
                    attrs[i + 1] = value.to_string();
                    return;
                }
                i += 2;
            }
            attrs.push(name.to_string());
            attrs.push(value.to_string());
        }
    }

    /// Override the host-computed display mode
    pub fn set_display(&mut self, display: DisplayMode) {
        self.display = Some(display);
    }

    /// Override the host-computed white-space mode
    pub fn set_whitespace(&mut self, whitespace: WhitespaceMode) {
        self.whitespace = Some(whitespace);
    }

    /// Effective display mode: the host-supplied value, or the HTML
    /// default for the tag.
    pub fn computed_display(&self) -> DisplayMode {
        if let Some(display) = self.display {
            return display;
        }
        if self.is_element() && BLOCK_ELEMENTS.contains(&self.tag_name().as_str()) {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        }
    }

    /// Effective white-space mode given the parent's, honoring CSS
    /// inheritance when the host supplied nothing.
    pub fn computed_whitespace(&self, inherited: WhitespaceMode) -> WhitespaceMode {
        if let Some(whitespace) = self.whitespace {
            return whitespace;
        }
        match self.tag_name().as_str() {
            "pre" => WhitespaceMode::Pre,
            _ => inherited,
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self
                .children()
                .map(|child| child.text_content())
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}
