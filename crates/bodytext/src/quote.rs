//! Quote extraction and reinsertion.
//!
//! Nested quotes cannot be converted in a single pass: the text of an
//! inner quote has to be captured before the text of its ancestor can
//! be computed. Quotes are therefore pulled out of a cloned tree
//! innermost-first and replaced by positional token placeholders;
//! after the quote-free tree is rendered, [`resolve_nesting`] expands
//! the tokens back into quote-marker-prefixed text, one marker per
//! nesting level.

use once_cell::sync::Lazy;
use regex::Regex;

use bodytext_core::QUOTE_MARKER;

use crate::node::Node;
use crate::render::TextRenderer;

/// Token sentinels from a Unicode private use block. The renderer
/// scrubs both characters from source text, so an in-text token can
/// only have been produced by [`QuoteExtractor::extract`].
pub(crate) const QUOTE_START: char = '\u{e000}';
pub(crate) const QUOTE_END: char = '\u{e001}';

/// Attribute carried by the placeholder element a quote is swapped
/// for. The renderer emits the token text for any element bearing it.
pub(crate) const QUOTE_TOKEN_ATTR: &str = "data-quote-token";

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{}([0-9]+){}", QUOTE_START, QUOTE_END)).expect("token pattern")
});

/// Pulls quote blocks out of a markup tree, to be reinserted after
/// rendering via [`resolve_nesting`].
pub struct QuoteExtractor<'a> {
    renderer: &'a TextRenderer,
}

impl<'a> QuoteExtractor<'a> {
    pub fn new(renderer: &'a TextRenderer) -> Self {
        Self { renderer }
    }

    /// Capture every quote block under `root` and return a tokenized
    /// clone of the tree together with the captured quote texts.
    ///
    /// Quotes are collected in document order but captured in reverse,
    /// so a nested quote is tokenized before the text of its ancestor
    /// is read. `root` itself is never touched, which keeps repeated
    /// conversions over the same tree safe.
    pub fn extract(&self, root: &Node) -> (Node, Vec<String>) {
        let mut work = root.clone();
        // The placeholder attribute is reserved for the extractor;
        // content is not allowed to carry it.
        scrub_token_attrs(&mut work);
        let mut paths = Vec::new();
        collect_quote_paths(&work, &mut Vec::new(), &mut paths);

        let mut quotes = vec![String::new(); paths.len()];
        for index in (0..paths.len()).rev() {
            let Some(quote) = node_at(&work, &paths[index]) else {
                log::error!("quote {} disappeared during extraction", index);
                continue;
            };

            let mut text = self.renderer.render_inner(quote);
            // A final paragraph leaves one blank-line artifact behind;
            // drop it plus the trailing newline, like innerText would,
            // but keep any further breaks the author wrote.
            if text.ends_with("\n\n") {
                text.pop();
            }
            if text.ends_with('\n') {
                text.pop();
            } else {
                log::debug!("no newline at end of quote {}", index);
            }
            quotes[index] = text;

            if let Some(quote) = node_at_mut(&mut work, &paths[index]) {
                *quote = token_placeholder(index);
            }
        }

        (work, quotes)
    }
}

/// Expand quote tokens in `text` into marker-prefixed quote text.
///
/// Tokens inside a captured quote are resolved first, so by the time a
/// quote is prefixed its nested quotes already carry their markers;
/// depth N content ends up with exactly N markers per line. Newlines
/// are inserted around each expansion so adjacent quotes, and quotes
/// with surrounding text, never share a line.
pub fn resolve_nesting(text: &str, quotes: &[String]) -> String {
    let mut resolved = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in TOKEN.captures_iter(text) {
        let token = caps.get(0).expect("whole match");
        resolved.push_str(&text[last_end..token.start()]);
        last_end = token.end();

        let index = caps[1].parse::<usize>().ok().filter(|i| *i < quotes.len());
        match index {
            Some(index) => {
                if !resolved.is_empty() && !resolved.ends_with('\n') {
                    resolved.push('\n');
                }
                let nested = resolve_nesting(&quotes[index], quotes);
                resolved.push_str(&quote_lines(&nested));
                match text[token.end()..].chars().next() {
                    Some('\n') | None => {}
                    Some(_) => resolved.push('\n'),
                }
            }
            None => {
                // Extraction bug; drop the token rather than fail the
                // whole conversion.
                log::error!("invalid quote token index {:?}", &caps[1]);
            }
        }
    }

    resolved.push_str(&text[last_end..]);
    resolved
}

/// Prefix each LF-delineated line with one quote marker.
fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("{}{}", QUOTE_MARKER, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn token_placeholder(index: usize) -> Node {
    let mut placeholder = Node::element("div");
    placeholder.set_attr(QUOTE_TOKEN_ATTR, &index.to_string());
    placeholder
}

/// Record the path (child indices from `node`) of every quote element,
/// in document order.
fn collect_quote_paths(node: &Node, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (index, child) in node.children().enumerate() {
        path.push(index);
        if child.is_element() && child.tag_name() == "blockquote" {
            out.push(path.clone());
        }
        collect_quote_paths(child, path, out);
        path.pop();
    }
}

fn node_at<'a>(root: &'a Node, path: &[usize]) -> Option<&'a Node> {
    let mut node = root;
    for &index in path {
        node = node.children().nth(index)?;
    }
    Some(node)
}

fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    let mut node = root;
    for &index in path {
        node = node.children_mut().nth(index)?;
    }
    Some(node)
}

/// Drop any pre-existing placeholder attributes so content cannot
/// spoof a quote token.
fn scrub_token_attrs(node: &mut Node) {
    if let Some(attrs) = node.attributes.as_mut() {
        let mut i = 0;
        while i + 1 < attrs.len() {
            if attrs[i].eq_ignore_ascii_case(QUOTE_TOKEN_ATTR) {
                attrs.drain(i..i + 2);
            } else {
                i += 2;
            }
        }
    }
    for child in node.children_mut() {
        scrub_token_attrs(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> Node {
        let mut p = Node::element("p");
        p.add_child(Node::text(text));
        p
    }

    fn blockquote(children: Vec<Node>) -> Node {
        let mut bq = Node::element("blockquote");
        for child in children {
            bq.add_child(child);
        }
        bq
    }

    fn token(index: usize) -> String {
        format!("{}{}{}", QUOTE_START, index, QUOTE_END)
    }

    #[test]
    fn test_extract_single_quote() {
        let renderer = TextRenderer::new();
        let mut body = Node::element("div");
        body.add_child(paragraph("top"));
        body.add_child(blockquote(vec![paragraph("quoted")]));

        let (tokenized, quotes) = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(quotes, vec!["quoted".to_string()]);
        assert_eq!(renderer.render(&tokenized), format!("top\n\n{}\n", token(0)));
    }

    #[test]
    fn test_extract_is_non_destructive() {
        let renderer = TextRenderer::new();
        let mut body = Node::element("div");
        body.add_child(blockquote(vec![paragraph("quoted")]));
        let before = renderer.render(&body);

        let _ = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(renderer.render(&body), before);
    }

    #[test]
    fn test_extract_nested_quotes_innermost_first() {
        let renderer = TextRenderer::new();
        let mut outer = blockquote(vec![paragraph("outer")]);
        outer.add_child(blockquote(vec![paragraph("inner")]));
        let mut body = Node::element("div");
        body.add_child(outer);

        let (_, quotes) = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(quotes.len(), 2);
        // The ancestor's captured text holds the inner quote's token.
        assert_eq!(quotes[0], format!("outer\n\n{}", token(1)));
        assert_eq!(quotes[1], "inner");
    }

    #[test]
    fn test_resolve_single_level() {
        let quotes = vec!["quoted".to_string()];
        let text = format!("top\n\n{}\n", token(0));
        assert_eq!(
            resolve_nesting(&text, &quotes),
            format!("top\n\n{}quoted\n", QUOTE_MARKER)
        );
    }

    #[test]
    fn test_resolve_nested_depth_markers() {
        let quotes = vec![format!("outer\n\n{}", token(1)), "inner".to_string()];
        let text = format!("{}\n", token(0));
        let resolved = resolve_nesting(&text, &quotes);
        let m = QUOTE_MARKER;
        assert_eq!(resolved, format!("{m}outer\n{m}\n{m}{m}inner\n"));
    }

    #[test]
    fn test_resolve_inserts_boundary_newlines() {
        let quotes = vec!["one".to_string(), "two".to_string()];
        // Tokens glued to text and to each other.
        let text = format!("before{}{}after", token(0), token(1));
        let resolved = resolve_nesting(&text, &quotes);
        let m = QUOTE_MARKER;
        assert_eq!(resolved, format!("before\n{m}one\n{m}two\nafter"));
    }

    #[test]
    fn test_resolve_invalid_index_substitutes_empty() {
        let _ = env_logger::builder().is_test(true).try_init();
        let quotes = vec!["real".to_string()];
        let text = format!("a{}b", token(7));
        assert_eq!(resolve_nesting(&text, &quotes), "ab");
    }

    #[test]
    fn test_spoofed_token_attr_is_scrubbed() {
        let renderer = TextRenderer::new();
        let mut fake = Node::element("div");
        fake.set_attr(QUOTE_TOKEN_ATTR, "0");
        fake.add_child(Node::text("spoof"));
        let mut body = Node::element("div");
        body.add_child(fake);
        body.add_child(blockquote(vec![paragraph("real")]));

        let (tokenized, quotes) = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(quotes, vec!["real".to_string()]);
        assert_eq!(
            renderer.render(&tokenized),
            format!("spoof\n{}\n", token(0))
        );
    }

    #[test]
    fn test_resolve_without_tokens_is_identity() {
        let quotes: Vec<String> = Vec::new();
        assert_eq!(resolve_nesting("plain text\n", &quotes), "plain text\n");
    }

    #[test]
    fn test_extract_preserves_explicit_trailing_breaks() {
        let renderer = TextRenderer::new();
        let mut bq = blockquote(vec![paragraph("last line")]);
        bq.add_child(Node::element("br"));
        bq.add_child(Node::element("br"));
        let mut body = Node::element("div");
        body.add_child(bq);

        let (_, quotes) = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(quotes, vec!["last line\n\n".to_string()]);
    }

    #[test]
    fn test_quote_text_without_trailing_newline_tolerated() {
        let renderer = TextRenderer::new();
        let mut bq = Node::element("blockquote");
        bq.add_child(Node::text("bare inline text"));
        let mut body = Node::element("div");
        body.add_child(bq);

        let (_, quotes) = QuoteExtractor::new(&renderer).extract(&body);
        assert_eq!(quotes, vec!["bare inline text".to_string()]);
    }
}
