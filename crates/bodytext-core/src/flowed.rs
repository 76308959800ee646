//! RFC 3676 "format=flowed" generation.
//!
//! Takes quote-marked plain text (see [`crate::QUOTE_MARKER`]) and
//! produces text suitable for transport as a `format=flowed; delsp=no`
//! message body: quote markers become `>` prefixes, long lines are
//! soft-wrapped at 72 columns with the trailing space left in place as
//! the flow signal, and lines that could be misread as quote or mbox
//! markers are space-stuffed.
//!
//! Lines are LF-terminated; converting to CRLF for the wire is the
//! transport layer's concern.

use crate::QUOTE_MARKER;

/// Soft-wrap target recommended by RFC 3676.
const MAX_LINE_LEN: usize = 72;

/// Hard ceiling on any physical line, from RFC 5322.
const MAX_HARD_LINE_LEN: usize = 998;

/// The signature separator, which must keep its trailing space.
const SIGNATURE_SEPARATOR: &str = "-- ";

/// Reflow quote-marked text into format=flowed lines.
///
/// Every input line is processed independently: leading quote markers
/// determine the `>` prefix, the remainder is right-trimmed (except the
/// signature separator `"-- "`, which survives untouched at any quote
/// depth) and consumed in chunks of at most `72 - prefix` octets. A
/// chunk that would start with `>` or `From` outside a quote gets one
/// space stuffed in front. Chunks with no space to break at are cut at
/// the 998-octet ceiling rather than rejected.
pub fn wrap(marked: &str) -> String {
    let mut flowed = String::with_capacity(marked.len());

    for line in marked.split('\n') {
        // QUOTE_MARKER is ASCII, so the char count is a byte offset.
        let quote_level = line.chars().take_while(|c| *c == QUOTE_MARKER).count();
        let line = &line[quote_level..];
        let line = if line == SIGNATURE_SEPARATOR {
            line
        } else {
            line.trim_end()
        };

        let prefix = if quote_level > 0 {
            let mut prefix = ">".repeat(quote_level);
            prefix.push(' ');
            prefix
        } else {
            String::new()
        };
        let max_len = MAX_LINE_LEN.saturating_sub(prefix.len()).max(1);

        let mut rest = line.to_string();
        loop {
            let mut chunk = rest;
            let mut search_from = 0;
            if quote_level == 0 && (chunk.starts_with('>') || chunk.starts_with("From")) {
                // Space-stuffing; the stuffed octet is not a break
                // candidate.
                chunk.insert(0, ' ');
                search_from = 1;
            }

            let cut = if chunk.len() <= max_len {
                chunk.len()
            } else {
                // No break candidate may land past the hard ceiling.
                let hard = MAX_HARD_LINE_LEN.saturating_sub(prefix.len()).max(1);
                let hard = floor_char_boundary(&chunk, hard.min(chunk.len()));
                let window = floor_char_boundary(&chunk, max_len);
                if let Some(pos) = chunk[search_from..window].rfind(' ') {
                    // Cut after the space so it survives as the flow
                    // signal on the emitted line.
                    search_from + pos + 1
                } else if let Some(pos) = chunk[search_from..hard].find(' ') {
                    search_from + pos + 1
                } else {
                    log::debug!(
                        "unbreakable chunk of {} octets, hard-cutting",
                        chunk.len()
                    );
                    hard
                }
            };

            flowed.push_str(&prefix);
            flowed.push_str(&chunk[..cut]);
            flowed.push('\n');

            rest = chunk[cut..].to_string();
            if rest.is_empty() {
                break;
            }
        }
    }

    flowed
}

/// Largest char boundary in `s` that is not greater than `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut boundary = index;
    while !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lines_pass_through() {
        assert_eq!(wrap("Foo bar baz"), "Foo bar baz\n");
        assert_eq!(wrap("one\ntwo"), "one\ntwo\n");
    }

    #[test]
    fn test_right_trim() {
        assert_eq!(wrap("trailing   \nnext\t"), "trailing\nnext\n");
    }

    #[test]
    fn test_signature_separator_preserved() {
        assert_eq!(wrap("-- "), "-- \n");
        assert_eq!(wrap("body\n-- \nsig"), "body\n-- \nsig\n");
    }

    #[test]
    fn test_signature_separator_preserved_in_quote() {
        let marked = format!("{m}{m}-- ", m = QUOTE_MARKER);
        assert_eq!(wrap(&marked), ">> -- \n");
    }

    #[test]
    fn test_quote_prefixing() {
        let marked = format!("top\n{m}one\n{m}{m}two", m = QUOTE_MARKER);
        assert_eq!(wrap(&marked), "top\n> one\n>> two\n");
    }

    #[test]
    fn test_space_stuffing_quote_lookalike() {
        assert_eq!(wrap(">not a quote"), " >not a quote\n");
    }

    #[test]
    fn test_space_stuffing_mbox_lookalike() {
        assert_eq!(wrap("From the start"), " From the start\n");
    }

    #[test]
    fn test_no_stuffing_inside_quote() {
        let marked = format!("{}>inner", QUOTE_MARKER);
        assert_eq!(wrap(&marked), "> >inner\n");
    }

    #[test]
    fn test_soft_wrap_keeps_flow_space() {
        let line = "word ".repeat(20).trim_end().to_string();
        let wrapped = wrap(&line);
        let lines: Vec<&str> = wrapped.trim_end_matches('\n').split('\n').collect();
        assert!(lines.len() > 1);
        for line in &lines[..lines.len() - 1] {
            assert!(line.ends_with(' '), "soft break lost on {:?}", line);
            assert!(line.len() <= MAX_LINE_LEN);
        }
        assert!(!lines.last().unwrap().ends_with(' '));
    }

    #[test]
    fn test_wrapped_quote_lines_respect_prefix_budget() {
        let marked = format!("{}{}", QUOTE_MARKER, "word ".repeat(30).trim_end());
        for line in wrap(&marked).trim_end_matches('\n').split('\n') {
            assert!(line.starts_with("> "));
            assert!(line.len() <= MAX_LINE_LEN);
        }
    }

    #[test]
    fn test_unbreakable_token_forward_search() {
        // No space before column 72; break at the first one after it.
        let line = format!("{} tail", "x".repeat(80));
        assert_eq!(wrap(&line), format!("{} \ntail\n", "x".repeat(80)));
    }

    #[test]
    fn test_unbreakable_token_hard_cut() {
        let line = "y".repeat(1200);
        let wrapped = wrap(&line);
        let lines: Vec<&str> = wrapped.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines[0].len(), MAX_HARD_LINE_LEN);
        assert_eq!(lines[1].len(), 202);
    }

    #[test]
    fn test_forward_search_capped_at_hard_ceiling() {
        // The first space sits beyond the ceiling; the chunk is cut
        // there instead of at the space.
        let line = format!("{} tail", "x".repeat(1100));
        let wrapped = wrap(&line);
        let lines: Vec<&str> = wrapped.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines[0].len(), MAX_HARD_LINE_LEN);
        for line in &lines {
            assert!(line.len() <= MAX_HARD_LINE_LEN);
        }
        assert_eq!(lines.last(), Some(&"tail"));
    }

    #[test]
    fn test_line_length_invariant() {
        let mut marked = String::new();
        marked.push_str(&"z".repeat(3000));
        marked.push('\n');
        marked.push_str(&format!("{}{}", QUOTE_MARKER, "word ".repeat(100)));
        marked.push('\n');
        marked.push_str(">stuffed and very long ");
        marked.push_str(&"q".repeat(2000));
        marked.push('\n');
        marked.push_str(&"y".repeat(1050));
        marked.push_str(" late space");
        for line in wrap(&marked).split('\n') {
            assert!(line.len() <= MAX_HARD_LINE_LEN, "line too long: {}", line.len());
        }
    }

    #[test]
    fn test_hard_cut_respects_char_boundaries() {
        let line = "é".repeat(600);
        let wrapped = wrap(&line);
        // Would panic on a byte split; also recheck the budget.
        for line in wrapped.split('\n') {
            assert!(line.len() <= MAX_HARD_LINE_LEN);
        }
    }

    #[test]
    fn test_idempotent_on_conforming_text() {
        let text = "A fixed line\n >already stuffed\n-- \nsig text";
        let once = wrap(text);
        assert_eq!(wrap(once.trim_end_matches('\n')), once);
    }

    #[test]
    fn test_empty_quoted_line() {
        let marked = format!("{m}one\n{m}\n{m}two", m = QUOTE_MARKER);
        assert_eq!(wrap(&marked), "> one\n> \n> two\n");
    }
}
