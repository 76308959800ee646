//! Deceptive link detection.
//!
//! Compares a hyperlink's visible text against its target to catch
//! phishing-style mismatches, where the text claims one destination
//! and the href resolves somewhere else.

use once_cell::sync::Lazy;
use regex::Regex;

/// URL-shaped strings: optional scheme, a domain containing at least
/// one dot, optional path. Capture 1 is the domain.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:[a-z]*://)?",         // scheme (optional)
        r"([^\s:/#]*\.[^\s:/#]+)", // domain
        r"(?:/\S*)?",              // path, query, fragment
    ))
    .expect("URL shape pattern")
});

/// Outcome of comparing a link's visible text with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeceptiveLinkVerdict {
    /// The text and target agree, or the text makes no URL claim.
    NotDeceptive,
    /// The text is URL-shaped but the target is not a URL at all.
    DeceptiveHref,
    /// Both are URL-shaped but they resolve to different domains.
    DeceptiveDomain,
}

/// Classify a link's visible text against its target.
///
/// Plain link text ("click here") is never deceptive. When both sides
/// are URL-shaped the domains are compared label by label from the TLD
/// inward, over as many labels as the shorter domain has, so
/// `example.com` in the text legitimately matches an
/// `www.example.com` target.
///
/// `mailto:` targets are exempt from classification; the caller is
/// expected to filter them out before calling.
pub fn classify(visible_text: &str, href: &str) -> DeceptiveLinkVerdict {
    // Does the text look like a URL at all? Right now that means
    // containing <string>.<string>; more sophisticated tests are
    // possible.
    let text_domain = match URL_SHAPE.captures(visible_text) {
        Some(caps) => caps[1].to_lowercase(),
        None => return DeceptiveLinkVerdict::NotDeceptive,
    };

    // The text claims to be a URL. If the target isn't one, something
    // is fishy.
    let href_domain = match URL_SHAPE.captures(href) {
        Some(caps) => caps[1].to_lowercase(),
        None => return DeceptiveLinkVerdict::DeceptiveHref,
    };

    let text_labels: Vec<&str> = text_domain.split('.').rev().collect();
    let href_labels: Vec<&str> = href_domain.split('.').rev().collect();
    let comparable = text_labels.len().min(href_labels.len());
    if comparable == 0 {
        return DeceptiveLinkVerdict::DeceptiveDomain;
    }
    for (text_label, href_label) in text_labels.iter().zip(href_labels.iter()) {
        if text_label != href_label {
            return DeceptiveLinkVerdict::DeceptiveDomain;
        }
    }

    DeceptiveLinkVerdict::NotDeceptive
}
