//! bodytext-core - quote-marked text and flowed wrapping
//!
//! This crate provides the string-level half of the body-to-text
//! pipeline: the internal quote marker, RFC 3676 `format=flowed`
//! generation, and the deceptive link check. Nothing in here knows
//! about markup; DOM handling lives in the `bodytext` crate.
//!
//! # Architecture
//!
//! ```text
//! Node tree ──render──▶ quote-marked text ──wrap──▶ flowed text
//!  (bodytext)              (this crate)          (this crate)
//! ```
//!
//! # Example
//!
//! ```rust
//! use bodytext_core::{flowed, QUOTE_MARKER};
//!
//! let marked = format!("Hi there\n{}quoted reply", QUOTE_MARKER);
//! let wrapped = flowed::wrap(&marked);
//! assert_eq!(wrapped, "Hi there\n> quoted reply\n");
//! ```

pub mod flowed;
pub mod links;

pub use links::{classify, DeceptiveLinkVerdict};

/// Internal marker denoting one level of quote nesting.
///
/// Each line of quoted text is prefixed with one marker per nesting
/// level, so depth is reconstructible by counting consecutive leading
/// markers. [`flowed::wrap`] translates markers into `>` prefixes.
pub const QUOTE_MARKER: char = '\x7f';
