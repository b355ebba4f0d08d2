//! Style section representation for tree-sitter parsed component files.
//!
//! A section is one top-level `<style>` element. It carries the raw text between
//! the tags together with the exact byte offsets of that text in the original
//! file, so the text can later be substituted in place without re-parsing.

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Top-level style element content with precise coordinates for splicing.
pub struct StyleSection {
    /// Raw text content of the element, excluding the surrounding tags.
    pub content: String,
    /// Start tag attributes; a bare attribute maps to `None`.
    pub attributes: HashMap<String, Option<String>>,
    /// Byte offset where the text content begins.
    pub byte_start: usize,
    /// Byte offset where the text content ends (exclusive).
    pub byte_end: usize,
    /// Ordinal of this section among the file's style sections.
    pub index: usize,
}

impl StyleSection {
    #[must_use]
    /// Declared `lang` attribute, if any value was given.
    pub fn lang(&self) -> Option<&str> {
        self.attributes.get("lang").and_then(Option::as_deref)
    }
}
