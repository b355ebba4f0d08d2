//! Vue single file component format using tree-sitter-html.
//!
//! The HTML grammar already treats `<style>` content as raw text, which is all we
//! need: only direct children of the document are style sections.

use crate::formats::Format;

/// Tree-sitter queries for top-level `<style>` blocks of `.vue` files.
pub struct VueFormat;

impl Format for VueFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_html::LANGUAGE.into()
    }

    fn style_query(&self) -> &'static str {
        "(document (style_element) @style)"
    }
}
