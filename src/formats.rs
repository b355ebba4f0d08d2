//! Format trait and implementations for different component file types.
//!
//! This module defines the `Format` trait which abstracts over component formats
//! by providing the tree-sitter grammar and the query that finds their style sections.

pub mod vue;

/// Tree-sitter grammar and queries for one kind of component file.
pub trait Format {
    /// Grammar used to parse the whole component file.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing top-level style elements as `@style`.
    fn style_query(&self) -> &str;
}
