//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing the
//! tree-sitter grammar and heading query specific to each format.

pub mod markdown;

/// Tree-sitter grammar and section query for one document format.
pub trait Format {
    /// Grammar used to parse documents of this format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing each section heading as `@heading`.
    fn section_query(&self) -> &str;
    /// Heading depth for a captured heading node.
    fn heading_level(&self, heading: &tree_sitter::Node) -> usize;
    /// Node holding the heading text, if the heading has any.
    fn heading_text<'t>(&self, heading: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>>;
}
