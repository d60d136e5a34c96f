//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides tree-sitter queries for parsing markdown documents
//! and extracting section structure from ATX-style headings (# syntax).

use crate::formats::Format;

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn heading_level(&self, heading: &tree_sitter::Node) -> usize {
        let mut cursor = heading.walk();
        for child in heading.children(&mut cursor) {
            let marker = child
                .kind()
                .strip_prefix("atx_h")
                .and_then(|rest| rest.strip_suffix("_marker"));
            if let Some(level) = marker.and_then(|digit| digit.parse().ok()) {
                return level;
            }
        }
        1
    }

    fn heading_text<'t>(&self, heading: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
        let mut cursor = heading.walk();
        for child in heading.children(&mut cursor) {
            if child.kind() == "inline" {
                return Some(child);
            }
        }
        None
    }
}
