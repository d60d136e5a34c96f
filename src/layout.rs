//! Line-based layout of a rendered document.
//!
//! One document line occupies one terminal row, so section geometry falls straight out of the
//! heading coordinates: a section's top is its heading line and its bottom is the line where the
//! next section starts.

use crate::catalog::CatalogEntry;
use crate::section::Section;
use crate::tracker::{Geometry, SectionBox};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default)]
/// Rendered lines plus the row span of every section, keyed by identifier.
pub struct DocumentLayout {
    /// Document text, one entry per row.
    pub lines: Vec<String>,
    spans: HashMap<String, (usize, usize)>,
    heading_rows: HashSet<usize>,
}

impl DocumentLayout {
    #[must_use]
    /// Lay out `text`, placing each catalog entry at the matching section's rows.
    ///
    /// Sections and entries are paired by position. When two entries share an identifier the
    /// first one wins, as a document lookup by id would.
    pub fn new(text: &str, sections: &[Section], entries: &[CatalogEntry]) -> Self {
        let mut spans = HashMap::new();
        for (section, entry) in sections.iter().zip(entries) {
            spans
                .entry(entry.dom_id.clone())
                .or_insert((section.line_heading, section.line_end));
        }
        Self {
            lines: text.lines().map(str::to_string).collect(),
            spans,
            heading_rows: sections.iter().map(|s| s.line_heading).collect(),
        }
    }

    #[must_use]
    /// Total rows in the document.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    /// Whether `row` holds a parsed heading.
    pub fn is_heading_row(&self, row: usize) -> bool {
        self.heading_rows.contains(&row)
    }

    #[must_use]
    /// Row holding the heading of the section with `dom_id`.
    pub fn heading_row(&self, dom_id: &str) -> Option<usize> {
        self.spans.get(dom_id).map(|(start, _)| *start)
    }

    #[must_use]
    /// Geometry as seen from a viewport scrolled down by `scroll_top` rows.
    pub fn viewport(&self, scroll_top: usize) -> Viewport<'_> {
        Viewport {
            layout: self,
            scroll_top,
        }
    }
}

#[derive(Clone, Copy, Debug)]
/// A [`DocumentLayout`] seen through a viewport at a given scroll offset.
pub struct Viewport<'a> {
    layout: &'a DocumentLayout,
    scroll_top: usize,
}

#[allow(clippy::cast_precision_loss)]
fn rows(n: usize) -> f64 {
    n as f64
}

impl Geometry for Viewport<'_> {
    fn section_box(&self, dom_id: &str) -> Option<SectionBox> {
        let (start, end) = self.layout.spans.get(dom_id)?;
        Some(SectionBox {
            offset_top: rows(*start),
            bottom: rows(*end) - rows(self.scroll_top),
        })
    }
}

#[cfg(test)]
#[path = "tests/layout.rs"]
mod tests;
