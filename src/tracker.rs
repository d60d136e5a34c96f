//! The scroll tracker: a single active index driven by scroll events.
//!
//! Each event moves the index by at most one position. Which neighbour is considered depends on
//! the scroll direction, and the crossing threshold differs for entering a section from below
//! versus from above, so the index does not flicker when the viewport rests near a boundary.
//!
//! ```text
//! y == 0          -> AtTop        (index 0)
//! y + H == D      -> AtBottom     (index last)
//! otherwise       -> InRange(i)   (i, i - 1 or i + 1)
//! ```

use crate::catalog::CatalogEntry;
use crate::error::{Result, SpyError};
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Scroll offsets reported by the host with each event.
pub struct ScrollMetrics {
    /// Current vertical scroll offset of the viewport.
    pub scroll_top: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Total scrollable height of the document.
    pub document_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Geometry of one section, as the host reports it.
pub struct SectionBox {
    /// Offset of the section's top edge from the top of the document.
    pub offset_top: f64,
    /// Position of the section's bottom edge relative to the top of the viewport.
    pub bottom: f64,
}

/// Geometry lookup capability provided by the host.
pub trait Geometry {
    /// Box of the element carrying `dom_id`, or `None` when no such element is laid out.
    fn section_box(&self, dom_id: &str) -> Option<SectionBox>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which way the viewport moved since the previous event.
pub enum Direction {
    /// Towards the start of the document.
    Up,
    /// Towards the end of the document (also used when the offset did not change).
    Down,
}

impl Direction {
    #[must_use]
    /// Direction of travel from `previous` to `current`.
    pub fn between(previous: f64, current: f64) -> Self {
        if current < previous {
            Self::Up
        } else {
            Self::Down
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where an event left the tracker.
pub enum Position {
    /// Viewport at the very top; index forced to the first section.
    AtTop,
    /// Viewport at the very bottom; index forced to the last section.
    AtBottom,
    /// Anywhere in between, holding the active index.
    InRange(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Mutable navigation state shared by the scroll handler and the explicit setter.
pub struct NavigationState {
    /// Index of the active catalog entry.
    pub current_index: usize,
    /// Scroll offset seen by the previous event.
    pub previous_scroll_top: f64,
}

impl NavigationState {
    /// Overwrite the active index.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::OutOfRange`] if `index` is not below `len`.
    pub fn set_current_index(&mut self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(SpyError::OutOfRange(
                i64::try_from(index).unwrap_or(i64::MAX),
            ));
        }
        self.current_index = index;
        Ok(())
    }

    /// Keep the index within a catalog of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        self.current_index = self.current_index.min(len.saturating_sub(1));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Boundary-crossing rule with the boundary and header offset it was armed with.
pub struct Tracker {
    boundary: f64,
    offset: f64,
}

impl Tracker {
    #[must_use]
    /// Tracker for an already validated boundary fraction and content offset.
    pub fn new(boundary: f64, offset: f64) -> Self {
        Self { boundary, offset }
    }

    #[must_use]
    /// Boundary fraction this tracker compares against.
    pub fn boundary(&self) -> f64 {
        self.boundary
    }

    #[must_use]
    /// Content offset this tracker compensates for.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[allow(clippy::float_cmp)]
    /// Apply one scroll event to `state`.
    ///
    /// Issues at most one geometry lookup, for the neighbour in the direction of travel. A lookup
    /// that finds nothing leaves the index unchanged. The previous offset is always updated.
    pub fn on_scroll(
        &self,
        state: &mut NavigationState,
        entries: &[CatalogEntry],
        metrics: ScrollMetrics,
        geometry: &dyn Geometry,
    ) -> Position {
        let ScrollMetrics {
            scroll_top: y,
            viewport_height: h,
            document_height: d,
        } = metrics;
        let last = entries.len().saturating_sub(1);

        let position = if y == 0.0 {
            state.current_index = 0;
            Position::AtTop
        } else if y + h == d {
            state.current_index = last;
            Position::AtBottom
        } else {
            let direction = Direction::between(state.previous_scroll_top, y);
            let current = state.current_index;
            if let Some(next) = self.step(current, direction, entries, metrics, geometry) {
                debug!("section {current} -> {next} ({direction:?})");
                state.current_index = next;
            }
            Position::InRange(state.current_index)
        };

        state.previous_scroll_top = y;
        position
    }

    fn step(
        &self,
        current: usize,
        direction: Direction,
        entries: &[CatalogEntry],
        metrics: ScrollMetrics,
        geometry: &dyn Geometry,
    ) -> Option<usize> {
        let last = entries.len().checked_sub(1)?;
        let neighbour = match direction {
            Direction::Down if current < last => current + 1,
            Direction::Up if current > 0 => current - 1,
            _ => return None,
        };
        let entry = &entries[neighbour];
        let Some(section) = geometry.section_box(&entry.dom_id) else {
            debug!("no geometry for `{}`, skipping event", entry.dom_id);
            return None;
        };

        let h = metrics.viewport_height;
        let crossed = match direction {
            Direction::Down => {
                section.offset_top - metrics.scroll_top - self.offset
                    <= h * self.boundary - self.offset
            }
            Direction::Up => section.bottom >= h * (1.0 - self.boundary),
        };
        crossed.then_some(neighbour)
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
