//! The state machine bridging a scrolled document and its section index.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user scrolls.
//! Every row the viewport moves is reported to the [`ScrollSpy`] as one scroll event, so the
//! tracker sees the dense event stream it relies on to never skip a section. The index
//! highlight is fed by a spy subscription rather than read back on every frame.

use crate::config::Config;
use crate::error::{Result, SpyError};
use crate::formats::markdown::MarkdownFormat;
use crate::input;
use crate::layout::DocumentLayout;
use crate::section::Section;
use crate::spy::ScrollSpy;
use crate::tracker::ScrollMetrics;
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(PartialEq, Debug)]
/// Determines navigation scope and quit behavior based on project size.
pub enum FileMode {
    /// Single-file mode quits directly to shell.
    Single,
    /// Multi-file mode returns to file list before quitting.
    Multi,
}

#[derive(Clone, Copy, PartialEq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Displays available files for multi-file projects.
    FileList,
    /// Shows the document beside its section index.
    Document,
}

/// Scroll position, layout and spy for the open document.
pub struct AppState {
    /// File paths available for viewing.
    pub files: Vec<PathBuf>,
    /// Selected file in the file list view.
    pub current_file_index: usize,
    /// Controls navigation behavior and file list visibility.
    pub file_mode: FileMode,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Sections of the open document.
    pub sections: Vec<Section>,
    /// Rendered rows of the open document.
    pub layout: DocumentLayout,
    /// Catalog and tracker over the open document's sections.
    pub spy: ScrollSpy,
    /// First document row shown in the viewport.
    pub scroll_top: usize,
    /// Rows visible in the document pane.
    pub viewport_height: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    config: Config,
    highlighted: Rc<Cell<usize>>,
}

impl AppState {
    /// Initialises application state and opens the first file.
    ///
    /// Single-file projects skip the file list and quit directly to shell, while multi-file
    /// projects show a file selector and return to it on 'q'.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the first file cannot be read,
    /// parsed or catalogued.
    pub fn new(files: Vec<PathBuf>, config: Config, viewport_height: usize) -> Result<Self> {
        let file_mode = if files.len() == 1 {
            FileMode::Single
        } else {
            FileMode::Multi
        };
        let current_view = if file_mode == FileMode::Single {
            View::Document
        } else {
            View::FileList
        };

        let spy = ScrollSpy::build(Vec::new(), config.clone())?;
        let mut app = Self {
            files,
            current_file_index: 0,
            file_mode,
            current_view,
            sections: Vec::new(),
            layout: DocumentLayout::default(),
            spy,
            scroll_top: 0,
            viewport_height,
            message: None,
            config,
            highlighted: Rc::new(Cell::new(0)),
        };
        if !app.files.is_empty() {
            app.open_file(0)?;
            app.current_view = current_view;
        }
        Ok(app)
    }

    fn subscribe_highlight(&mut self) {
        let highlighted = Rc::clone(&self.highlighted);
        self.spy.subscribe(move |index| highlighted.set(index));
    }

    /// Load a file into the document view, rebuilding the catalog for its sections.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in the file list, the file cannot be read or parsed, or
    /// a section has no usable title.
    pub fn open_file(&mut self, index: usize) -> Result<()> {
        let Some(path) = self.files.get(index) else {
            return Err(SpyError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no file at position {index}"),
            )));
        };
        let text = fs::read_to_string(path)?;
        let sections =
            input::parse_sections(&text, &path.to_string_lossy(), &MarkdownFormat)?;

        let spy = ScrollSpy::build(
            sections.iter().map(Section::descriptor).collect(),
            self.config.clone(),
        )?;

        self.layout = DocumentLayout::new(&text, &sections, spy.entries());
        self.sections = sections;
        self.spy = spy;
        self.subscribe_highlight();
        self.highlighted.set(0);
        self.current_file_index = index;
        self.scroll_top = 0;
        self.current_view = View::Document;
        self.message = None;
        Ok(())
    }

    #[must_use]
    /// Index entry currently highlighted, as last reported by the spy.
    pub fn highlighted(&self) -> usize {
        self.highlighted.get()
    }

    #[must_use]
    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self) -> usize {
        self.layout.height().saturating_sub(self.viewport_height)
    }

    /// Adapt to a resized document pane, keeping the scroll offset in range.
    pub fn set_viewport_height(&mut self, height: usize) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.scroll_top = self.scroll_top.min(self.max_scroll());
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top as f64,
            viewport_height: self.viewport_height as f64,
            document_height: self.layout.height().max(self.viewport_height) as f64,
        }
    }

    fn dispatch_scroll(&mut self) {
        let metrics = self.metrics();
        let geometry = self.layout.viewport(self.scroll_top);
        self.spy.handle_scroll(metrics, &geometry);
    }

    /// Scroll by `delta` rows, reporting each row moved as its own scroll event.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self
            .scroll_top
            .saturating_add_signed(delta)
            .min(self.max_scroll());
        while self.scroll_top != target {
            if self.scroll_top < target {
                self.scroll_top += 1;
            } else {
                self.scroll_top -= 1;
            }
            self.dispatch_scroll();
        }
    }

    /// Move a viewport's height down.
    pub fn page_down(&mut self) {
        self.scroll_by(isize::try_from(self.viewport_height).unwrap_or(isize::MAX));
    }

    /// Move a viewport's height up.
    pub fn page_up(&mut self) {
        self.scroll_by(-isize::try_from(self.viewport_height).unwrap_or(isize::MAX));
    }

    /// Jump straight to the top of the document.
    pub fn scroll_to_top(&mut self) {
        self.scroll_top = 0;
        self.dispatch_scroll();
    }

    /// Jump straight to the bottom of the document.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
        self.dispatch_scroll();
    }

    /// Scroll so section `index` starts at the tracking boundary, then make it active.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not a section of the open document.
    pub fn jump_to_section(&mut self, index: usize) -> Result<()> {
        let Some(item) = self.spy.entries().get(index) else {
            return self.spy.set_current_index(index);
        };
        if let Some(row) = self.layout.heading_row(&item.dom_id) {
            self.scroll_top = row.saturating_sub(self.boundary_row()).min(self.max_scroll());
            self.dispatch_scroll();
        }
        self.spy.set_current_index(index)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn boundary_row(&self) -> usize {
        (self.viewport_height as f64 * self.config.viewport_boundary).floor() as usize
    }

    /// Jump to the section after the active one, if any.
    pub fn next_section(&mut self) {
        let next = self.spy.current_index() + 1;
        if next < self.spy.entries().len() {
            if let Err(e) = self.jump_to_section(next) {
                self.message = Some(e.to_string());
            }
        } else {
            self.message = Some("No more sections".to_string());
        }
    }

    /// Jump to the section before the active one, if any.
    pub fn prev_section(&mut self) {
        match self.spy.current_index().checked_sub(1) {
            Some(prev) => {
                if let Err(e) = self.jump_to_section(prev) {
                    self.message = Some(e.to_string());
                }
            }
            None => self.message = Some("No previous sections".to_string()),
        }
    }

    /// Toggle scroll tracking; while off, the highlight stays where it was.
    pub fn toggle_tracking(&mut self) {
        let enabled = self.spy.listener().is_none();
        self.config.enabled = enabled;
        self.spy.set_enabled(enabled);
        self.message = Some(if enabled {
            "Tracking on".to_string()
        } else {
            "Tracking off".to_string()
        });
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
