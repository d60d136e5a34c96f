//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a sectionspy.toml, and if present we load settings from there.
//! This provides the tracking boundary, header offset, title accessors and file extensions.

use crate::error::{Result, SpyError};
use facet::Facet;
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "sectionspy.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// Tracking preferences loaded from sectionspy.toml or falling back to defaults.
pub struct Config {
    #[facet(default = true)]
    /// Whether a scroll listener is armed at all.
    pub enabled: bool,
    #[facet(default = 0.3)]
    /// Fraction of the viewport height at which the next or previous section activates.
    pub viewport_boundary: f64,
    #[facet(default = 0.0)]
    /// Rows (or pixels) of persistent chrome above the content, such as a fixed header.
    pub content_top_offset: f64,
    #[facet(default = "title".to_string())]
    /// Property holding the section title on the title source.
    pub title_accessor: String,
    #[facet(default)]
    /// Property to descend into before reading the title, if any.
    pub dive_accessor: Option<String>,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            viewport_boundary: 0.3,
            content_top_offset: 0.0,
            title_accessor: "title".to_string(),
            dive_accessor: None,
            file_extensions: vec!["md".to_string()],
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from sectionspy.toml if present.
    ///
    /// A file that fails to parse is reported and ignored rather than aborting startup.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {CONFIG_FILE}: {e}");
                Self::default()
            }
        }
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text, filling unspecified keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::Config`] if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|e| SpyError::Config(e.to_string()))
    }

    /// Reject a boundary outside the unit interval.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::InvalidBoundary`] when `viewport_boundary` is not within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.viewport_boundary) {
            Ok(())
        } else {
            Err(SpyError::InvalidBoundary(self.viewport_boundary))
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
