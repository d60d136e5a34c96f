//! Catalogue section descriptors into navigation entries with stable identifiers.
//!
//! The build is a pure function of the descriptors and the accessor configuration. Every
//! descriptor is validated before a single entry is produced, so a caller either gets the whole
//! catalog or an error naming the first descriptor without a title.

use crate::error::{Result, SpyError};
use crate::section::SectionDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix appended to slugs when deriving an identifier.
pub const ID_SUFFIX: &str = "-section";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Resolved `{label, dom_id}` pair for one navigable destination.
pub struct CatalogEntry {
    /// Title text as found on the descriptor.
    pub label: String,
    /// Identifier the renderer attaches to the section and geometry is looked up by.
    pub dom_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Index entry exposed to renderers; `scroll_to` names where clicking should navigate.
pub struct NavItem {
    /// Text to show in the index.
    pub label: String,
    /// Identifier of the section to scroll to.
    pub scroll_to: String,
}

impl From<&CatalogEntry> for NavItem {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            label: entry.label.clone(),
            scroll_to: entry.dom_id.clone(),
        }
    }
}

/// Resolves the object that holds a descriptor's title.
pub trait TitleSource {
    /// Property map to read the title accessor from, or `None` when the descriptor has none.
    fn resolve<'a>(&self, descriptor: &'a SectionDescriptor) -> Option<&'a Map<String, Value>>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Reads the title from the descriptor itself, or from one nested object when `dive` is set.
pub struct Dive(pub Option<String>);

impl TitleSource for Dive {
    fn resolve<'a>(&self, descriptor: &'a SectionDescriptor) -> Option<&'a Map<String, Value>> {
        match &self.0 {
            Some(key) => descriptor.props.get(key).and_then(Value::as_object),
            None => Some(&descriptor.props),
        }
    }
}

/// Title source paired with the name of the title property.
pub struct Accessor {
    title: String,
    source: Box<dyn TitleSource>,
}

impl Accessor {
    #[must_use]
    /// Accessor using the one-level [`Dive`] source.
    pub fn new(title: &str, dive: Option<&str>) -> Self {
        Self::with_source(title, Dive(dive.map(str::to_string)))
    }

    #[must_use]
    /// Accessor with a custom title source.
    pub fn with_source(title: &str, source: impl TitleSource + 'static) -> Self {
        Self {
            title: title.to_string(),
            source: Box::new(source),
        }
    }

    #[must_use]
    /// Name of the title property.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn label<'a>(&self, descriptor: &'a SectionDescriptor) -> Option<&'a str> {
        self.source
            .resolve(descriptor)?
            .get(&self.title)
            .and_then(Value::as_str)
    }
}

impl Default for Accessor {
    fn default() -> Self {
        Self::new("title", None)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Result of a catalog build.
pub struct Catalog {
    /// One entry per descriptor, in input order.
    pub entries: Vec<CatalogEntry>,
    /// The input descriptors with missing identifiers filled in.
    pub annotated: Vec<SectionDescriptor>,
}

impl Catalog {
    /// Catalogue `descriptors`, resolving titles through `accessor`.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::MissingTitle`] for the first descriptor whose title source is absent or
    /// whose title is not a string. No entries are produced in that case.
    pub fn build(descriptors: &[SectionDescriptor], accessor: &Accessor) -> Result<Self> {
        let labels = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                accessor.label(descriptor).ok_or_else(|| SpyError::MissingTitle {
                    index,
                    accessor: accessor.title().to_string(),
                })
            })
            .collect::<Result<Vec<&str>>>()?;

        let entries: Vec<CatalogEntry> = descriptors
            .iter()
            .zip(labels)
            .map(|(descriptor, label)| CatalogEntry {
                label: label.to_string(),
                dom_id: explicit_id(descriptor)
                    .map_or_else(|| derive_id(label), str::to_string),
            })
            .collect();

        let annotated = descriptors
            .iter()
            .zip(&entries)
            .map(|(descriptor, entry)| {
                if explicit_id(descriptor).is_some() {
                    descriptor.clone()
                } else {
                    SectionDescriptor {
                        id: Some(entry.dom_id.clone()),
                        ..descriptor.clone()
                    }
                }
            })
            .collect();

        Ok(Self { entries, annotated })
    }

    #[must_use]
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    /// Index entries in catalog order.
    pub fn nav_items(&self) -> Vec<NavItem> {
        self.entries.iter().map(NavItem::from).collect()
    }

    #[must_use]
    /// Position of the entry with the given identifier.
    pub fn position(&self, dom_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.dom_id == dom_id)
    }
}

/// A descriptor's own identifier; an empty string counts as missing.
fn explicit_id(descriptor: &SectionDescriptor) -> Option<&str> {
    descriptor.id.as_deref().filter(|id| !id.is_empty())
}

#[must_use]
/// Lower-case `label` and replace every space with a hyphen.
///
/// Punctuation, repeated spaces and non-ASCII characters pass through unchanged.
pub fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

#[must_use]
/// Identifier derived from a label when the descriptor carries none.
pub fn derive_id(label: &str) -> String {
    format!("{}{ID_SUFFIX}", slug(label))
}

#[cfg(test)]
#[path = "tests/catalog.rs"]
mod tests;
