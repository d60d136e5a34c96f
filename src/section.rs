//! Section representations: parsed document headings and the descriptors handed to the catalog.
//!
//! A [`Section`] is a heading found in a document, with the line coordinates the layout needs to
//! place it on screen. A [`SectionDescriptor`] is the opaque unit the catalog builder works on: a
//! property map holding a title (directly or one level down) and an optional identifier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
/// Document division with the line coordinates used for layout.
pub struct Section {
    /// Section heading text without markup symbols or attribute suffix.
    pub title: String,
    /// Heading depth (1 for `#`).
    pub level: usize,
    /// Identifier given explicitly with a `{#id}` suffix, if any.
    pub anchor: Option<String>,
    /// Line holding the heading itself (0-indexed).
    pub line_heading: usize,
    /// Line where the next section begins or file ends (exclusive).
    pub line_end: usize,
    /// Source file containing this section.
    pub file_path: String,
}

impl Section {
    #[must_use]
    /// Descriptor carrying the title both directly and under a `heading` object.
    ///
    /// The nested copy lets a configuration use `dive_accessor = "heading"`.
    pub fn descriptor(&self) -> SectionDescriptor {
        let mut heading = Map::new();
        heading.insert("title".to_string(), Value::from(self.title.clone()));
        heading.insert("level".to_string(), Value::from(self.level));

        let mut props = Map::new();
        props.insert("title".to_string(), Value::from(self.title.clone()));
        props.insert("file".to_string(), Value::from(self.file_path.clone()));
        props.insert("heading".to_string(), Value::Object(heading));

        SectionDescriptor {
            id: self.anchor.clone(),
            props,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// One unit of content to be catalogued and tracked.
pub struct SectionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Pre-existing identifier; filled in by the catalog builder when absent.
    pub id: Option<String>,
    #[serde(default)]
    /// Arbitrary properties, among them the title (or an object holding it).
    pub props: Map<String, Value>,
}

impl SectionDescriptor {
    #[must_use]
    /// Descriptor with a single string property.
    pub fn with_prop(key: &str, value: impl Into<Value>) -> Self {
        let mut props = Map::new();
        props.insert(key.to_string(), value.into());
        Self { id: None, props }
    }

    #[must_use]
    /// Descriptor titled under the default `title` property.
    pub fn titled(title: &str) -> Self {
        Self::with_prop("title", title)
    }

    #[must_use]
    /// Replace the identifier.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}
