//! sectionspy: keep a section index synchronised with the scroll position of a long document.
//!
//! The core is two pieces: the [`catalog`] turns section descriptors into navigation entries with
//! stable identifiers, and the [`tracker`] moves a single active index one step at a time as
//! scroll events arrive. [`spy::ScrollSpy`] ties them together behind one armed listener. The
//! remaining modules host the core in a terminal viewer for markdown documents.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod error;
pub mod formats;
pub mod input;
pub mod layout;
pub mod section;
pub mod spy;
pub mod tracker;
pub mod ui;

pub use catalog::{Accessor, Catalog, CatalogEntry, NavItem, TitleSource};
pub use config::Config;
pub use error::{Result, SpyError};
pub use section::SectionDescriptor;
pub use spy::ScrollSpy;
pub use tracker::{Geometry, ScrollMetrics, SectionBox};
