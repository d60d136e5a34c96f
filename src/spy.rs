//! The scroll spy: catalog, navigation state and the single armed scroll listener.
//!
//! [`ScrollSpy::build`] is the entry point a renderer uses. It validates configuration before
//! anything is armed, catalogues the sections, and hands back navigation items and annotated
//! descriptors to render. The host then forwards every viewport scroll event to
//! [`ScrollSpy::handle_scroll`] and subscribes to index changes instead of polling.
//!
//! # Listener lifecycle
//!
//! While enabled, exactly one [`Listener`] is armed. It captures the boundary and offset at the
//! moment it is armed; any change to the sections, configuration or enabled flag detaches it and
//! arms a fresh one, so the handler never runs against stale values. Disabling detaches the
//! listener and freezes the index.

use crate::catalog::{Accessor, Catalog, CatalogEntry, NavItem};
use crate::config::Config;
use crate::error::{Result, SpyError};
use crate::section::SectionDescriptor;
use crate::tracker::{Geometry, NavigationState, Position, ScrollMetrics, Tracker};
use log::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle returned by [`ScrollSpy::subscribe`].
pub struct SubscriptionId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
/// The armed scroll handler.
pub struct Listener {
    /// Increases every time a listener is armed.
    pub generation: u64,
    /// Crossing rule closed over the values current at arm time.
    pub tracker: Tracker,
}

type Observer = Box<dyn FnMut(usize)>;

/// Catalog plus scroll tracking state for one document.
pub struct ScrollSpy {
    config: Config,
    accessor: Option<Accessor>,
    children: Vec<SectionDescriptor>,
    catalog: Catalog,
    state: NavigationState,
    listener: Option<Listener>,
    generation: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl ScrollSpy {
    /// Catalogue `children` and arm a listener if `config.enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::InvalidBoundary`] before arming anything when the boundary is outside
    /// `[0, 1]`, or [`SpyError::MissingTitle`] when a descriptor has no usable title.
    pub fn build(children: Vec<SectionDescriptor>, config: Config) -> Result<Self> {
        Self::build_inner(children, config, None)
    }

    /// As [`ScrollSpy::build`], resolving titles through a custom accessor.
    ///
    /// The accessor names in `config` are ignored in favour of `accessor`.
    ///
    /// # Errors
    ///
    /// As for [`ScrollSpy::build`].
    pub fn build_with_accessor(
        children: Vec<SectionDescriptor>,
        config: Config,
        accessor: Accessor,
    ) -> Result<Self> {
        Self::build_inner(children, config, Some(accessor))
    }

    fn build_inner(
        children: Vec<SectionDescriptor>,
        config: Config,
        accessor: Option<Accessor>,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = Self::catalogue(&children, &config, accessor.as_ref())?;

        let mut spy = Self {
            config,
            accessor,
            children,
            catalog,
            state: NavigationState::default(),
            listener: None,
            generation: 0,
            observers: Vec::new(),
            next_subscription: 0,
        };
        spy.rearm();
        Ok(spy)
    }

    fn catalogue(
        children: &[SectionDescriptor],
        config: &Config,
        accessor: Option<&Accessor>,
    ) -> Result<Catalog> {
        let catalog = match accessor {
            Some(accessor) => Catalog::build(children, accessor)?,
            None => Catalog::build(
                children,
                &Accessor::new(&config.title_accessor, config.dive_accessor.as_deref()),
            )?,
        };
        info!("catalogued {} sections", catalog.len());
        Ok(catalog)
    }

    /// Detach the current listener and, when enabled, arm a new one over current values.
    fn rearm(&mut self) {
        if let Some(old) = self.listener.take() {
            debug!("detached scroll listener #{}", old.generation);
        }
        if self.config.enabled {
            self.generation += 1;
            self.listener = Some(Listener {
                generation: self.generation,
                tracker: Tracker::new(
                    self.config.viewport_boundary,
                    self.config.content_top_offset,
                ),
            });
            info!("armed scroll listener #{}", self.generation);
        }
    }

    #[must_use]
    /// Index of the active section (0 when the catalog is empty).
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[must_use]
    /// Full navigation state, including the last seen scroll offset.
    pub fn state(&self) -> NavigationState {
        self.state
    }

    #[must_use]
    /// Index entries in section order.
    pub fn nav_items(&self) -> Vec<NavItem> {
        self.catalog.nav_items()
    }

    #[must_use]
    /// Catalog entries in section order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.catalog.entries
    }

    #[must_use]
    /// Descriptors with identifiers filled in, to be rendered instead of the originals.
    pub fn mutated_children(&self) -> &[SectionDescriptor] {
        &self.catalog.annotated
    }

    #[must_use]
    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    /// Currently armed listener, if the spy is enabled.
    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    /// Make `index` the active section, as a click in the index or a restored fragment would.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::OutOfRange`] when `index` is not a catalog position.
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        let before = self.state.current_index;
        self.state.set_current_index(index, self.catalog.len())?;
        self.notify_if_changed(before);
        Ok(())
    }

    /// Signed variant of [`ScrollSpy::set_current_index`] for indices from untrusted sources.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::OutOfRange`] for negative indices or indices past the end.
    pub fn set_current_index_signed(&mut self, index: i64) -> Result<()> {
        let index = usize::try_from(index).map_err(|_| SpyError::OutOfRange(index))?;
        self.set_current_index(index)
    }

    /// Activate the section carrying `dom_id`.
    ///
    /// Returns the index activated, or `None` if no entry has that identifier.
    pub fn activate(&mut self, dom_id: &str) -> Option<usize> {
        let index = self.catalog.position(dom_id)?;
        self.set_current_index(index).ok()?;
        Some(index)
    }

    /// Forward one viewport scroll event to the armed listener.
    ///
    /// Returns `None` when no listener is armed (the spy is disabled); the state is untouched.
    pub fn handle_scroll(
        &mut self,
        metrics: ScrollMetrics,
        geometry: &dyn Geometry,
    ) -> Option<Position> {
        let listener = self.listener?;
        let before = self.state.current_index;
        let entries = &self.catalog.entries;
        let position = listener
            .tracker
            .on_scroll(&mut self.state, entries, metrics, geometry);
        self.notify_if_changed(before);
        Some(position)
    }

    /// Replace the section list, rebuilding the catalog and re-arming.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::MissingTitle`] and leaves the spy unchanged if a descriptor has no
    /// usable title.
    pub fn set_children(&mut self, children: Vec<SectionDescriptor>) -> Result<()> {
        let catalog = Self::catalogue(&children, &self.config, self.accessor.as_ref())?;
        self.children = children;
        self.install(catalog);
        Ok(())
    }

    /// Replace the configuration, rebuilding the catalog and re-arming.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::InvalidBoundary`] or [`SpyError::MissingTitle`] and leaves the spy
    /// unchanged on failure.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        let catalog = Self::catalogue(&self.children, &config, self.accessor.as_ref())?;
        self.config = config;
        self.install(catalog);
        Ok(())
    }

    /// Enable or disable tracking. Disabling detaches the listener and freezes the index.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            self.config.enabled = enabled;
            self.rearm();
        }
    }

    fn install(&mut self, catalog: Catalog) {
        let before = self.state.current_index;
        self.catalog = catalog;
        self.state.clamp(self.catalog.len());
        self.rearm();
        self.notify_if_changed(before);
    }

    /// Register `observer` to be called with the new index whenever it changes.
    pub fn subscribe(&mut self, observer: impl FnMut(usize) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let count = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != count
    }

    fn notify_if_changed(&mut self, before: usize) {
        let index = self.state.current_index;
        if index != before {
            for (_, observer) in &mut self.observers {
                observer(index);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/spy.rs"]
mod tests;
