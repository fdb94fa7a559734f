//! Read-only access to the known event set.
//!
//! # Responsibility
//! - Load event datasets from the external source.
//! - Enforce catalog-wide invariants (unique ids) at load time.
//!
//! # Invariants
//! - A loaded `EventCatalog` is immutable; reloading builds a new one.
//! - Load failures never yield a partially populated catalog.

mod source;

pub use source::{EventSource, JsonEventSource, StaticEventSource};

use crate::model::event::Event;
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog load failures.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The source could not be read or parsed.
    DataUnavailable(String),
    /// The dataset reused an event id.
    DuplicateEventId(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataUnavailable(message) => write!(f, "event data unavailable: {message}"),
            Self::DuplicateEventId(id) => write!(f, "duplicate event id in dataset: {id}"),
        }
    }
}

impl Error for CatalogError {}

/// Ordered, validated event set from one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Empty catalog; the state before the first successful load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a catalog from `source`.
    ///
    /// # Errors
    /// - `DataUnavailable` when the source fails.
    /// - `DuplicateEventId` when two records share an id.
    pub fn load(source: &dyn EventSource) -> CatalogResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=catalog_load module=catalog status=start source={}",
            source.describe()
        );

        let result = source.load().and_then(Self::from_events);
        match &result {
            Ok(catalog) => info!(
                "event=catalog_load module=catalog status=ok events={} duration_ms={}",
                catalog.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=catalog_load module=catalog status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Builds a catalog from already-validated events, keeping their order.
    pub fn from_events(events: Vec<Event>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.id.as_str()) {
                return Err(CatalogError::DuplicateEventId(event.id.clone()));
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
