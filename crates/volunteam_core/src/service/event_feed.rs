//! Event feed use-case service.
//!
//! # Responsibility
//! - Own the current catalog and the viewport readiness latch.
//! - Serve the visible set and map region to both presentations, so neither
//!   carries its own filtering logic.
//!
//! # Invariants
//! - A failed reload keeps the previous catalog untouched.
//! - The visible set is recomputed on every query, never cached.
//! - The planner is only reached with a non-empty visible set and an open
//!   latch.

use crate::catalog::{CatalogResult, EventCatalog, EventSource};
use crate::engine::viewport::{plan_region, EdgePadding, Region, ViewportLatch};
use crate::engine::visibility::{select_visible, VisibleSet};
use chrono::{DateTime, Utc};
use log::{debug, error};

/// Shared core behind the list and map presentations.
#[derive(Debug, Default)]
pub struct EventFeed {
    catalog: EventCatalog,
    latch: ViewportLatch,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already loaded catalog; data is considered ready.
    pub fn with_catalog(catalog: EventCatalog) -> Self {
        let mut latch = ViewportLatch::new();
        latch.mark_data_ready();
        Self { catalog, latch }
    }

    /// Replaces the catalog with a fresh load from `source`.
    ///
    /// Returns the number of loaded events.
    ///
    /// # Errors
    /// - Any `CatalogError`; the previous catalog and readiness stay in place.
    pub fn reload(&mut self, source: &dyn EventSource) -> CatalogResult<usize> {
        let catalog = EventCatalog::load(source)?;
        let count = catalog.len();
        self.catalog = catalog;
        self.latch.mark_data_ready();
        Ok(count)
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Whether a catalog load has completed.
    pub fn is_loaded(&self) -> bool {
        self.latch.is_data_ready()
    }

    /// Visible events at `now`.
    pub fn visible_at(&self, now: DateTime<Utc>) -> VisibleSet<'_> {
        select_visible(self.catalog.events(), now)
    }

    /// Records that the map surface finished layout.
    ///
    /// Returns whether a region can now be planned.
    pub fn mark_surface_ready(&mut self, padding: EdgePadding) -> bool {
        self.latch.mark_surface_ready(padding)
    }

    /// Region framing the visible set at `now`.
    ///
    /// `None` while the latch is closed or while there is nothing to frame.
    pub fn region_at(&self, now: DateTime<Utc>) -> Option<Region> {
        let padding = self.latch.padding()?;
        let visible = self.visible_at(now);
        if visible.is_empty() {
            debug!("event=viewport_plan module=feed status=skipped reason=no_visible_markers");
            return None;
        }

        match plan_region(&visible.positions(), padding) {
            Ok(region) => Some(region),
            Err(err) => {
                error!("event=viewport_plan module=feed status=error error={err}");
                None
            }
        }
    }
}
