//! Temporal visibility filter with a non-empty fallback.
//!
//! # Invariants
//! - The visible set preserves catalog order.
//! - The visible set is empty only when the input is empty.

use crate::model::event::{Event, Position};
use chrono::{DateTime, Utc};

/// Events eligible for display at one reference instant.
///
/// Borrowed from the catalog; recompute instead of storing it, since
/// "upcoming" changes as time passes.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSet<'a> {
    events: Vec<&'a Event>,
    fallback: bool,
}

impl<'a> VisibleSet<'a> {
    /// Whether the set is the unfiltered catalog because nothing was upcoming.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn events(&self) -> &[&'a Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, event_id: &str) -> Option<&'a Event> {
        self.iter().find(|event| event.id == event_id)
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.get(event_id).is_some()
    }

    /// Marker positions in display order.
    pub fn positions(&self) -> Vec<Position> {
        self.iter().map(|event| event.position).collect()
    }
}

/// Selects events starting strictly after `now`.
///
/// Falls back to the whole input when no event is upcoming, so a non-empty
/// catalog never produces a blank screen.
pub fn select_visible(events: &[Event], now: DateTime<Utc>) -> VisibleSet<'_> {
    let upcoming: Vec<&Event> = events.iter().filter(|event| event.is_upcoming(now)).collect();
    if upcoming.is_empty() && !events.is_empty() {
        return VisibleSet {
            events: events.iter().collect(),
            fallback: true,
        };
    }

    VisibleSet {
        events: upcoming,
        fallback: false,
    }
}
