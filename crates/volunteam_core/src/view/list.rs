//! List presentation adapter.

use crate::engine::visibility::VisibleSet;
use crate::model::event::{Event, EventId};
use chrono::{DateTime, Utc};

const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// One card in the event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListItem {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    /// Start time rendered for display.
    pub starts_at: String,
    /// Start time in epoch milliseconds, for host-side locale formatting.
    pub starts_at_epoch_ms: i64,
}

impl EventListItem {
    fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.name.clone(),
            description: event.description.clone(),
            starts_at: format_start(event.date_time),
            starts_at_epoch_ms: event.date_time.timestamp_millis(),
        }
    }
}

/// Event list view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListView {
    pub items: Vec<EventListItem>,
    /// Footer summary, e.g. `3 event(s) found`.
    pub footer: String,
}

impl EventListView {
    pub fn from_visible(visible: &VisibleSet<'_>) -> Self {
        let items = visible
            .iter()
            .map(EventListItem::from_event)
            .collect::<Vec<_>>();
        let footer = format!("{} event(s) found", items.len());
        Self { items, footer }
    }
}

fn format_start(value: DateTime<Utc>) -> String {
    value.format(START_TIME_FORMAT).to_string()
}
