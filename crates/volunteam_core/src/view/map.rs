//! Map presentation adapter.

use crate::engine::viewport::Region;
use crate::engine::visibility::VisibleSet;
use crate::model::event::{EventId, Position};

/// One marker on the map; activating it opens the event details.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub event_id: EventId,
    pub position: Position,
    pub label: String,
}

/// Map view model: markers plus the region to frame them, once planned.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMapView {
    pub markers: Vec<MapMarker>,
    /// `None` until the viewport latch opened.
    pub region: Option<Region>,
}

impl EventMapView {
    pub fn from_visible(visible: &VisibleSet<'_>, region: Option<Region>) -> Self {
        let markers = visible
            .iter()
            .map(|event| MapMarker {
                event_id: event.id.clone(),
                position: event.position,
                label: event.name.clone(),
            })
            .collect();
        Self { markers, region }
    }
}
