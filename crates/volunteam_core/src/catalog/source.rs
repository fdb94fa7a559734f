//! Event data sources.

use super::{CatalogError, CatalogResult};
use crate::model::event::Event;
use serde::Deserialize;
use std::path::PathBuf;

/// Producer of the raw event sequence.
pub trait EventSource {
    fn load(&self) -> CatalogResult<Vec<Event>>;
    /// Short label for diagnostics; must not contain secrets.
    fn describe(&self) -> String;
}

/// Top-level dataset document: `{"events": [...]}`.
#[derive(Debug, Deserialize)]
struct EventDataset {
    events: Vec<Event>,
}

/// JSON dataset read from a file or held in memory.
#[derive(Debug, Clone)]
pub enum JsonEventSource {
    File(PathBuf),
    Inline(String),
}

impl JsonEventSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn from_json(json: impl Into<String>) -> Self {
        Self::Inline(json.into())
    }
}

impl EventSource for JsonEventSource {
    fn load(&self) -> CatalogResult<Vec<Event>> {
        let raw = match self {
            Self::File(path) => std::fs::read_to_string(path).map_err(|err| {
                CatalogError::DataUnavailable(format!(
                    "failed to read `{}`: {err}",
                    path.display()
                ))
            })?,
            Self::Inline(json) => json.clone(),
        };

        let dataset: EventDataset = serde_json::from_str(&raw)
            .map_err(|err| CatalogError::DataUnavailable(format!("malformed dataset: {err}")))?;
        Ok(dataset.events)
    }

    fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::Inline(_) => "inline".to_string(),
        }
    }
}

/// Fixed in-memory event list.
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<Event>,
}

impl StaticEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticEventSource {
    fn load(&self) -> CatalogResult<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
