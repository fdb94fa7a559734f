//! Volunteer event domain model.
//!
//! # Responsibility
//! - Define the canonical event record shared by list and map projections.
//! - Parse the external dataset shape (`dateTime`, nested `position`).
//!
//! # Invariants
//! - `name` is never blank.
//! - `position` is finite and inside WGS84 latitude/longitude ranges.
//! - Events are immutable once loaded; there are no mutation helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier assigned to every event by the external data source.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EventId = String;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validates finiteness and coordinate ranges.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EventValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EventValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Canonical volunteer event record.
///
/// Serialized with the dataset field names so one shape serves both the
/// JSON source and host-facing payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub position: Position,
    /// Start instant, normalized to UTC.
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<Utc>,
}

impl Event {
    /// Builds an event and validates it.
    pub fn new(
        id: impl Into<EventId>,
        name: impl Into<String>,
        description: impl Into<String>,
        position: Position,
        date_time: DateTime<Utc>,
    ) -> Result<Self, EventValidationError> {
        let event = Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            position,
            date_time,
        };
        event.validate()?;
        Ok(event)
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(EventValidationError::EmptyName {
                id: self.id.clone(),
            });
        }
        self.position.validate()
    }

    /// Returns whether the event starts strictly after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date_time > now
    }
}

/// Wire shape accepted from datasets before validation.
#[derive(Debug, Deserialize)]
struct EventRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    position: Position,
    #[serde(rename = "dateTime")]
    date_time: String,
}

impl TryFrom<EventRecord> for Event {
    type Error = EventValidationError;

    fn try_from(value: EventRecord) -> Result<Self, Self::Error> {
        let date_time = parse_event_instant(&value.date_time)?;
        Event::new(
            value.id,
            value.name,
            value.description,
            value.position,
            date_time,
        )
    }
}

/// Parses a dataset `dateTime` value into a UTC instant.
///
/// Accepted shapes:
/// - RFC 3339 with `Z` or an offset: `2099-01-01T10:00:00-03:00`
/// - naive date-time, read as UTC: `2099-01-01T10:00:00` (optional fraction)
/// - date only, read as UTC midnight: `2099-01-01`
pub fn parse_event_instant(raw: &str) -> Result<DateTime<Utc>, EventValidationError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(EventValidationError::InvalidDateTime(raw.to_string()))
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValidationError {
    EmptyId,
    EmptyName { id: EventId },
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvalidDateTime(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "event id must not be empty"),
            Self::EmptyName { id } => write!(f, "event `{id}` has an empty name"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
            Self::InvalidDateTime(value) => {
                write!(f, "dateTime `{value}` is not an ISO-8601 instant")
            }
        }
    }
}

impl Error for EventValidationError {}

#[cfg(test)]
mod tests {
    use super::{parse_event_instant, EventValidationError, Position};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_rfc3339_with_offset_into_utc() {
        let parsed = parse_event_instant("2099-01-01T10:00:00-03:00").expect("rfc3339");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2099, 1, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn parses_date_only_as_utc_midnight() {
        let parsed = parse_event_instant("2000-01-01").expect("date only");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime_with_fraction() {
        let parsed = parse_event_instant("2024-05-06T07:08:09.250").expect("naive");
        assert_eq!(parsed.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn rejects_unparseable_instant() {
        let err = parse_event_instant("next tuesday").unwrap_err();
        assert_eq!(
            err,
            EventValidationError::InvalidDateTime("next tuesday".to_string())
        );
    }

    #[test]
    fn position_rejects_non_finite_and_out_of_range() {
        assert!(Position::new(f64::NAN, 0.0).validate().is_err());
        assert!(Position::new(91.0, 0.0).validate().is_err());
        assert!(Position::new(0.0, -180.5).validate().is_err());
        assert!(Position::new(-90.0, 180.0).validate().is_ok());
    }
}
