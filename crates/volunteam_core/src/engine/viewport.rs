//! Map viewport planning.
//!
//! # Responsibility
//! - Compute the region that frames every visible marker.
//! - Gate planning on both "data ready" and "surface ready" signals.
//!
//! # Invariants
//! - A planned region contains every input position.
//! - Region spans never collapse below `MIN_SPAN_DEGREES`.
//! - Planning is pure geometry; no layout or rendering dependency.

use crate::model::event::Position;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest span per axis, used when all markers share a coordinate.
pub const MIN_SPAN_DEGREES: f64 = 0.01;
/// Largest share of the surface one edge may reserve as padding.
pub const MAX_PADDING_RATIO: f64 = 0.45;

const MAX_LATITUDE_DELTA: f64 = 180.0;
const MAX_LONGITUDE_DELTA: f64 = 360.0;
const CONTAINS_EPSILON: f64 = 1e-9;

/// Map surface size in screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

/// Symmetric edge padding in normalized units.
///
/// `vertical` is the fraction of the surface height kept free at the top and
/// at the bottom; `horizontal` the same for left and right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgePadding {
    vertical: f64,
    horizontal: f64,
}

impl EdgePadding {
    /// Builds padding from ratios, clamped to `[0, MAX_PADDING_RATIO]`.
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self {
            vertical: clamp_ratio(vertical),
            horizontal: clamp_ratio(horizontal),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Converts host padding in screen points to normalized padding.
    ///
    /// The larger of each opposing pair is used on both sides so the region
    /// stays centered on the markers.
    pub fn from_points(top: f64, right: f64, bottom: f64, left: f64, surface: SurfaceSize) -> Self {
        Self::new(
            points_to_ratio(top.max(bottom), surface.height),
            points_to_ratio(left.max(right), surface.width),
        )
    }

    pub fn vertical(&self) -> f64 {
        self.vertical
    }

    pub fn horizontal(&self) -> f64 {
        self.horizontal
    }
}

fn clamp_ratio(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_PADDING_RATIO)
    } else {
        0.0
    }
}

fn points_to_ratio(points: f64, extent: f64) -> f64 {
    if extent > 0.0 && points.is_finite() {
        points / extent
    } else {
        0.0
    }
}

/// Map framing: center, spans and the padding they were sized for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Position,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
    pub padding: EdgePadding,
}

impl Region {
    /// Whether `position` lies inside the region's full extent.
    pub fn contains(&self, position: &Position) -> bool {
        (position.latitude - self.center.latitude).abs()
            <= self.latitude_delta / 2.0 + CONTAINS_EPSILON
            && (position.longitude - self.center.longitude).abs()
                <= self.longitude_delta / 2.0 + CONTAINS_EPSILON
    }

    /// `(south_west, north_east)` corners of the region.
    pub fn bounds(&self) -> (Position, Position) {
        let half_lat = self.latitude_delta / 2.0;
        let half_lon = self.longitude_delta / 2.0;
        (
            Position::new(
                self.center.latitude - half_lat,
                self.center.longitude - half_lon,
            ),
            Position::new(
                self.center.latitude + half_lat,
                self.center.longitude + half_lon,
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportError {
    /// Planning was requested with no positions.
    NoVisibleMarkers,
    /// A position is not finite or out of range.
    InvalidPosition(Position),
}

impl Display for ViewportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVisibleMarkers => write!(f, "no visible markers to frame"),
            Self::InvalidPosition(position) => write!(
                f,
                "invalid marker position ({}, {})",
                position.latitude, position.longitude
            ),
        }
    }
}

impl Error for ViewportError {}

/// Plans the region framing every position with `padding` applied.
///
/// # Errors
/// - `NoVisibleMarkers` when `positions` is empty; callers must guard.
/// - `InvalidPosition` for non-finite or out-of-range coordinates.
pub fn plan_region(positions: &[Position], padding: EdgePadding) -> Result<Region, ViewportError> {
    let Some(first) = positions.first() else {
        return Err(ViewportError::NoVisibleMarkers);
    };

    let (mut south, mut north) = (first.latitude, first.latitude);
    let (mut west, mut east) = (first.longitude, first.longitude);
    for position in positions {
        if position.validate().is_err() {
            return Err(ViewportError::InvalidPosition(*position));
        }
        south = south.min(position.latitude);
        north = north.max(position.latitude);
        west = west.min(position.longitude);
        east = east.max(position.longitude);
    }

    let latitude_span = (north - south).max(MIN_SPAN_DEGREES);
    let longitude_span = (east - west).max(MIN_SPAN_DEGREES);

    Ok(Region {
        center: Position::new((south + north) / 2.0, (west + east) / 2.0),
        latitude_delta: (latitude_span / (1.0 - 2.0 * padding.vertical))
            .min(MAX_LATITUDE_DELTA),
        longitude_delta: (longitude_span / (1.0 - 2.0 * padding.horizontal))
            .min(MAX_LONGITUDE_DELTA),
        padding,
    })
}

/// Two-phase readiness gate for viewport planning.
///
/// Planning runs only after the data and the map surface both reported
/// ready. Both signals are sticky: later reloads or layout passes only update
/// the padding, they never close the latch again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportLatch {
    data_ready: bool,
    surface_padding: Option<EdgePadding>,
}

impl ViewportLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that visible data is available. Returns whether the latch opened.
    pub fn mark_data_ready(&mut self) -> bool {
        self.data_ready = true;
        self.is_open()
    }

    /// Records that the map surface finished layout. Returns whether the latch opened.
    pub fn mark_surface_ready(&mut self, padding: EdgePadding) -> bool {
        self.surface_padding = Some(padding);
        self.is_open()
    }

    pub fn is_data_ready(&self) -> bool {
        self.data_ready
    }

    pub fn is_open(&self) -> bool {
        self.data_ready && self.surface_padding.is_some()
    }

    /// Padding to plan with, once the latch is open.
    pub fn padding(&self) -> Option<EdgePadding> {
        if self.data_ready {
            self.surface_padding
        } else {
            None
        }
    }
}
