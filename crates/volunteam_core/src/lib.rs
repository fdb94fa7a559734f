//! Core domain logic for Volunteam.
//! This crate is the single source of truth for event visibility, map
//! framing and session lifecycle invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod view;

pub use catalog::{
    CatalogError, CatalogResult, EventCatalog, EventSource, JsonEventSource, StaticEventSource,
};
pub use config::AppConfig;
pub use engine::viewport::{
    plan_region, EdgePadding, Region, SurfaceSize, ViewportError, ViewportLatch,
    MIN_SPAN_DEGREES,
};
pub use engine::visibility::{select_visible, VisibleSet};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{parse_event_instant, Event, EventId, EventValidationError, Position};
pub use model::session::{
    AccessToken, Session, UserInfo, UserName, ACCESS_TOKEN_KEY, SESSION_KEYS, USER_INFO_KEY,
};
pub use service::event_feed::EventFeed;
pub use session::auth_context::AuthenticationContext;
pub use session::controller::SessionLifecycleController;
pub use session::navigation::{NavigationError, Navigator, Route, RouteRecorder};
pub use store::session_store::{SessionStore, SqliteSessionStore, StorageError, StoreResult};
pub use view::greeting;
pub use view::list::{EventListItem, EventListView};
pub use view::map::{EventMapView, MapMarker};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
