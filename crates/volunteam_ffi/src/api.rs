//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide feed and session state the Dart side reads.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Locks are always taken feed first, session second.
//! - Navigation happens on the Dart side; Rust only returns the route.

use chrono::{DateTime, Utc};
use log::warn;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use volunteam_core::db::open_db;
use volunteam_core::{
    core_version as core_version_inner, greeting, init_logging as init_logging_inner,
    ping as ping_inner, AccessToken, AppConfig, AuthenticationContext, EdgePadding,
    EventFeed, EventListView, EventMapView, JsonEventSource, Route, RouteRecorder, Session,
    SessionLifecycleController, SqliteSessionStore, SurfaceSize, UserInfo,
};

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);
static FEED: Lazy<Mutex<EventFeed>> = Lazy::new(|| Mutex::new(EventFeed::new()));
static AUTH: Lazy<Mutex<AuthenticationContext>> =
    Lazy::new(|| Mutex::new(AuthenticationContext::new()));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result of loading the event dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLoadResponse {
    pub ok: bool,
    /// Events in the catalog after the call (previous catalog on failure).
    pub event_count: u32,
    pub message: String,
}

/// One event card for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListEntry {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub starts_at: String,
    pub starts_at_epoch_ms: i64,
}

/// List screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListResponse {
    pub items: Vec<EventListEntry>,
    /// Footer summary, e.g. `2 event(s) found`.
    pub footer: String,
    /// Whether no event was upcoming and the whole catalog is shown.
    pub showing_all: bool,
}

/// One map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarkerEntry {
    pub event_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// Map framing in the shape map widgets expect.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Map screen payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMapResponse {
    pub markers: Vec<MapMarkerEntry>,
    /// `None` until both data and map layout are ready.
    pub region: Option<MapRegion>,
}

/// Session state after a session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub ok: bool,
    pub authenticated: bool,
    /// `Welcome, First Last!` while signed in.
    pub greeting: Option<String>,
    pub message: String,
}

/// Navigation intent for the Dart router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub ok: bool,
    /// Target screen id (`Login|CreateEvent|EventDetails`), when navigating.
    pub screen: Option<String>,
    /// `eventId` route parameter for `EventDetails`.
    pub event_id: Option<String>,
    pub message: String,
}

impl NavigationResponse {
    fn navigate(route: &Route) -> Self {
        Self {
            ok: true,
            screen: Some(route.screen_id().to_string()),
            event_id: route.params().get("eventId").cloned(),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            screen: None,
            event_id: None,
            message: message.into(),
        }
    }
}

/// Reloads the dataset from `VOLUNTEAM_EVENTS_PATH` (default `db.json`).
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - On failure the previous catalog stays visible.
#[flutter_rust_bridge::frb(sync)]
pub fn events_reload() -> FeedLoadResponse {
    reload_from(&JsonEventSource::from_path(CONFIG.events_path.clone()))
}

/// Loads a dataset bundled with the app (`{"events": [...]}` JSON).
#[flutter_rust_bridge::frb(sync)]
pub fn events_load_json(json: String) -> FeedLoadResponse {
    reload_from(&JsonEventSource::from_json(json))
}

/// Builds the list screen payload at `now_epoch_ms` (defaults to now).
#[flutter_rust_bridge::frb(sync)]
pub fn events_list(now_epoch_ms: Option<i64>) -> EventListResponse {
    let now = resolve_now(now_epoch_ms);
    let Ok(feed) = lock_feed() else {
        return EventListResponse {
            items: Vec::new(),
            footer: "0 event(s) found".to_string(),
            showing_all: false,
        };
    };

    let visible = feed.visible_at(now);
    let view = EventListView::from_visible(&visible);
    EventListResponse {
        items: view
            .items
            .into_iter()
            .map(|item| EventListEntry {
                event_id: item.event_id,
                title: item.title,
                description: item.description,
                starts_at: item.starts_at,
                starts_at_epoch_ms: item.starts_at_epoch_ms,
            })
            .collect(),
        footer: view.footer,
        showing_all: visible.is_fallback(),
    }
}

/// Reports that the map finished layout, with its padding in screen points.
///
/// Returns whether a region is now available from `events_map`.
#[flutter_rust_bridge::frb(sync)]
pub fn map_surface_ready(
    padding_top: f64,
    padding_right: f64,
    padding_bottom: f64,
    padding_left: f64,
    surface_width: f64,
    surface_height: f64,
) -> bool {
    let padding = EdgePadding::from_points(
        padding_top,
        padding_right,
        padding_bottom,
        padding_left,
        SurfaceSize {
            width: surface_width,
            height: surface_height,
        },
    );
    match lock_feed() {
        Ok(mut feed) => feed.mark_surface_ready(padding),
        Err(_) => false,
    }
}

/// Builds the map screen payload at `now_epoch_ms` (defaults to now).
#[flutter_rust_bridge::frb(sync)]
pub fn events_map(now_epoch_ms: Option<i64>) -> EventMapResponse {
    let now = resolve_now(now_epoch_ms);
    let Ok(feed) = lock_feed() else {
        return EventMapResponse {
            markers: Vec::new(),
            region: None,
        };
    };

    let view = EventMapView::from_visible(&feed.visible_at(now), feed.region_at(now));
    EventMapResponse {
        markers: view
            .markers
            .into_iter()
            .map(|marker| MapMarkerEntry {
                event_id: marker.event_id,
                latitude: marker.position.latitude,
                longitude: marker.position.longitude,
                label: marker.label,
            })
            .collect(),
        region: view.region.map(|region| MapRegion {
            latitude: region.center.latitude,
            longitude: region.center.longitude,
            latitude_delta: region.latitude_delta,
            longitude_delta: region.longitude_delta,
        }),
    }
}

/// Restores the stored session at app start.
#[flutter_rust_bridge::frb(sync)]
pub fn session_restore() -> SessionResponse {
    restore_session_in(&CONFIG.db_path)
}

fn restore_session_in(db_path: &Path) -> SessionResponse {
    session_call(db_path, "session_restore", |controller| {
        controller.restore().map(|_| ()).map_err(|err| err.to_string())
    })
}

/// Adopts a session produced by the login flow and persists it.
#[flutter_rust_bridge::frb(sync)]
pub fn session_sign_in(
    user_id: String,
    first_name: String,
    last_name: String,
    access_token: String,
) -> SessionResponse {
    sign_in_session_in(&CONFIG.db_path, user_id, first_name, last_name, access_token)
}

fn sign_in_session_in(
    db_path: &Path,
    user_id: String,
    first_name: String,
    last_name: String,
    access_token: String,
) -> SessionResponse {
    if user_id.trim().is_empty() || access_token.trim().is_empty() {
        let (authenticated, greeting) = current_auth_state();
        return SessionResponse {
            ok: false,
            authenticated,
            greeting,
            message: "session_sign_in failed: user_id and access_token are required".to_string(),
        };
    }

    let session = Session::new(
        UserInfo::new(user_id.trim(), first_name, last_name),
        AccessToken::new(access_token),
    );
    session_call(db_path, "session_sign_in", move |controller| {
        controller.sign_in(session).map_err(|err| err.to_string())
    })
}

/// Greeting line for the signed-in user, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn session_greeting() -> Option<String> {
    current_auth_state().1
}

/// Logs out: clears storage and memory, then routes to `Login`.
///
/// # FFI contract
/// - On storage failure returns `ok=false`, no route, and the session stays
///   signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn session_logout() -> NavigationResponse {
    logout_session_in(&CONFIG.db_path)
}

fn logout_session_in(db_path: &Path) -> NavigationResponse {
    navigation_call(db_path, "session_logout", |controller| {
        controller.logout().map_err(|err| err.to_string())
    })
}

/// Route for the event creation screen.
#[flutter_rust_bridge::frb(sync)]
pub fn create_event() -> NavigationResponse {
    create_event_in(&CONFIG.db_path)
}

fn create_event_in(db_path: &Path) -> NavigationResponse {
    navigation_call(db_path, "create_event", |controller| {
        controller.create_event();
        Ok(())
    })
}

/// Route for a visible event's details; rejects ids not currently visible.
#[flutter_rust_bridge::frb(sync)]
pub fn open_event_details(event_id: String, now_epoch_ms: Option<i64>) -> NavigationResponse {
    open_event_details_in(&CONFIG.db_path, event_id, now_epoch_ms)
}

fn open_event_details_in(
    db_path: &Path,
    event_id: String,
    now_epoch_ms: Option<i64>,
) -> NavigationResponse {
    let now = resolve_now(now_epoch_ms);
    let feed = match lock_feed() {
        Ok(feed) => feed,
        Err(err) => return NavigationResponse::failure(format!("open_event_details failed: {err}")),
    };
    let visible = feed.visible_at(now);
    navigation_call(db_path, "open_event_details", |controller| {
        controller
            .open_event_details(&visible, event_id.trim())
            .map_err(|err| err.to_string())
    })
}

type FfiController<'auth, 'conn> =
    SessionLifecycleController<'auth, SqliteSessionStore<'conn>, &'auth mut RouteRecorder>;

fn reload_from(source: &JsonEventSource) -> FeedLoadResponse {
    let mut feed = match lock_feed() {
        Ok(feed) => feed,
        Err(err) => {
            return FeedLoadResponse {
                ok: false,
                event_count: 0,
                message: format!("events_reload failed: {err}"),
            }
        }
    };

    match feed.reload(source) {
        Ok(count) => FeedLoadResponse {
            ok: true,
            event_count: to_u32(count),
            message: format!("Loaded {count} event(s)."),
        },
        Err(err) => FeedLoadResponse {
            ok: false,
            event_count: to_u32(feed.catalog().len()),
            message: format!("events_reload failed: {err}"),
        },
    }
}

fn session_call(
    db_path: &Path,
    op: &str,
    f: impl FnOnce(&mut FfiController<'_, '_>) -> Result<(), String>,
) -> SessionResponse {
    let outcome = with_controller(db_path, f).map(|_| ());
    let (authenticated, greeting) = current_auth_state();
    match outcome {
        Ok(()) => SessionResponse {
            ok: true,
            authenticated,
            greeting,
            message: String::new(),
        },
        Err(err) => SessionResponse {
            ok: false,
            authenticated,
            greeting,
            message: format!("{op} failed: {err}"),
        },
    }
}

fn navigation_call(
    db_path: &Path,
    op: &str,
    f: impl FnOnce(&mut FfiController<'_, '_>) -> Result<(), String>,
) -> NavigationResponse {
    match with_controller(db_path, f) {
        Ok(Some(route)) => NavigationResponse::navigate(&route),
        Ok(None) => NavigationResponse::failure(format!("{op} produced no route")),
        Err(err) => NavigationResponse::failure(format!("{op} failed: {err}")),
    }
}

/// Runs `f` with a controller over the session store at `db_path`.
///
/// Returns the last route requested during the call.
fn with_controller(
    db_path: &Path,
    f: impl FnOnce(&mut FfiController<'_, '_>) -> Result<(), String>,
) -> Result<Option<Route>, String> {
    let conn = open_db(db_path).map_err(|err| format!("session DB open failed: {err}"))?;
    let mut auth = lock_auth()?;
    let mut navigator = RouteRecorder::new();
    {
        let mut controller = SessionLifecycleController::new(
            SqliteSessionStore::new(&conn),
            &mut navigator,
            &mut *auth,
        );
        f(&mut controller)?;
    }
    Ok(navigator.last().cloned())
}

fn current_auth_state() -> (bool, Option<String>) {
    match lock_auth() {
        Ok(auth) => (auth.is_authenticated(), greeting(&auth)),
        Err(_) => (false, None),
    }
}

fn lock_feed() -> Result<MutexGuard<'static, EventFeed>, String> {
    FEED.lock().map_err(|_| {
        warn!("event=ffi_lock module=ffi status=error target=feed error_code=poisoned");
        "event feed lock poisoned".to_string()
    })
}

fn lock_auth() -> Result<MutexGuard<'static, AuthenticationContext>, String> {
    AUTH.lock().map_err(|_| {
        warn!("event=ffi_lock module=ffi status=error target=session error_code=poisoned");
        "session lock poisoned".to_string()
    })
}

fn resolve_now(now_epoch_ms: Option<i64>) -> DateTime<Utc> {
    now_epoch_ms
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
