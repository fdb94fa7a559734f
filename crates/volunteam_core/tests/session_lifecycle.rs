use chrono::{TimeZone, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use volunteam_core::db::open_db_in_memory;
use volunteam_core::{
    select_visible, AccessToken, AuthenticationContext, Event, NavigationError, Position, Route,
    RouteRecorder, Session, SessionLifecycleController, SessionStore, SqliteSessionStore,
    StorageError, StoreResult, UserInfo, ACCESS_TOKEN_KEY, USER_INFO_KEY,
};

/// In-memory store whose writes and removals can be switched off.
#[derive(Default)]
struct ToggleStore {
    entries: RefCell<BTreeMap<String, String>>,
    offline: bool,
}

impl ToggleStore {
    fn offline_with(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: RefCell::new(entries),
            offline: true,
        }
    }
}

impl SessionStore for ToggleStore {
    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        Ok(self.entries.borrow().clone())
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if self.offline {
            return Err(StorageError::Unavailable("device storage offline".to_string()));
        }
        self.entries.borrow_mut().extend(entries.clone());
        Ok(())
    }

    fn remove_keys(&self, keys: &[&str]) -> StoreResult<()> {
        if self.offline {
            return Err(StorageError::Unavailable("device storage offline".to_string()));
        }
        let mut entries = self.entries.borrow_mut();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

fn ada() -> Session {
    Session::new(
        UserInfo::new("user-42", "Ada", "Lovelace"),
        AccessToken::new("token-abc"),
    )
}

fn signed_in(store: impl SessionStore, auth: &mut AuthenticationContext) {
    let mut controller = SessionLifecycleController::new(store, RouteRecorder::new(), auth);
    controller.sign_in(ada()).unwrap();
}

#[test]
fn logout_clears_store_and_context_then_routes_to_login() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = AuthenticationContext::new();
    signed_in(SqliteSessionStore::new(&conn), &mut auth);
    assert!(auth.is_authenticated());

    let mut navigator = RouteRecorder::new();
    {
        let mut controller =
            SessionLifecycleController::new(SqliteSessionStore::new(&conn), &mut navigator, &mut auth);
        controller.logout().unwrap();
        assert!(controller.auth().current().is_none());
    }

    assert!(auth.current().is_none());
    let remaining = SqliteSessionStore::new(&conn).read_all().unwrap();
    assert!(!remaining.contains_key(USER_INFO_KEY));
    assert!(!remaining.contains_key(ACCESS_TOKEN_KEY));
    assert_eq!(navigator.routes(), &[Route::Login]);
}

#[test]
fn logout_storage_failure_keeps_session_and_does_not_navigate() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = AuthenticationContext::new();
    signed_in(SqliteSessionStore::new(&conn), &mut auth);
    conn.execute_batch("DROP TABLE session_entries;").unwrap();

    let mut navigator = RouteRecorder::new();
    let result = SessionLifecycleController::new(
        SqliteSessionStore::new(&conn),
        &mut navigator,
        &mut auth,
    )
    .logout();

    assert!(matches!(result, Err(StorageError::Db(_))));
    assert_eq!(auth.current(), Some(&ada()));
    assert!(navigator.routes().is_empty());
}

#[test]
fn logout_with_unavailable_store_is_fail_loud() {
    let mut auth = AuthenticationContext::new();
    signed_in(ToggleStore::default(), &mut auth);
    let store = ToggleStore::offline_with(BTreeMap::from([
        (USER_INFO_KEY.to_string(), "{}".to_string()),
        (ACCESS_TOKEN_KEY.to_string(), "token-abc".to_string()),
    ]));

    let mut navigator = RouteRecorder::new();
    let err = SessionLifecycleController::new(&store, &mut navigator, &mut auth)
        .logout()
        .unwrap_err();

    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(auth.is_authenticated());
    assert_eq!(store.read_all().unwrap().len(), 2);
    assert!(navigator.last().is_none());
}

#[test]
fn logout_without_session_still_routes_to_login() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = AuthenticationContext::new();
    let mut navigator = RouteRecorder::new();

    SessionLifecycleController::new(SqliteSessionStore::new(&conn), &mut navigator, &mut auth)
        .logout()
        .unwrap();

    assert_eq!(navigator.last(), Some(&Route::Login));
}

#[test]
fn restore_reads_session_written_by_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let mut first_run = AuthenticationContext::new();
    signed_in(SqliteSessionStore::new(&conn), &mut first_run);

    let mut next_run = AuthenticationContext::new();
    let mut controller = SessionLifecycleController::new(
        SqliteSessionStore::new(&conn),
        RouteRecorder::new(),
        &mut next_run,
    );
    let restored = controller.restore().unwrap().cloned();

    assert_eq!(restored, Some(ada()));
    assert!(controller.navigator().routes().is_empty());
    drop(controller);
    assert_eq!(
        next_run.current().map(|session| session.access_token.expose()),
        Some("token-abc")
    );
}

#[test]
fn restore_treats_partial_store_as_signed_out() {
    let store = ToggleStore::default();
    store
        .write_all(&BTreeMap::from([(
            ACCESS_TOKEN_KEY.to_string(),
            "orphan-token".to_string(),
        )]))
        .unwrap();
    let mut auth = AuthenticationContext::new();

    let restored = SessionLifecycleController::new(&store, RouteRecorder::new(), &mut auth)
        .restore()
        .unwrap()
        .cloned();

    assert_eq!(restored, None);
    assert!(!auth.is_authenticated());
}

#[test]
fn restore_with_malformed_user_info_leaves_context_unchanged() {
    let mut auth = AuthenticationContext::new();
    signed_in(ToggleStore::default(), &mut auth);
    let store = ToggleStore::default();
    store
        .write_all(&BTreeMap::from([
            (USER_INFO_KEY.to_string(), "not json".to_string()),
            (ACCESS_TOKEN_KEY.to_string(), "token-xyz".to_string()),
        ]))
        .unwrap();

    let err = SessionLifecycleController::new(&store, RouteRecorder::new(), &mut auth)
        .restore()
        .unwrap_err();

    assert!(matches!(err, StorageError::InvalidData(_)));
    assert_eq!(auth.current(), Some(&ada()));
}

#[test]
fn sign_in_failure_leaves_context_empty() {
    let store = ToggleStore::offline_with(BTreeMap::new());
    let mut auth = AuthenticationContext::new();

    let err = SessionLifecycleController::new(&store, RouteRecorder::new(), &mut auth)
        .sign_in(ada())
        .unwrap_err();

    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(auth.current().is_none());
}

#[test]
fn sign_in_stores_user_info_as_json() {
    let store = ToggleStore::default();
    let mut auth = AuthenticationContext::new();
    signed_in(&store, &mut auth);

    let stored = store.read_all().unwrap();
    let user: serde_json::Value = serde_json::from_str(&stored[USER_INFO_KEY]).unwrap();
    assert_eq!(user["name"]["first"], "Ada");
    assert_eq!(user["name"]["last"], "Lovelace");
    assert_eq!(stored[ACCESS_TOKEN_KEY], "token-abc");
}

#[test]
fn open_event_details_accepts_only_visible_events() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let events = vec![
        Event::new(
            "upcoming",
            "Tree planting",
            "",
            Position::new(-23.5, -46.6),
            Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap(),
        Event::new(
            "past",
            "Old drive",
            "",
            Position::new(-23.6, -46.7),
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap(),
    ];
    let visible = select_visible(&events, now);
    let mut auth = AuthenticationContext::new();
    let mut navigator = RouteRecorder::new();
    let mut controller =
        SessionLifecycleController::new(ToggleStore::default(), &mut navigator, &mut auth);

    assert_eq!(
        controller.open_event_details(&visible, "past"),
        Err(NavigationError::UnknownEvent("past".to_string()))
    );
    controller.open_event_details(&visible, "upcoming").unwrap();
    controller.create_event();
    drop(controller);

    assert_eq!(
        navigator.routes(),
        &[
            Route::EventDetails {
                event_id: "upcoming".to_string()
            },
            Route::CreateEvent,
        ]
    );
    assert!(auth.current().is_none());
}

#[test]
fn logout_removes_undecodable_user_info_that_restore_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSessionStore::new(&conn);
    store
        .write_all(&BTreeMap::from([
            (USER_INFO_KEY.to_string(), "garbage".to_string()),
            (ACCESS_TOKEN_KEY.to_string(), "tok".to_string()),
        ]))
        .unwrap();

    let mut auth = AuthenticationContext::new();
    let mut controller = SessionLifecycleController::new(&store, RouteRecorder::new(), &mut auth);
    let restore_err = controller.restore().unwrap_err();
    assert!(matches!(restore_err, StorageError::InvalidData(_)));

    controller.logout().unwrap();
    assert_eq!(controller.navigator().last(), Some(&Route::Login));
    assert!(store.read_all().unwrap().is_empty());
}
