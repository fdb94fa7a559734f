//! Session lifecycle orchestration.
//!
//! # Responsibility
//! - Keep the in-memory session and the durable store in agreement.
//! - Emit navigation intents for logout, event creation and event details.
//!
//! # Invariants
//! - Store first, memory second: a failed store step never changes the
//!   in-memory session and never navigates.
//! - `logout` completes remove-keys, clear, navigate in that order.
//! - Detail navigation only targets events in the current visible set.

use crate::engine::visibility::VisibleSet;
use crate::model::session::{
    AccessToken, Session, UserInfo, ACCESS_TOKEN_KEY, SESSION_KEYS, USER_INFO_KEY,
};
use crate::session::auth_context::AuthenticationContext;
use crate::session::navigation::{NavigationError, Navigator, Route};
use crate::store::session_store::{SessionStore, StorageError, StoreResult};
use log::{info, warn};
use std::collections::BTreeMap;

/// Single writer of [`AuthenticationContext`].
///
/// Holds the context by exclusive borrow, so no other component can mutate
/// the session while a controller is alive.
pub struct SessionLifecycleController<'auth, S: SessionStore, N: Navigator> {
    store: S,
    navigator: N,
    auth: &'auth mut AuthenticationContext,
}

impl<'auth, S: SessionStore, N: Navigator> SessionLifecycleController<'auth, S, N> {
    pub fn new(store: S, navigator: N, auth: &'auth mut AuthenticationContext) -> Self {
        Self {
            store,
            navigator,
            auth,
        }
    }

    /// Read access to the session while the controller holds the context.
    pub fn auth(&self) -> &AuthenticationContext {
        &*self.auth
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Startup restore: mirrors the stored session into memory.
    ///
    /// A store holding only one of the two session keys is treated as signed
    /// out.
    ///
    /// # Errors
    /// - Store read failures, or an undecodable `userInfo`; the in-memory
    ///   session is left unchanged.
    pub fn restore(&mut self) -> StoreResult<Option<&Session>> {
        let entries = self.store.read_all()?;
        let user_info = entries.get(USER_INFO_KEY);
        let access_token = entries.get(ACCESS_TOKEN_KEY);

        match (user_info, access_token) {
            (Some(user_info), Some(access_token)) => {
                let session = decode_session(user_info, access_token)?;
                self.auth.set(session);
                info!("event=session_restore module=session status=ok restored=true");
            }
            (None, None) => {
                self.auth.clear();
                info!("event=session_restore module=session status=ok restored=false");
            }
            (user_info, access_token) => {
                self.auth.clear();
                warn!(
                    "event=session_restore module=session status=partial has_user_info={} has_access_token={}",
                    user_info.is_some(),
                    access_token.is_some()
                );
            }
        }

        Ok(self.auth.current())
    }

    /// Persists a session obtained by the external login flow, then adopts it.
    ///
    /// # Errors
    /// - Store write failures; the in-memory session is left unchanged.
    pub fn sign_in(&mut self, session: Session) -> StoreResult<()> {
        let user_info = serde_json::to_string(&session.user).map_err(|err| {
            StorageError::InvalidData(format!("failed to encode userInfo: {err}"))
        })?;
        let entries = BTreeMap::from([
            (USER_INFO_KEY.to_string(), user_info),
            (
                ACCESS_TOKEN_KEY.to_string(),
                session.access_token.expose().to_string(),
            ),
        ]);

        self.store.write_all(&entries)?;
        self.auth.set(session);
        info!("event=session_sign_in module=session status=ok");
        Ok(())
    }

    /// Ends the session: clears the store, clears memory, routes to login.
    ///
    /// # Errors
    /// - Store removal failures. The in-memory session stays as it was and
    ///   no navigation happens, so the UI keeps matching durable state.
    pub fn logout(&mut self) -> StoreResult<()> {
        info!("event=session_logout module=session status=start");
        if let Err(err) = self.store.remove_keys(&SESSION_KEYS) {
            warn!(
                "event=session_logout module=session status=error error_code={} error={}",
                err.code(),
                err
            );
            return Err(err);
        }

        self.auth.clear();
        self.navigator.navigate_to(Route::Login);
        info!("event=session_logout module=session status=ok");
        Ok(())
    }

    /// Routes to the event creation screen.
    pub fn create_event(&mut self) {
        self.navigator.navigate_to(Route::CreateEvent);
    }

    /// Routes to the details of a visible event.
    ///
    /// # Errors
    /// - `UnknownEvent` when `event_id` is not in `visible`.
    pub fn open_event_details(
        &mut self,
        visible: &VisibleSet<'_>,
        event_id: &str,
    ) -> Result<(), NavigationError> {
        if !visible.contains(event_id) {
            warn!(
                "event=open_event_details module=session status=rejected event_id={event_id}"
            );
            return Err(NavigationError::UnknownEvent(event_id.to_string()));
        }

        self.navigator.navigate_to(Route::EventDetails {
            event_id: event_id.to_string(),
        });
        Ok(())
    }
}

fn decode_session(user_info: &str, access_token: &str) -> StoreResult<Session> {
    let user: UserInfo = serde_json::from_str(user_info)
        .map_err(|err| StorageError::InvalidData(format!("malformed {USER_INFO_KEY}: {err}")))?;
    if access_token.trim().is_empty() {
        return Err(StorageError::InvalidData(format!(
            "empty {ACCESS_TOKEN_KEY}"
        )));
    }
    Ok(Session::new(user, AccessToken::new(access_token)))
}
