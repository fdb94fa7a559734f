//! In-memory holder of the signed-in session.
//!
//! # Invariants
//! - Starts with no session.
//! - Only `session::controller` writes; everything else reads through
//!   `current()`.

use crate::model::session::Session;

/// Current authenticated session, owned by the host and lent to the
/// lifecycle controller for writes.
#[derive(Debug, Default)]
pub struct AuthenticationContext {
    current: Option<Session>,
}

impl AuthenticationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn set(&mut self, session: Session) {
        self.current = Some(session);
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
    }
}
