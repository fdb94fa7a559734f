//! Presentation adapters over the shared event feed.
//!
//! # Responsibility
//! - Turn a visible set (and region) into host-ready view models.
//! - Stay stateless: every view is rebuilt from the feed on demand.
//!
//! # Invariants
//! - List and map always describe the same visible set, in the same order.

pub mod list;
pub mod map;

use crate::session::auth_context::AuthenticationContext;

/// Header line shown above both presentations for a signed-in user.
pub fn greeting(auth: &AuthenticationContext) -> Option<String> {
    auth.current()
        .map(|session| format!("Welcome, {}!", session.user.display_name()))
}
