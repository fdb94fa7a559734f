//! Navigation intents emitted by the session controller.

use crate::model::event::EventId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Screen transition requested from the host router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry screen.
    Login,
    CreateEvent,
    EventDetails { event_id: EventId },
}

impl Route {
    /// Router screen identifier.
    pub fn screen_id(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::CreateEvent => "CreateEvent",
            Self::EventDetails { .. } => "EventDetails",
        }
    }

    /// Router parameters, keyed the way host screens read them.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        if let Self::EventDetails { event_id } = self {
            params.insert("eventId", event_id.clone());
        }
        params
    }
}

/// Host router adapter.
pub trait Navigator {
    fn navigate_to(&mut self, route: Route);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn navigate_to(&mut self, route: Route) {
        (**self).navigate_to(route);
    }
}

/// Navigator that keeps every requested route, for hosts that pull intents
/// after a call (FFI, CLI) and for tests.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    routes: Vec<Route>,
}

impl RouteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn last(&self) -> Option<&Route> {
        self.routes.last()
    }
}

impl Navigator for RouteRecorder {
    fn navigate_to(&mut self, route: Route) {
        self.routes.push(route);
    }
}

/// Rejected navigation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The id is not part of the currently visible set.
    UnknownEvent(EventId),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEvent(id) => write!(f, "event is not visible: {id}"),
        }
    }
}

impl Error for NavigationError {}
