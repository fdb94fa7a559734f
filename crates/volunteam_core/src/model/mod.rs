//! Domain model for events and sessions.
//!
//! # Responsibility
//! - Define canonical data structures used by the engine.
//! - Own parsing of the external dataset and session store shapes.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - Session credentials are opaque to everything but the store.

pub mod event;
pub mod session;
