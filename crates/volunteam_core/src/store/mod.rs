//! Durable persistence behind the session lifecycle.
//!
//! # Responsibility
//! - Define the session store contract consumed by `session::controller`.
//! - Isolate SQLite details from session orchestration.

pub mod session_store;
