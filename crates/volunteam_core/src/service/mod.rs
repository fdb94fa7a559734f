//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate catalog, filter and viewport calls into use-case APIs.
//! - Keep UI/FFI layers decoupled from engine details.

pub mod event_feed;
