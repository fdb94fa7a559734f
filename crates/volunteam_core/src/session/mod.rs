//! Authenticated session state and its lifecycle.
//!
//! # Responsibility
//! - Hold the current session in memory (`auth_context`).
//! - Orchestrate restore, sign-in and logout against the store
//!   (`controller`).
//! - Describe navigation intents handed to the host router (`navigation`).

pub mod auth_context;
pub mod controller;
pub mod navigation;
