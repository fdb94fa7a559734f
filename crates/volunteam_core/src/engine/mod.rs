//! Pure selection and geometry over loaded events.
//!
//! Nothing here performs I/O or holds long-lived state besides the viewport
//! readiness latch.

pub mod viewport;
pub mod visibility;
