//! Flutter-facing FFI crate for the Volunteam core.
//!
//! Bridge glue is generated by `flutter_rust_bridge_codegen` from `api`.

pub mod api;
