//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns,
//! currently the request-scoped trace identifier.

pub mod trace;

pub use trace::Trace;
