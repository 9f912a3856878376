//! LingoBridge backend: translation marketplace matching, assignment, and
//! wallet ledger.
//!
//! The crate is organised hexagonally: `domain` holds entities, pure
//! algorithms, and the driving services; `outbound` holds the driven
//! adapters behind the domain's ports; `api` is the Actix Web inbound
//! adapter.

pub mod api;
pub mod config;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware.
pub use middleware::Trace;
