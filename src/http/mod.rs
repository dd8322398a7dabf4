//! HTTP server module.
//!
//! Axum-based REST surface over the serving core. The HTTP layer does
//! request parsing, validation, and JSON serialization only; all business
//! logic lives in the service layer, and the SSE updates endpoint is fed by
//! the observer hub.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
