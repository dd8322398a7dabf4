//! # Ovenwatch
//!
//! Live finish-time prediction service for a bank of parallel rotisserie
//! ovens.
//!
//! The crate predicts when each oven will next finish a batch by combining
//! learned per-oven estimators with deterministic business rules: store
//! operating hours, a last-call cutoff before closing, and manual
//! corrections reported by staff. Connected observers are notified whenever
//! a manual report changes the live state.
//!
//! ## Architecture
//!
//! - [`models`]: store-zone time handling and the operating-hours calendar
//! - [`services`]: the prediction chain engine, adjustment rules, model
//!   registry trait, live state, and observer hub
//! - [`api`]: identifier and DTO types shared across layers
//! - [`config`]: environment-variable configuration
//! - [`http`]: axum-based REST API and SSE update stream (feature-gated)

pub mod api;
pub mod config;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
