//! Application state for the HTTP server.

use std::sync::Arc;

use crate::models::time::StoreZone;
use crate::services::PredictionService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The serving core: engine, live snapshot, observer hub.
    pub service: Arc<PredictionService>,
    /// Store zone, for stamping wall-clock "now" on each request.
    pub zone: StoreZone,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>) -> Self {
        let zone = service.calendar().zone();
        Self { service, zone }
    }
}
