//! Service layer: the prediction engine and its collaborators.
//!
//! The chain engine, adjuster, and registry hold the business logic; the
//! predictor wraps them in process-wide live state and the observer hub
//! fans out change notifications.

pub mod adjuster;
pub mod chain;
pub mod events;
pub mod hub;
pub mod predictor;
pub mod registry;

pub use adjuster::PredictionAdjuster;
pub use chain::{oven_details, ChainError, PredictionChainEngine};
pub use events::BatchEvent;
pub use hub::{ObserverHub, UpdateEvent};
pub use predictor::{PredictionError, PredictionService};
pub use registry::{FinishTableRegistry, ModelError, OvenModelRegistry};
