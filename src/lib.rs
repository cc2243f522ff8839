//! Progress forecasting for students with dyslexia.
//!
//! Telemetry is normalized into a 20-slot vector, pushed through a fixed
//! four-layer feed-forward network and decoded into short, medium and
//! long-term forecasts plus a confidence score. The weights are drawn once per
//! engine from a Xavier-uniform distribution and are never trained.

pub mod analysis;
pub mod batch;
pub mod db;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod models;
pub mod network;
pub mod normalize;
pub mod quality;
pub mod report;
pub mod rng;
pub mod telemetry;
pub mod weights;

pub use engine::PredictionEngine;
pub use models::{PredictionInput, PredictionResult};
pub use rng::WeightPolicy;
