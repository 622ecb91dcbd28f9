//! Temperature Prediction Pipeline Library
//!
//! Turns a 7-day window of weather observations into a next-day
//! temperature prediction by running a pre-fitted min-max scaler and a
//! trained sequence model (ONNX graph or native LSTM), both loaded as
//! opaque artifacts.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod preprocessor;
pub mod scaler;
pub mod types;

pub use config::AppConfig;
pub use error::{ArtifactKind, PipelineError};
pub use models::inference::InferenceEngine;
pub use preprocessor::Preprocessor;
pub use scaler::MinMaxScaler;
pub use types::{forecast::Forecast, observation::ObservationWindow};
