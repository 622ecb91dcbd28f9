//! Inference engine tying the pipeline stages together.

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::loader::ResourceLoader;
use crate::models::SequenceModel;
use crate::preprocessor::Preprocessor;
use crate::scaler::MinMaxScaler;
use crate::types::forecast::Forecast;
use crate::types::observation::ObservationWindow;
use std::sync::RwLock;
use tracing::{debug, info};

/// Runs the full prediction chain: scale, reshape, infer, invert.
///
/// Owns the process-lifetime resource handles. Construct it once at
/// startup and pass it by reference into every interaction; the scaler
/// and model are never reloaded.
pub struct InferenceEngine {
    scaler: MinMaxScaler,
    /// ort sessions need `&mut` to run, so the model sits behind a lock
    /// even though predictions are strictly sequential.
    model: RwLock<Box<dyn SequenceModel>>,
    preprocessor: Preprocessor,
}

impl InferenceEngine {
    /// Load artifacts per configuration and build the engine.
    pub fn new(config: &AppConfig) -> Result<Self, PipelineError> {
        let (scaler, model) = ResourceLoader::from_config(config).load()?;

        info!(
            backend = model.name(),
            features = scaler.width(),
            "Inference engine initialized"
        );

        Ok(Self::from_parts(scaler, model))
    }

    /// Build an engine from already-loaded handles.
    pub fn from_parts(scaler: MinMaxScaler, model: Box<dyn SequenceModel>) -> Self {
        Self {
            scaler,
            model: RwLock::new(model),
            preprocessor: Preprocessor::new(),
        }
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Predict the next-day temperature from a 7-day window.
    pub fn predict(&self, window: &ObservationWindow) -> Result<Forecast, PipelineError> {
        let input = self.preprocessor.to_model_input(window, &self.scaler)?;

        let scaled = {
            let mut model = self
                .model
                .write()
                .map_err(|e| PipelineError::inference(format!("model lock poisoned: {}", e)))?;
            model.predict(&input)?
        };

        let scaled_temp = scaled.first().copied().ok_or_else(|| {
            PipelineError::inference("model returned an empty output")
        })?;

        let celsius = self.preprocessor.to_celsius(scaled_temp, &self.scaler)?;

        debug!(
            scaled = scaled_temp,
            celsius = celsius,
            "Prediction complete"
        );

        Ok(Forecast::new(celsius, window.temperatures()))
    }
}
