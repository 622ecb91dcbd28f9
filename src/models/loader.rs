//! Artifact resolution and loading.

use crate::config::{AppConfig, ModelBackend};
use crate::error::{ArtifactKind, PipelineError};
use crate::models::{LstmModel, OnnxModel, SequenceModel};
use crate::scaler::MinMaxScaler;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Loads the fitted scaler and the trained model from disk.
///
/// Candidate directories come from configuration as an explicit ordered
/// list; the first directory containing the file wins, and a load fails
/// only when every candidate is exhausted. Both handles are loaded once
/// and live for the life of the engine.
pub struct ResourceLoader {
    search_dirs: Vec<PathBuf>,
    scaler_file: String,
    model_file: String,
    backend: ModelBackend,
    onnx_threads: usize,
}

impl ResourceLoader {
    /// Create a loader from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            search_dirs: config.artifacts.search_dirs.iter().map(PathBuf::from).collect(),
            scaler_file: config.artifacts.scaler_file.clone(),
            model_file: config.artifacts.model_file.clone(),
            backend: config.deployment.backend,
            onnx_threads: config.artifacts.onnx_threads,
        }
    }

    /// Load both artifacts.
    ///
    /// No prediction can proceed without both, so the first failure is
    /// returned as-is; the error names the artifact that failed.
    pub fn load(&self) -> Result<(MinMaxScaler, Box<dyn SequenceModel>), PipelineError> {
        let scaler = self.load_scaler()?;
        let model = self.load_model()?;

        info!(
            scaler_width = scaler.width(),
            backend = model.name(),
            "Artifacts loaded"
        );

        Ok((scaler, model))
    }

    fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|path| path.exists())
    }

    fn not_found(&self, artifact: ArtifactKind, file_name: &str) -> PipelineError {
        let searched: Vec<String> = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(file_name).display().to_string())
            .collect();
        PipelineError::resource_load(
            artifact,
            format!("{} not found; searched {}", file_name, searched.join(", ")),
        )
    }

    fn load_scaler(&self) -> Result<MinMaxScaler, PipelineError> {
        let path = self
            .resolve(&self.scaler_file)
            .ok_or_else(|| self.not_found(ArtifactKind::Scaler, &self.scaler_file))?;

        info!(path = %path.display(), "Loading scaler");

        let raw = fs::read_to_string(&path).map_err(|e| {
            PipelineError::resource_load(
                ArtifactKind::Scaler,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        let scaler: MinMaxScaler = serde_json::from_str(&raw).map_err(|e| {
            PipelineError::resource_load(
                ArtifactKind::Scaler,
                format!("malformed scaler parameters in {}: {}", path.display(), e),
            )
        })?;
        scaler.validate()?;

        Ok(scaler)
    }

    fn load_model(&self) -> Result<Box<dyn SequenceModel>, PipelineError> {
        let path = self
            .resolve(&self.model_file)
            .ok_or_else(|| self.not_found(ArtifactKind::Model, &self.model_file))?;

        match self.backend {
            ModelBackend::Onnx => Ok(Box::new(OnnxModel::load(&path, self.onnx_threads)?)),
            ModelBackend::Lstm => Ok(Box::new(LstmModel::load(&path)?)),
        }
    }
}
