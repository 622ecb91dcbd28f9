//! Configuration management for the prediction pipeline.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Inference backend for the deployed model artifact.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// ONNX graph executed through an ort session.
    #[default]
    Onnx,
    /// Native LSTM weights executed in-process.
    Lstm,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub deployment: DeploymentConfig,
    pub logging: LoggingConfig,
}

/// Where the scaler and model artifacts live on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Ordered candidate directories; the loader tries each in turn and
    /// fails only when all are exhausted.
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<String>,
    /// Scaler parameter file name (JSON).
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    /// Model file name (.onnx graph, or LSTM weight JSON for the native backend).
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Number of intra-op threads for ONNX inference (default: 1).
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Deployment-variant configuration.
///
/// The shipped deployments use either 1 feature per time step
/// (temperature only) or 4 (temperature, humidity, wind speed,
/// pressure). The width must match what the scaler and model were
/// fitted on.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub backend: ModelBackend,
    /// Features per time step.
    #[serde(default = "default_features")]
    pub features: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (json, pretty).
    pub format: String,
}

fn default_search_dirs() -> Vec<String> {
    vec!["model".to_string(), ".".to_string()]
}

fn default_scaler_file() -> String {
    "scaler.json".to_string()
}

fn default_model_file() -> String {
    "model.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_features() -> usize {
    1
}

impl AppConfig {
    /// Load configuration from the default file location.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig {
                search_dirs: default_search_dirs(),
                scaler_file: default_scaler_file(),
                model_file: default_model_file(),
                onnx_threads: 1,
            },
            deployment: DeploymentConfig {
                backend: ModelBackend::Onnx,
                features: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifacts.search_dirs, vec!["model", "."]);
        assert_eq!(config.artifacts.scaler_file, "scaler.json");
        assert_eq!(config.artifacts.onnx_threads, 1);
        assert_eq!(config.deployment.backend, ModelBackend::Onnx);
        assert_eq!(config.deployment.features, 1);
    }

    #[test]
    fn test_backend_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: ModelBackend,
        }

        let w: Wrapper = serde_json::from_str(r#"{"backend": "lstm"}"#).unwrap();
        assert_eq!(w.backend, ModelBackend::Lstm);

        let w: Wrapper = serde_json::from_str(r#"{"backend": "onnx"}"#).unwrap();
        assert_eq!(w.backend, ModelBackend::Onnx);
    }
}
