//! Typed error taxonomy for the prediction pipeline.

use std::fmt;
use thiserror::Error;

/// The two artifacts the pipeline depends on.
///
/// Load failures carry this so callers can tell which file is missing
/// or corrupt without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The fitted min-max scaler parameters.
    Scaler,
    /// The trained sequence model (ONNX graph or native LSTM weights).
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => write!(f, "scaler artifact"),
            ArtifactKind::Model => write!(f, "model artifact"),
        }
    }
}

/// Every failure the pipeline can produce.
///
/// `ResourceLoad` is fatal to the session: nothing can be predicted
/// without both artifacts. The other two kinds end only the prediction
/// that triggered them.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An artifact is missing or corrupt at every configured location.
    #[error("failed to load {artifact}: {reason}")]
    ResourceLoad {
        artifact: ArtifactKind,
        reason: String,
    },

    /// Input dimensions do not match what the scaler or model expects.
    #[error("invalid input shape: {reason}")]
    Shape { reason: String },

    /// The underlying inference call failed at runtime.
    #[error("inference failed: {reason}")]
    Inference { reason: String },
}

impl PipelineError {
    pub fn resource_load(artifact: ArtifactKind, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            artifact,
            reason: reason.into(),
        }
    }

    pub fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }

    pub fn inference(reason: impl Into<String>) -> Self {
        Self::Inference {
            reason: reason.into(),
        }
    }

    /// The artifact a load failure refers to, if this is one.
    pub fn artifact(&self) -> Option<ArtifactKind> {
        match self {
            Self::ResourceLoad { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_artifact() {
        let err = PipelineError::resource_load(ArtifactKind::Scaler, "no such file");
        assert_eq!(err.artifact(), Some(ArtifactKind::Scaler));
        assert!(err.to_string().contains("scaler artifact"));

        let err = PipelineError::resource_load(ArtifactKind::Model, "no such file");
        assert_eq!(err.artifact(), Some(ArtifactKind::Model));
        assert!(err.to_string().contains("model artifact"));
    }

    #[test]
    fn test_shape_error_display() {
        let err = PipelineError::shape("expected exactly 7 rows, got 6");
        assert!(err.to_string().starts_with("invalid input shape"));
        assert_eq!(err.artifact(), None);
    }
}
