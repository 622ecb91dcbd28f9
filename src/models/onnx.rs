//! ONNX graph backend executed through an ort session.

use crate::error::{ArtifactKind, PipelineError};
use crate::models::SequenceModel;
use crate::preprocessor::WindowTensor;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use tracing::{debug, info};

/// A loaded ONNX model with its discovered tensor names.
pub struct OnnxModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

fn build_session(path: &Path, intra_threads: usize) -> Result<Session, ort::Error> {
    ort::init().commit()?;
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)
}

impl OnnxModel {
    /// Load an ONNX graph from file.
    ///
    /// Input and output tensor names are discovered from the graph
    /// itself rather than configured, so exported models keep working
    /// across converter versions.
    pub fn load(path: &Path, intra_threads: usize) -> Result<Self, PipelineError> {
        info!(path = %path.display(), threads = intra_threads, "Loading ONNX model");

        let session = build_session(path, intra_threads).map_err(|e| {
            PipelineError::resource_load(
                ArtifactKind::Model,
                format!("failed to load ONNX graph from {}: {}", path.display(), e),
            )
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output".to_string())
            });

        info!(
            input = %input_name,
            output = %output_name,
            "ONNX model loaded"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl SequenceModel for OnnxModel {
    fn predict(&mut self, input: &WindowTensor) -> Result<Vec<f32>, PipelineError> {
        let shape: Vec<i64> = input.shape.iter().map(|&d| d as i64).collect();
        let tensor = Tensor::from_array((shape, input.data.clone()))
            .map_err(|e| PipelineError::inference(format!("failed to build input tensor: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![&self.input_name => tensor])
            .map_err(|e| PipelineError::inference(e.to_string()))?;

        if let Some(value) = outputs.get(&self.output_name) {
            if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
                return Ok(data.to_vec());
            }
        }

        // Some exporters rename the head; fall back to the first f32 tensor.
        for (name, value) in outputs.iter() {
            if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
                debug!(output = %name, "Using fallback output tensor");
                return Ok(data.to_vec());
            }
        }

        Err(PipelineError::inference(format!(
            "model produced no f32 tensor output (expected '{}')",
            self.output_name
        )))
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}
