//! Sequence model backends and inference components

pub mod inference;
pub mod loader;
pub mod lstm;
pub mod onnx;

use crate::error::PipelineError;
use crate::preprocessor::WindowTensor;

pub use inference::InferenceEngine;
pub use loader::ResourceLoader;
pub use lstm::LstmModel;
pub use onnx::OnnxModel;

/// Capability shared by every deployed model: produce a scaled
/// prediction vector from a rank-3 observation tensor.
///
/// Backends differ in runtime (ort session vs. in-process LSTM math)
/// but not in contract; the engine treats them interchangeably.
pub trait SequenceModel: Send + std::fmt::Debug {
    /// Run the model on a (1, timesteps, features) input.
    ///
    /// Returns the scaled outputs; index 0 is the temperature channel.
    fn predict(&mut self, input: &WindowTensor) -> Result<Vec<f32>, PipelineError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
