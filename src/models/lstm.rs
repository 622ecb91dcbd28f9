//! Native LSTM backend executed in-process.
//!
//! The weight artifact is JSON: flattened gate kernels in i, f, g, o
//! order plus a dense head, exported by the training side alongside the
//! scaler.

use crate::error::{ArtifactKind, PipelineError};
use crate::models::SequenceModel;
use crate::preprocessor::WindowTensor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Fitted parameters of a single-layer LSTM with a scalar dense head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmWeights {
    pub input_size: usize,
    pub hidden_size: usize,
    /// Input-to-hidden kernel, (4 * hidden, input) row-major, gates i, f, g, o.
    pub w_ih: Vec<f32>,
    /// Hidden-to-hidden kernel, (4 * hidden, hidden) row-major.
    pub w_hh: Vec<f32>,
    /// Input-to-hidden bias, 4 * hidden.
    pub b_ih: Vec<f32>,
    /// Hidden-to-hidden bias, 4 * hidden.
    pub b_hh: Vec<f32>,
    /// Dense head kernel, hidden.
    pub w_out: Vec<f32>,
    /// Dense head bias.
    pub b_out: f32,
}

impl LstmWeights {
    /// Check that every tensor has the length its declared sizes imply.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let gates = 4 * self.hidden_size;
        let checks = [
            ("w_ih", self.w_ih.len(), gates * self.input_size),
            ("w_hh", self.w_hh.len(), gates * self.hidden_size),
            ("b_ih", self.b_ih.len(), gates),
            ("b_hh", self.b_hh.len(), gates),
            ("w_out", self.w_out.len(), self.hidden_size),
        ];
        for (name, actual, expected) in checks {
            if actual != expected {
                return Err(PipelineError::resource_load(
                    ArtifactKind::Model,
                    format!("{} has {} elements, expected {}", name, actual, expected),
                ));
            }
        }
        Ok(())
    }
}

/// A sequence model backed by native LSTM math.
#[derive(Debug)]
pub struct LstmModel {
    weights: LstmWeights,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl LstmModel {
    /// Deserialize weights from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        info!(path = %path.display(), "Loading LSTM weights");

        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::resource_load(
                ArtifactKind::Model,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        let weights: LstmWeights = serde_json::from_str(&raw).map_err(|e| {
            PipelineError::resource_load(
                ArtifactKind::Model,
                format!("malformed LSTM weights in {}: {}", path.display(), e),
            )
        })?;

        Self::from_weights(weights)
    }

    /// Build a model from already-validated weights.
    pub fn from_weights(weights: LstmWeights) -> Result<Self, PipelineError> {
        weights.validate()?;
        info!(
            input_size = weights.input_size,
            hidden_size = weights.hidden_size,
            "LSTM model ready"
        );
        Ok(Self { weights })
    }

    fn step(&self, x: &[f32], h: &mut [f32], c: &mut [f32]) {
        let w = &self.weights;
        let hidden = w.hidden_size;
        let input = w.input_size;

        let mut pre = vec![0.0f32; 4 * hidden];
        for (r, pre_r) in pre.iter_mut().enumerate() {
            let mut acc = w.b_ih[r] + w.b_hh[r];
            let ih_row = &w.w_ih[r * input..(r + 1) * input];
            for (j, &xj) in x.iter().enumerate() {
                acc += ih_row[j] * xj;
            }
            let hh_row = &w.w_hh[r * hidden..(r + 1) * hidden];
            for (k, &hk) in h.iter().enumerate() {
                acc += hh_row[k] * hk;
            }
            *pre_r = acc;
        }

        for k in 0..hidden {
            let i = sigmoid(pre[k]);
            let f = sigmoid(pre[hidden + k]);
            let g = pre[2 * hidden + k].tanh();
            let o = sigmoid(pre[3 * hidden + k]);

            c[k] = f * c[k] + i * g;
            h[k] = o * c[k].tanh();
        }
    }
}

impl SequenceModel for LstmModel {
    fn predict(&mut self, input: &WindowTensor) -> Result<Vec<f32>, PipelineError> {
        let [_, timesteps, features] = input.shape;
        if features != self.weights.input_size {
            return Err(PipelineError::inference(format!(
                "input has {} features per step but the model expects {}",
                features, self.weights.input_size
            )));
        }
        if input.data.len() != timesteps * features {
            return Err(PipelineError::inference(format!(
                "tensor data has {} elements, shape implies {}",
                input.data.len(),
                timesteps * features
            )));
        }

        let mut h = vec![0.0f32; self.weights.hidden_size];
        let mut c = vec![0.0f32; self.weights.hidden_size];

        for t in 0..timesteps {
            let x = &input.data[t * features..(t + 1) * features];
            self.step(x, &mut h, &mut c);
        }

        let out = self.weights.b_out
            + self
                .weights
                .w_out
                .iter()
                .zip(&h)
                .map(|(w, hk)| w * hk)
                .sum::<f32>();

        Ok(vec![out])
    }

    fn name(&self) -> &'static str {
        "lstm"
    }
}

/// All-zero weights with a given head bias; test scaffolding shared
/// with the engine tests.
#[cfg(test)]
pub(crate) fn zero_weights(input_size: usize, hidden_size: usize, b_out: f32) -> LstmWeights {
    let gates = 4 * hidden_size;
    LstmWeights {
        input_size,
        hidden_size,
        w_ih: vec![0.0; gates * input_size],
        w_hh: vec![0.0; gates * hidden_size],
        b_ih: vec![0.0; gates],
        b_hh: vec![0.0; gates],
        w_out: vec![0.0; hidden_size],
        b_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(timesteps: usize, features: usize, fill: f32) -> WindowTensor {
        WindowTensor {
            shape: [1, timesteps, features],
            data: vec![fill; timesteps * features],
        }
    }

    #[test]
    fn test_zero_weights_output_is_bias() {
        // All-zero gates keep the cell state at zero, so the head bias
        // passes straight through.
        let mut model = LstmModel::from_weights(zero_weights(1, 4, 0.42)).unwrap();
        let out = model.predict(&tensor(7, 1, 0.5)).unwrap();
        assert_eq!(out, vec![0.42]);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let mut weights = zero_weights(1, 3, 0.1);
        // Arbitrary fixed weights; the values themselves do not matter.
        for (i, w) in weights.w_ih.iter_mut().enumerate() {
            *w = (i as f32 * 0.37).sin() * 0.5;
        }
        for (i, w) in weights.w_hh.iter_mut().enumerate() {
            *w = (i as f32 * 0.11).cos() * 0.3;
        }
        for (i, w) in weights.w_out.iter_mut().enumerate() {
            *w = 0.2 + i as f32 * 0.05;
        }

        let mut model = LstmModel::from_weights(weights).unwrap();
        let input = WindowTensor {
            shape: [1, 7, 1],
            data: vec![0.50, 0.56, 0.49, 0.655, 0.60, 0.575, 0.625],
        };

        let first = model.predict(&input).unwrap();
        let second = model.predict(&input).unwrap();
        assert_eq!(first, second);
        assert!(first[0].is_finite());
    }

    #[test]
    fn test_feature_mismatch_is_inference_error() {
        let mut model = LstmModel::from_weights(zero_weights(4, 2, 0.0)).unwrap();
        let err = model.predict(&tensor(7, 1, 0.5)).unwrap_err();
        assert!(matches!(err, PipelineError::Inference { .. }));
    }

    #[test]
    fn test_malformed_weights_rejected() {
        let mut weights = zero_weights(1, 2, 0.0);
        weights.w_out.pop();
        let err = LstmModel::from_weights(weights).unwrap_err();
        assert_eq!(err.artifact(), Some(ArtifactKind::Model));
    }
}
