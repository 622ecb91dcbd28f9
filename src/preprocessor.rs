//! Window normalization and tensor shaping for model inference.
//!
//! Sits on both sides of the model call: the forward path scales the
//! raw 7×F window and reshapes it into the rank-3 float32 input the
//! sequence models expect, and the inverse path maps a scaled model
//! output back to °C.

use crate::error::PipelineError;
use crate::scaler::MinMaxScaler;
use crate::types::observation::ObservationWindow;

/// Rank-3 model input: batch of 1, one row per time step.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTensor {
    /// (batch, timesteps, features)
    pub shape: [usize; 3],
    /// Row-major scaled values.
    pub data: Vec<f32>,
}

/// Transforms observation windows into model inputs and model outputs
/// back into physical units.
pub struct Preprocessor;

impl Preprocessor {
    /// Create a new preprocessor.
    pub fn new() -> Self {
        Self
    }

    /// Scale a raw window and reshape it to (1, 7, F) float32.
    ///
    /// The scaler width must match the window width; anything else is a
    /// shape error before the model is ever invoked.
    pub fn to_model_input(
        &self,
        window: &ObservationWindow,
        scaler: &MinMaxScaler,
    ) -> Result<WindowTensor, PipelineError> {
        if window.width() != scaler.width() {
            return Err(PipelineError::shape(format!(
                "window has {} features per row but the scaler was fitted on {}",
                window.width(),
                scaler.width()
            )));
        }

        let scaled = scaler.transform(window.rows())?;
        let timesteps = scaled.len();
        let features = window.width();

        let data: Vec<f32> = scaled
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect();

        Ok(WindowTensor {
            shape: [1, timesteps, features],
            data,
        })
    }

    /// Map a scaled model output back to a temperature in °C.
    ///
    /// The inverse transform needs the scaler's full fitted width, so
    /// for multi-feature scalers the remaining channels are zero-filled
    /// and only channel 0 is read back. Valid because the inverse is
    /// per-channel affine.
    pub fn to_celsius(
        &self,
        scaled_prediction: f32,
        scaler: &MinMaxScaler,
    ) -> Result<f64, PipelineError> {
        let mut row = vec![0.0; scaler.width()];
        row[0] = scaled_prediction as f64;
        let restored = scaler.inverse_transform(&[row])?;
        Ok(restored[0][0])
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature_scaler() -> MinMaxScaler {
        MinMaxScaler::new((0.0, 1.0), vec![20.0], vec![40.0]).unwrap()
    }

    #[test]
    fn test_tensor_shape_and_values() {
        let scaler = temperature_scaler();
        let window =
            ObservationWindow::from_temperatures(&[30.0, 31.2, 29.8, 33.1, 32.0, 31.5, 32.5])
                .unwrap();

        let tensor = Preprocessor::new().to_model_input(&window, &scaler).unwrap();

        assert_eq!(tensor.shape, [1, 7, 1]);
        assert_eq!(tensor.data.len(), 7);
        // 30.0 over the fitted range [20, 40] scales to 0.5
        assert!((tensor.data[0] - 0.5).abs() < 1e-6);
        assert!(tensor.data.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_width_mismatch_rejected_before_inference() {
        let scaler = temperature_scaler();
        let rows: Vec<Vec<f64>> = (0..7).map(|_| vec![30.0, 60.0, 10.0, 1012.0]).collect();
        let window = ObservationWindow::new(rows).unwrap();

        let err = Preprocessor::new()
            .to_model_input(&window, &scaler)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn test_to_celsius_single_channel() {
        let scaler = temperature_scaler();
        let celsius = Preprocessor::new().to_celsius(0.5, &scaler).unwrap();
        assert!((celsius - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_celsius_zero_fill_matches_full_inverse() {
        let scaler = MinMaxScaler::new(
            (0.0, 1.0),
            vec![20.0, 30.0, 0.0, 990.0],
            vec![40.0, 95.0, 25.0, 1035.0],
        )
        .unwrap();

        // Scale a real observation, then invert the temperature channel
        // two ways: zero-filled and with the true channel values.
        let scaled = scaler
            .transform(&[vec![33.1, 55.0, 10.0, 1012.0]])
            .unwrap();

        let via_pipeline = Preprocessor::new()
            .to_celsius(scaled[0][0] as f32, &scaler)
            .unwrap();
        let via_full_inverse = scaler.inverse_transform(&scaled).unwrap()[0][0];

        // f32 narrowing in the pipeline path bounds the agreement
        assert!((via_pipeline - via_full_inverse).abs() < 1e-5);
    }
}
