//! Pre-fitted min-max scaler for observation normalization.
//!
//! The scaler is fitted outside this codebase during model training and
//! shipped as a JSON artifact carrying `data_min`/`data_max` per channel
//! and the target feature range. Both directions are per-channel affine:
//! each channel maps through its own minimum and maximum only.

use crate::error::{ArtifactKind, PipelineError};
use serde::{Deserialize, Serialize};

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Min-max normalization transform with forward and inverse operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Target range the fitted data maps onto.
    #[serde(default = "default_feature_range")]
    feature_range: (f64, f64),
    /// Per-channel minimum observed during fitting.
    data_min: Vec<f64>,
    /// Per-channel maximum observed during fitting.
    data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Build a scaler from fitted parameters.
    pub fn new(
        feature_range: (f64, f64),
        data_min: Vec<f64>,
        data_max: Vec<f64>,
    ) -> Result<Self, PipelineError> {
        let scaler = Self {
            feature_range,
            data_min,
            data_max,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check internal consistency of the fitted parameters.
    ///
    /// Called after deserializing the artifact, since serde does not go
    /// through [`MinMaxScaler::new`].
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.data_min.is_empty() {
            return Err(PipelineError::resource_load(
                ArtifactKind::Scaler,
                "scaler has no channels",
            ));
        }
        if self.data_min.len() != self.data_max.len() {
            return Err(PipelineError::resource_load(
                ArtifactKind::Scaler,
                format!(
                    "data_min has {} channels but data_max has {}",
                    self.data_min.len(),
                    self.data_max.len()
                ),
            ));
        }
        if self.feature_range.1 <= self.feature_range.0 {
            return Err(PipelineError::resource_load(
                ArtifactKind::Scaler,
                format!(
                    "feature_range ({}, {}) is not increasing",
                    self.feature_range.0, self.feature_range.1
                ),
            ));
        }
        Ok(())
    }

    /// Number of channels the scaler was fitted on.
    pub fn width(&self) -> usize {
        self.data_min.len()
    }

    // Constant channels get a unit divisor, matching how scikit-learn's
    // MinMaxScaler treats zero-range features.
    fn scale_of(&self, channel: usize) -> f64 {
        let span = self.data_max[channel] - self.data_min[channel];
        let denom = if span == 0.0 { 1.0 } else { span };
        (self.feature_range.1 - self.feature_range.0) / denom
    }

    /// Map physical units onto the fitted feature range.
    ///
    /// Values outside the fitted distribution extrapolate without error.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PipelineError> {
        self.check_width(rows)?;
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(ch, &x)| {
                        self.feature_range.0 + (x - self.data_min[ch]) * self.scale_of(ch)
                    })
                    .collect()
            })
            .collect())
    }

    /// Map scaled values back to physical units; exact left inverse of
    /// [`MinMaxScaler::transform`] over the fitted domain.
    pub fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PipelineError> {
        self.check_width(rows)?;
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(ch, &scaled)| {
                        self.data_min[ch] + (scaled - self.feature_range.0) / self.scale_of(ch)
                    })
                    .collect()
            })
            .collect())
    }

    fn check_width(&self, rows: &[Vec<f64>]) -> Result<(), PipelineError> {
        let width = self.width();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PipelineError::shape(format!(
                    "row {} has {} features but the scaler was fitted on {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature_scaler() -> MinMaxScaler {
        MinMaxScaler::new((0.0, 1.0), vec![20.0], vec![40.0]).unwrap()
    }

    fn weather_scaler() -> MinMaxScaler {
        // temperature, humidity, wind speed, pressure
        MinMaxScaler::new(
            (0.0, 1.0),
            vec![20.0, 30.0, 0.0, 990.0],
            vec![40.0, 95.0, 25.0, 1035.0],
        )
        .unwrap()
    }

    #[test]
    fn test_transform_known_values() {
        let scaler = temperature_scaler();
        let scaled = scaler.transform(&[vec![20.0], vec![30.0], vec![40.0]]).unwrap();
        for (got, want) in scaled.iter().zip([0.0, 0.5, 1.0]) {
            assert!((got[0] - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip_single_channel() {
        let scaler = temperature_scaler();
        let window: Vec<Vec<f64>> = [30.0, 31.2, 29.8, 33.1, 32.0, 31.5, 32.5]
            .iter()
            .map(|&t| vec![t])
            .collect();

        let restored = scaler
            .inverse_transform(&scaler.transform(&window).unwrap())
            .unwrap();

        for (orig, back) in window.iter().zip(&restored) {
            assert!((orig[0] - back[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_round_trip_four_channels() {
        let scaler = weather_scaler();
        let window = vec![
            vec![30.0, 65.0, 12.0, 1011.0],
            vec![31.2, 60.0, 8.5, 1013.0],
            vec![29.8, 72.0, 15.0, 1009.5],
            vec![33.1, 55.0, 10.0, 1012.0],
            vec![32.0, 58.0, 11.5, 1014.0],
            vec![31.5, 62.0, 9.0, 1010.0],
            vec![32.5, 57.0, 13.0, 1012.5],
        ];

        let restored = scaler
            .inverse_transform(&scaler.transform(&window).unwrap())
            .unwrap();

        for (orig, back) in window.iter().zip(&restored) {
            for (a, b) in orig.iter().zip(back) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_inverse_is_per_channel_affine() {
        // The zero-fill trick in postprocessing is only correct if each
        // channel's inverse depends on its own scaled value alone.
        let scaler = weather_scaler();
        let scaled = scaler
            .transform(&[vec![33.1, 55.0, 10.0, 1012.0]])
            .unwrap();

        let full = scaler.inverse_transform(&scaled).unwrap();
        let zero_filled = scaler
            .inverse_transform(&[vec![scaled[0][0], 0.0, 0.0, 0.0]])
            .unwrap();

        assert!((full[0][0] - zero_filled[0][0]).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        let scaler = temperature_scaler();
        let scaled = scaler.transform(&[vec![50.0]]).unwrap();
        assert!(scaled[0][0] > 1.0);
        let back = scaler.inverse_transform(&scaled).unwrap();
        assert!((back[0][0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_range_channel() {
        let scaler = MinMaxScaler::new((0.0, 1.0), vec![25.0], vec![25.0]).unwrap();
        let scaled = scaler.transform(&[vec![25.0]]).unwrap();
        assert_eq!(scaled[0][0], 0.0);
        let back = scaler.inverse_transform(&scaled).unwrap();
        assert_eq!(back[0][0], 25.0);
    }

    #[test]
    fn test_width_mismatch_is_shape_error() {
        let scaler = temperature_scaler();
        let err = scaler.transform(&[vec![30.0, 65.0]]).unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn test_inconsistent_params_rejected() {
        let err = MinMaxScaler::new((0.0, 1.0), vec![20.0, 30.0], vec![40.0]).unwrap_err();
        assert_eq!(err.artifact(), Some(ArtifactKind::Scaler));
    }

    #[test]
    fn test_artifact_json_round_trip() {
        let scaler = weather_scaler();
        let json = serde_json::to_string(&scaler).unwrap();
        let restored: MinMaxScaler = serde_json::from_str(&json).unwrap();
        restored.validate().unwrap();
        assert_eq!(restored.width(), 4);
    }
}
