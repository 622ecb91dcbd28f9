//! Observation window fed into the sequence model.

use crate::error::PipelineError;

/// Time steps per window. Models are trained on exactly this many days
/// of history.
pub const WINDOW_LEN: usize = 7;

/// An ordered sequence of exactly [`WINDOW_LEN`] daily observations.
///
/// Every row carries the same feature count; channel 0 is always
/// temperature (°C). Rows are ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationWindow {
    rows: Vec<Vec<f64>>,
}

impl ObservationWindow {
    /// Build a window from raw observation rows.
    ///
    /// Fails with a shape error on any row count other than
    /// [`WINDOW_LEN`] or on ragged rows; input is never truncated or
    /// padded.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, PipelineError> {
        if rows.len() != WINDOW_LEN {
            return Err(PipelineError::shape(format!(
                "expected exactly {} rows, got {}",
                WINDOW_LEN,
                rows.len()
            )));
        }

        let width = rows[0].len();
        if width == 0 {
            return Err(PipelineError::shape("rows carry no features"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PipelineError::shape(format!(
                    "row {} has {} features, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }

        Ok(Self { rows })
    }

    /// Build a temperature-only window (the single-feature deployment).
    pub fn from_temperatures(temps: &[f64]) -> Result<Self, PipelineError> {
        Self::new(temps.iter().map(|&t| vec![t]).collect())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Features per time step.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// The temperature channel, oldest first.
    pub fn temperatures(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row[0]).collect()
    }
}
