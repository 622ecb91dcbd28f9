//! Prediction result produced by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A next-day temperature prediction.
///
/// Carries the input temperature trend so the caller can render a chart
/// next to the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Unique forecast identifier.
    pub forecast_id: String,

    /// Predicted next-day temperature in °C.
    pub celsius: f64,

    /// Temperature channel of the input window, oldest first.
    pub input_trend: Vec<f64>,

    /// Prediction timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Forecast {
    /// Create a new forecast.
    pub fn new(celsius: f64, input_trend: Vec<f64>) -> Self {
        Self {
            forecast_id: uuid::Uuid::new_v4().to_string(),
            celsius,
            input_trend,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for Forecast {
    /// Renders the physical-unit value with exactly two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} °C", self.celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        let forecast = Forecast::new(32.104, vec![30.0, 31.2]);
        assert_eq!(forecast.to_string(), "32.10 °C");

        let forecast = Forecast::new(9.0, vec![]);
        assert_eq!(forecast.to_string(), "9.00 °C");
    }

    #[test]
    fn test_forecast_serialization() {
        let forecast = Forecast::new(31.9, vec![30.0, 31.2, 29.8]);

        let json = serde_json::to_string(&forecast).unwrap();
        let deserialized: Forecast = serde_json::from_str(&json).unwrap();

        assert_eq!(forecast.forecast_id, deserialized.forecast_id);
        assert_eq!(forecast.celsius, deserialized.celsius);
        assert_eq!(forecast.input_trend, deserialized.input_trend);
    }
}
