//! Temperature Prediction Pipeline - Main Entry Point
//!
//! Plays the role of the form surface: collects a 7-day observation
//! window per input line, runs the prediction pipeline, and renders the
//! result plus the input trend. One prediction runs to completion
//! before the next line is read.

use anyhow::Result;
use std::io::{self, BufRead};
use std::time::Instant;
use temperature_prediction_pipeline::{
    config::AppConfig, error::PipelineError, metrics::PipelineMetrics,
    models::inference::InferenceEngine, types::forecast::Forecast,
    types::observation::ObservationWindow,
};
use tracing::info;

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("temperature_prediction_pipeline={}", config.logging.level).parse()?,
    );
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting temperature prediction pipeline");

    // Without both artifacts there is nothing to predict; refuse to
    // read any input.
    let engine = InferenceEngine::new(&config)?;
    let metrics = PipelineMetrics::new();

    let features = config.deployment.features;
    println!("Enter the last 7 days of observations, one window per line.");
    if features == 1 {
        println!("Format: 7 comma-separated temperatures in °C,");
        println!("e.g. 30.0, 31.2, 29.8, 33.1, 32.0, 31.5, 32.5");
    } else {
        println!(
            "Format: 7 semicolon-separated days, each with {} comma-separated values",
            features
        );
        println!("(temperature °C, humidity %, wind speed m/s, pressure hPa)");
    }
    println!("Blank line to exit.");

    // Held only so the session summary can echo the final result.
    let mut last_forecast: Option<Forecast> = None;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let started = Instant::now();
        match parse_window(line, features).and_then(|window| engine.predict(&window)) {
            Ok(forecast) => {
                metrics.record_prediction(started.elapsed(), forecast.celsius);
                println!("Predicted temperature for tomorrow: {}", forecast);
                render_trend(&forecast.input_trend);
                last_forecast = Some(forecast);
            }
            Err(e) => {
                metrics.record_failure();
                println!("Prediction failed: {}", e);
            }
        }
    }

    if let Some(forecast) = last_forecast {
        info!(forecast_id = %forecast.forecast_id, result = %forecast, "Session ended");
    }
    metrics.print_summary();

    Ok(())
}

/// Parse one input line into an observation window.
///
/// Anything that is not a full 7-day window of numbers is a shape/type
/// error, reported on one line like every other per-prediction failure.
fn parse_window(line: &str, features: usize) -> Result<ObservationWindow, PipelineError> {
    if features == 1 {
        let temps = parse_row(line)?;
        ObservationWindow::from_temperatures(&temps)
    } else {
        let rows = line
            .split(';')
            .map(parse_row)
            .collect::<Result<Vec<_>, _>>()?;
        ObservationWindow::new(rows)
    }
}

fn parse_row(text: &str) -> Result<Vec<f64>, PipelineError> {
    text.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| PipelineError::shape(format!("'{}' is not a number", token)))
        })
        .collect()
}

/// Render the input temperatures as a horizontal bar chart, the CLI
/// stand-in for the form's line chart.
fn render_trend(trend: &[f64]) {
    let min = trend.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = trend.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    println!("Input trend:");
    for (day, &temp) in trend.iter().enumerate() {
        let frac = if span > 0.0 { (temp - min) / span } else { 0.5 };
        let bar: String = "█".repeat(1 + (frac * 24.0).round() as usize);
        println!("  day {} {:>6.1} °C  {}", day + 1, temp, bar);
    }
}
