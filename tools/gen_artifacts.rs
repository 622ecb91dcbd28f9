//! Test Artifact Generator
//!
//! Writes a fitted scaler and a small random-weight LSTM model to the
//! model/ directory so the pipeline can run locally without the real
//! training outputs. The weights are untrained; predictions are only
//! meaningful for exercising the pipeline, not for forecasting.

use anyhow::Result;
use rand::Rng;
use std::fs;
use temperature_prediction_pipeline::models::lstm::LstmWeights;
use temperature_prediction_pipeline::scaler::MinMaxScaler;
use tracing::info;

const HIDDEN_SIZE: usize = 16;

fn random_weights(input_size: usize) -> LstmWeights {
    let mut rng = rand::thread_rng();
    let gates = 4 * HIDDEN_SIZE;
    let mut sample = |n: usize| -> Vec<f32> {
        (0..n).map(|_| rng.gen_range(-0.5..0.5)).collect()
    };

    LstmWeights {
        input_size,
        hidden_size: HIDDEN_SIZE,
        w_ih: sample(gates * input_size),
        w_hh: sample(gates * HIDDEN_SIZE),
        b_ih: sample(gates),
        b_hh: sample(gates),
        w_out: sample(HIDDEN_SIZE),
        b_out: 0.5,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let features: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(1);

    fs::create_dir_all("model")?;

    let scaler = match features {
        1 => MinMaxScaler::new((0.0, 1.0), vec![20.0], vec![40.0])?,
        4 => MinMaxScaler::new(
            (0.0, 1.0),
            vec![20.0, 30.0, 0.0, 990.0],
            vec![40.0, 95.0, 25.0, 1035.0],
        )?,
        other => anyhow::bail!("unsupported feature width {} (use 1 or 4)", other),
    };
    fs::write("model/scaler.json", serde_json::to_string_pretty(&scaler)?)?;
    info!(features, "Wrote model/scaler.json");

    let weights = random_weights(features);
    fs::write(
        "model/model.lstm.json",
        serde_json::to_string_pretty(&weights)?,
    )?;
    info!(
        hidden_size = HIDDEN_SIZE,
        "Wrote model/model.lstm.json (untrained weights)"
    );

    println!("Artifacts written to model/.");
    println!("Set deployment.backend = \"lstm\" and artifacts.model_file = \"model.lstm.json\"");
    println!("in config/config.toml to use them.");

    Ok(())
}
