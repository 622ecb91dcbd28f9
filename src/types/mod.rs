//! Type definitions for the prediction pipeline

pub mod forecast;
pub mod observation;

pub use forecast::Forecast;
pub use observation::{ObservationWindow, WINDOW_LEN};
