//! Performance metrics and statistics tracking for the prediction pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// °C histogram buckets: 5-degree steps from -10 to 50.
const BUCKETS: usize = 12;

/// Metrics collector for pipeline performance.
pub struct PipelineMetrics {
    /// Total predictions produced.
    pub predictions_made: AtomicU64,
    /// Predictions that ended in an error.
    pub predictions_failed: AtomicU64,
    /// Processing times (in microseconds).
    processing_times: RwLock<Vec<u64>>,
    /// Predicted temperature distribution.
    celsius_buckets: RwLock<[u64; BUCKETS]>,
    /// Start time for rate calculation.
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            predictions_made: AtomicU64::new(0),
            predictions_failed: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            celsius_buckets: RwLock::new([0; BUCKETS]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction.
    pub fn record_prediction(&self, processing_time: Duration, celsius: f64) {
        self.predictions_made.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (((celsius + 10.0) / 5.0) as isize).clamp(0, BUCKETS as isize - 1) as usize;
        if let Ok(mut buckets) = self.celsius_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed prediction.
    pub fn record_failure(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics.
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get predicted temperature distribution.
    pub fn get_celsius_distribution(&self) -> [u64; BUCKETS] {
        *self.celsius_buckets.read().unwrap()
    }

    /// Print summary statistics.
    pub fn print_summary(&self) {
        let made = self.predictions_made.load(Ordering::Relaxed);
        let failed = self.predictions_failed.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let elapsed = self.start_time.elapsed().as_secs();
        let dist = self.get_celsius_distribution();

        info!("╔════════════════════════════════════════════════════╗");
        info!("║       PREDICTION PIPELINE - METRICS SUMMARY        ║");
        info!("╠════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions: {:>8}  │  Failed: {:>8}          ║",
            made, failed
        );
        info!(
            "║ Processing (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("║ Session length: {:>6}s                            ║", elapsed);
        info!("╠════════════════════════════════════════════════════╣");
        info!("║ Predicted temperature distribution:                ║");
        let total: u64 = dist.iter().sum();
        for (i, &count) in dist.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = (count as f64 / total as f64) * 100.0;
            let bar: String = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "║   {:>3}..{:>3} °C: {:>6} ({:>5.1}%) {}",
                -10 + (i as i64) * 5,
                -5 + (i as i64) * 5,
                count,
                pct,
                bar
            );
        }
        info!("╚════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 30.5);
        metrics.record_prediction(Duration::from_micros(200), 31.9);
        metrics.record_failure();

        assert_eq!(metrics.predictions_made.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.predictions_failed.load(Ordering::Relaxed), 1);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 150);
    }

    #[test]
    fn test_celsius_buckets() {
        let metrics = PipelineMetrics::new();

        metrics.record_prediction(Duration::from_micros(50), 32.0);
        metrics.record_prediction(Duration::from_micros(50), 33.0);
        metrics.record_prediction(Duration::from_micros(50), -40.0);

        let dist = metrics.get_celsius_distribution();
        // 30..35 °C is bucket 8; extreme cold clamps into the first.
        assert_eq!(dist[8], 2);
        assert_eq!(dist[0], 1);
    }
}
