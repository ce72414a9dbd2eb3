//! Prediction statistics shown on the status panel and health endpoint.

use crate::types::prediction::PredictionResult;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latency samples across all sessions
pub struct PredictionMetrics {
    /// Successful classifications
    pub predictions: AtomicU64,
    /// Classifications labelled fraud
    pub fraud_predictions: AtomicU64,
    /// Classifications that raised an error
    pub failures: AtomicU64,
    /// Inference times (in microseconds)
    inference_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    started: Instant,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            fraud_predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            inference_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            started: Instant::now(),
        }
    }

    /// Record a successful classification
    pub fn record_prediction(&self, inference_time: Duration, result: &PredictionResult) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if result.label.is_fraud() {
            self.fraud_predictions.fetch_add(1, Ordering::Relaxed);
        }

        {
            let mut times = self.inference_times.write();
            times.push(inference_time.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (result.fraud_probability * 10.0).clamp(0.0, 9.0) as usize;
        self.score_buckets.write()[bucket] += 1;
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn latency_stats(&self) -> LatencyStats {
        let times = self.inference_times.read();
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    pub fn score_distribution(&self) -> [u64; 10] {
        *self.score_buckets.read()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let fraud = self.fraud_predictions.load(Ordering::Relaxed);
        MetricsSnapshot {
            predictions,
            fraud_predictions: fraud,
            failures: self.failures.load(Ordering::Relaxed),
            fraud_rate: if predictions > 0 {
                fraud as f64 / predictions as f64
            } else {
                0.0
            },
            uptime_secs: self.started.elapsed().as_secs(),
            latency: self.latency_stats(),
            score_distribution: self.score_distribution(),
        }
    }

    /// Log summary statistics
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();

        info!(
            predictions = snapshot.predictions,
            fraud = snapshot.fraud_predictions,
            failures = snapshot.failures,
            fraud_rate = format!("{:.1}%", snapshot.fraud_rate * 100.0),
            uptime_secs = snapshot.uptime_secs,
            "Prediction summary"
        );
        info!(
            mean_us = snapshot.latency.mean_us,
            p50_us = snapshot.latency.p50_us,
            p99_us = snapshot.latency.p99_us,
            max_us = snapshot.latency.max_us,
            "Inference latency"
        );

        let total: u64 = snapshot.score_distribution.iter().sum();
        for (i, &count) in snapshot.score_distribution.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = (count as f64 / total as f64) * 100.0;
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                "█".repeat(((pct / 5.0) as usize).min(20))
            );
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub fraud_predictions: u64,
    pub failures: u64,
    pub fraud_rate: f64,
    pub uptime_secs: u64,
    pub latency: LatencyStats,
    pub score_distribution: [u64; 10],
}
