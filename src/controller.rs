//! Transaction form submission: validate, classify, record, report

use crate::error::AppError;
use crate::metrics::PredictionMetrics;
use crate::models::inference::InferenceEngine;
use crate::types::history::{HistoryRecord, HistoryStore};
use crate::types::prediction::Verdict;
use crate::types::transaction::TransactionForm;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Outcome of one successful submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub verdict: Verdict,
    /// The record appended to the session history
    pub record: HistoryRecord,
}

/// Drives a form submission through the model and into the session history
pub struct TransactionController<'a> {
    engine: &'a InferenceEngine,
    metrics: &'a PredictionMetrics,
    processing_delay: Duration,
}

impl<'a> TransactionController<'a> {
    pub fn new(
        engine: &'a InferenceEngine,
        metrics: &'a PredictionMetrics,
        processing_delay: Duration,
    ) -> Self {
        Self {
            engine,
            metrics,
            processing_delay,
        }
    }

    /// Analyze a submitted transaction.
    ///
    /// History is only touched once the model has produced a valid result;
    /// validation and classification errors leave it unchanged.
    pub async fn submit(
        &self,
        form: TransactionForm,
        history: &Mutex<HistoryStore>,
    ) -> Result<Submission, AppError> {
        let input = form.into_input()?;

        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }

        let start = Instant::now();
        let result = self.engine.classify(&input).map_err(|e| {
            self.metrics.record_failure();
            error!(error = %e, amount = input.amount, hour = input.hour, "Classification failed");
            AppError::Classification(format!("{e:#}"))
        })?;
        let inference_time = start.elapsed();

        self.metrics.record_prediction(inference_time, &result);

        let record = HistoryRecord::new(&input, &result);
        history.lock().append(record.clone());

        info!(
            label = %result.label,
            fraud_probability = result.fraud_probability,
            amount = input.amount,
            hour = input.hour,
            day = %input.day_of_week,
            inference_time_us = inference_time.as_micros(),
            "Transaction analyzed"
        );

        Ok(Submission {
            verdict: Verdict::from_result(&result),
            record,
        })
    }
}
