//! Feature extraction for fraud model inference.
//!
//! Produces the single-row feature vector in the column order the model
//! was trained on.

use crate::types::transaction::TransactionInput;

/// Number of model input columns
pub const FEATURE_COUNT: usize = 4;

/// Transforms a transaction into the model's input row.
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a transaction.
    ///
    /// Order: amount, hour, day-of-week index, days since last transaction.
    pub fn extract(&self, input: &TransactionInput) -> Vec<f32> {
        vec![
            input.amount as f32,
            f32::from(input.hour),
            f32::from(input.day_of_week.index()),
            input.days_since_last_transaction as f32,
        ]
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Column names used during training
    pub fn feature_names(&self) -> [&'static str; FEATURE_COUNT] {
        ["TX_AMOUNT", "TX_HOUR", "TX_DAY_OF_WEEK", "TX_TIME_DAYS"]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
