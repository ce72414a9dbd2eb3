//! Session-scoped prediction history

use crate::types::prediction::{round_probability, Label, PredictionResult};
use crate::types::transaction::{DayOfWeek, TransactionInput};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One analysed transaction as shown in the history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Amount")]
    pub amount: f64,

    #[serde(rename = "Hour")]
    pub hour: u8,

    #[serde(rename = "Day")]
    pub day: DayOfWeek,

    #[serde(rename = "Days Since Last")]
    pub days_since_last: f64,

    #[serde(rename = "Prediction")]
    pub prediction: Label,

    /// Rounded to 3 decimal places
    #[serde(rename = "Fraud Probability")]
    pub fraud_probability: f64,
}

impl HistoryRecord {
    pub fn new(input: &TransactionInput, result: &PredictionResult) -> Self {
        Self {
            amount: input.amount,
            hour: input.hour,
            day: input.day_of_week,
            days_since_last: input.days_since_last_transaction,
            prediction: result.label,
            fraud_probability: round_probability(result.fraud_probability),
        }
    }
}

/// Append-only log of a session's predictions, oldest first.
///
/// With a capacity set, appending past it evicts the oldest record.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    records: VecDeque<HistoryRecord>,
    capacity: Option<usize>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.filter(|&c| c > 0),
        }
    }

    pub fn append(&mut self, record: HistoryRecord) {
        if let Some(capacity) = self.capacity {
            while self.records.len() >= capacity {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
    }

    /// Snapshot of the current records in insertion order
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    /// Drop every record, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
