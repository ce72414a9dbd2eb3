//! Type definitions for transactions, predictions and session history

pub mod history;
pub mod prediction;
pub mod transaction;

pub use history::{HistoryRecord, HistoryStore};
pub use prediction::{Label, PredictionResult, Verdict};
pub use transaction::{DayOfWeek, TransactionForm, TransactionInput};
