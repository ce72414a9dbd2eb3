//! Transaction data structures submitted for fraud scoring

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Day of the week a transaction took place on, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in index order
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Model feature value: Monday = 0 .. Sunday = 6
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| AppError::Validation(format!("unknown day of week: {s}")))
    }
}

/// A validated transaction, ready for feature extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionInput {
    /// Transaction amount, non-negative
    pub amount: f64,
    /// Hour of day, 0..=23
    pub hour: u8,
    pub day_of_week: DayOfWeek,
    /// Days since the previous transaction, non-negative
    pub days_since_last_transaction: f64,
}

/// Raw values posted by the dashboard form or the JSON API.
///
/// Ranges are checked by `validator`; `into_input` is the only way to get a
/// `TransactionInput`, so nothing out of range reaches the model.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransactionForm {
    #[validate(range(min = 0.0, message = "Transaction amount must be 0 or greater"))]
    pub amount: f64,

    #[validate(range(min = 0, max = 23, message = "Transaction hour must be between 0 and 23"))]
    pub hour: i64,

    pub day: String,

    #[validate(range(min = 0.0, message = "Days since last transaction must be 0 or greater"))]
    pub days_since_last: f64,
}

impl TransactionForm {
    /// Check ranges and build the immutable input record
    pub fn into_input(self) -> Result<TransactionInput, AppError> {
        // NaN slips through range checks
        if !self.amount.is_finite() {
            return Err(AppError::Validation(
                "Transaction amount must be a finite number".to_string(),
            ));
        }
        if !self.days_since_last.is_finite() {
            return Err(AppError::Validation(
                "Days since last transaction must be a finite number".to_string(),
            ));
        }

        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let day_of_week: DayOfWeek = self.day.trim().parse()?;

        Ok(TransactionInput {
            amount: self.amount,
            hour: self.hour as u8,
            day_of_week,
            days_since_last_transaction: self.days_since_last,
        })
    }
}
