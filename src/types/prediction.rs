//! Classifier outcomes and the verdict shown to the user

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fraud,
    Legit,
}

impl Label {
    /// Map a model class (1 = fraud, 0 = legitimate)
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            1 => Some(Label::Fraud),
            0 => Some(Label::Legit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fraud => "FRAUD",
            Label::Legit => "LEGIT",
        }
    }

    pub fn is_fraud(self) -> bool {
        self == Label::Fraud
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Positive-class probability (0.0 - 1.0)
    pub fraud_probability: f64,
}

/// Round to 3 decimal places, the precision kept in history.
///
/// Rounds the exact binary value, so 0.0625 becomes 0.062 and 0.1235
/// (stored just below the tie) becomes 0.123.
pub fn round_probability(probability: f64) -> f64 {
    format!("{:.3}", probability)
        .parse()
        .unwrap_or(probability)
}

/// Format with 2 decimal places, the precision shown in verdicts
pub fn display_probability(probability: f64) -> String {
    format!("{:.2}", probability)
}

/// Rendered outcome of a classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub label: Label,
    pub fraud_probability: f64,
    /// Two-decimal probability as displayed
    pub display_probability: String,
    pub headline: String,
    pub recommendation: &'static str,
}

impl Verdict {
    pub fn from_result(result: &PredictionResult) -> Self {
        let display = display_probability(result.fraud_probability);
        let (lead, tail) = headline_parts(result.label);
        let headline = format!("{lead}{display}{tail}");
        let recommendation = match result.label {
            Label::Fraud => "Freeze transaction and start manual review.",
            Label::Legit => "Transaction safe to approve.",
        };

        Self {
            label: result.label,
            fraud_probability: result.fraud_probability,
            display_probability: display,
            headline,
            recommendation,
        }
    }

    pub fn is_fraud(&self) -> bool {
        self.label.is_fraud()
    }

    /// Headline text around the displayed probability
    pub fn headline_parts(&self) -> (&'static str, &'static str) {
        headline_parts(self.label)
    }
}

fn headline_parts(label: Label) -> (&'static str, &'static str) {
    match label {
        Label::Fraud => ("⚠️ Fraud Detected! Probability: ", ""),
        Label::Legit => ("✅ Transaction Legitimate (Fraud Chance: ", ")"),
    }
}
