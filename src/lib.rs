//! FraudShield Library
//!
//! An interactive transaction fraud checker: a web form feeds four
//! transaction attributes to a pre-trained classifier, shows the verdict,
//! and keeps a per-session history of past predictions.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod session;
pub mod types;
pub mod web;

pub use animation::AnimationAssets;
pub use config::AppConfig;
pub use controller::TransactionController;
pub use error::{AppError, AppResult};
pub use feature_extractor::FeatureExtractor;
pub use models::inference::{FraudModel, InferenceEngine, ModelOutput};
pub use types::{HistoryRecord, HistoryStore, PredictionResult, TransactionInput};
pub use web::{router, AppState};
