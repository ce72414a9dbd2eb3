//! Fraud classifier loading and inference

pub mod inference;
pub mod loader;

pub use inference::{FraudModel, InferenceEngine, ModelOutput, OnnxModel};
pub use loader::ModelLoader;
