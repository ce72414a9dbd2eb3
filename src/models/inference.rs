//! Fraud classifier and the inference engine wrapping it

use crate::config::AppConfig;
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::prediction::{Label, PredictionResult};
use crate::types::transaction::TransactionInput;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Raw output of a binary classifier for one feature row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Discrete class, 1 for fraud
    pub class: i64,
    /// Probability of class 1
    pub fraud_probability: f64,
}

/// A pre-trained binary classifier.
///
/// Implementations are read-only after construction and shared between
/// all sessions.
pub trait FraudModel: Send + Sync {
    /// Score a single feature row
    fn predict(&self, features: &[f32]) -> Result<ModelOutput>;

    /// Model name for status display
    fn name(&self) -> &str;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxModel {
    name: String,
    /// Running a session needs exclusive access
    model: Mutex<LoadedModel>,
}

impl OnnxModel {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    /// Extract the predicted class from the label output
    fn extract_label(&self, outputs: &ort::session::SessionOutputs, label_name: &str) -> Option<i64> {
        let output = outputs.get(label_name)?;
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            return data.first().copied();
        }
        None
    }

    /// Extract fraud probability from model output.
    /// Handles both tensor outputs and seq(map) outputs (scikit-learn zipmap)
    fn extract_probability(
        &self,
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<f64> {
        if let Some(output) = outputs.get(output_name) {
            let dtype = output.dtype();

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                let prob = extract_fraud_prob_from_tensor(&shape, data)?;
                debug!(model = %self.name, prob = prob, "Extracted from tensor");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                return self.extract_from_sequence_map(output);
            }
        }

        // Fallback: any non-label output that yields a probability
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                let prob = extract_fraud_prob_from_tensor(&shape, data)?;
                debug!(model = %self.name, output = %name, prob = prob, "Extracted from tensor (fallback)");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        anyhow::bail!("model {} produced no probability output", self.name)
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        // batch size is always 1
        let map_value = maps
            .first()
            .ok_or_else(|| anyhow::anyhow!("Empty probability sequence"))?;

        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            debug!(model = %self.name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow::anyhow!("No probability found in map"))
    }
}

impl FraudModel for OnnxModel {
    fn predict(&self, features: &[f32]) -> Result<ModelOutput> {
        use ort::value::Tensor;

        let mut guard = self.model.lock();
        let model = &mut *guard;

        // shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])
            .with_context(|| format!("Inference failed for model {}", model.name))?;

        let fraud_probability = self.extract_probability(&outputs, &model.probability_name)?;

        let class = match model
            .label_name
            .as_deref()
            .and_then(|label_name| self.extract_label(&outputs, label_name))
        {
            Some(class) => class,
            None => {
                debug!(model = %self.name, "No label output, thresholding probability at 0.5");
                i64::from(fraud_probability >= 0.5)
            }
        };

        Ok(ModelOutput {
            class,
            fraud_probability,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Extract fraud probability from tensor data
fn extract_fraud_prob_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64> {
    let dims: Vec<i64> = shape.iter().copied().collect();

    let num_classes = match dims.as_slice() {
        [_, classes] | [classes] => *classes as usize,
        _ => data.len(),
    };

    let prob = match num_classes {
        // [batch, 2] or [2]: fraud class is index 1
        n if n >= 2 => data.get(1),
        // single probability column
        1 => data.first(),
        _ => None,
    };

    prob.map(|&p| p as f64)
        .ok_or_else(|| anyhow::anyhow!("Unexpected probability tensor shape {:?}", dims))
}

/// Classifies transactions with the loaded model
pub struct InferenceEngine {
    model: Box<dyn FraudModel>,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    /// Load the ONNX model named in the configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads)?;
        let model = loader
            .load(&config.model.path)
            .with_context(|| format!("Failed to load fraud model from {}", config.model.path))?;

        let engine = Self::with_model(OnnxModel::new(model));
        info!(
            model = %engine.model_name(),
            feature_count = engine.extractor.feature_count(),
            features = ?engine.extractor.feature_names(),
            "Inference engine initialized"
        );

        Ok(engine)
    }

    /// Wrap an already constructed classifier
    pub fn with_model<M: FraudModel + 'static>(model: M) -> Self {
        Self {
            model: Box::new(model),
            extractor: FeatureExtractor::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify one transaction.
    ///
    /// Fails when the model errors or returns a class outside {0, 1} or a
    /// probability outside [0, 1].
    pub fn classify(&self, input: &TransactionInput) -> Result<PredictionResult> {
        let features = self.extractor.extract(input);
        let output = self.model.predict(&features)?;

        let label = Label::from_class(output.class)
            .ok_or_else(|| anyhow::anyhow!("model returned unknown class {}", output.class))?;

        if !(0.0..=1.0).contains(&output.fraud_probability) {
            anyhow::bail!(
                "model returned probability {} outside [0, 1]",
                output.fraud_probability
            );
        }

        debug!(
            model = %self.model.name(),
            label = %label,
            fraud_probability = output.fraud_probability,
            "Transaction classified"
        );

        Ok(PredictionResult {
            label,
            fraud_probability: output.fraud_probability,
        })
    }
}
