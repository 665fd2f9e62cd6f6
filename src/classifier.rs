//! ONNX sequence classification.
//!
//! Pure-Rust inference path: loads the ONNX graph with tract-onnx and the
//! vocabulary with the tokenizers crate, both from a local model directory.
//! The forward pass is CPU-bound; callers run it through `spawn_blocking`.

use anyhow::{anyhow, bail, Result};
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tract_onnx::prelude::*;

use crate::models::ClassProbs;

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";

type OnnxPlan = TypedSimplePlan<TypedModel>;

/// Seam for the model runtime.
///
/// The production implementation is [`TractClassifier`]; tests substitute a
/// fixed-output stub so the pipeline can be exercised without model
/// artifacts.
pub trait SequenceClassifier: Send + Sync {
    /// Identifier of the loaded model (e.g. the artifact directory name).
    fn model_name(&self) -> &str;

    /// Runs one forward pass over `text` and returns the two-class
    /// probability distribution. Deterministic for fixed weights and input.
    fn classify(&self, text: &str) -> Result<ClassProbs>;
}

/// Sequence classifier backed by a tract-optimized ONNX plan.
///
/// Construction loads both artifacts and fails if either is missing or
/// malformed; a constructed instance is immutable and shared across
/// requests.
#[derive(Debug)]
pub struct TractClassifier {
    name: String,
    tokenizer: Tokenizer,
    plan: OnnxPlan,
    input_count: usize,
}

impl TractClassifier {
    /// Loads `model.onnx` and `tokenizer.json` from `dir`.
    pub fn load(dir: &Path, max_tokens: usize) -> Result<Self> {
        let tokenizer_path = dir.join(TOKENIZER_FILE);
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Load tokenizer {}: {}", tokenizer_path.display(), e))?;
        configure_truncation(&mut tokenizer, max_tokens)?;

        let model_path = dir.join(MODEL_FILE);
        let plan = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| anyhow!("Load ONNX {}: {}", model_path.display(), e))?
            .into_optimized()
            .map_err(|e| anyhow!("Optimize: {}", e))?
            .into_runnable()
            .map_err(|e| anyhow!("Build tract runnable: {}", e))?;

        let input_count = plan.model().inputs.len();
        if !(2..=3).contains(&input_count) {
            bail!(
                "Expected 2 or 3 model inputs (input_ids, attention_mask[, token_type_ids]), got {}",
                input_count
            );
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        Ok(Self {
            name,
            tokenizer,
            plan,
            input_count,
        })
    }
}

/// Truncates at the tokenizer level rather than by slicing raw ids, so the
/// special tokens framing the sequence survive truncation of over-length
/// inputs.
fn configure_truncation(tokenizer: &mut Tokenizer, max_tokens: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_tokens,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Configure truncation: {}", e))?;
    Ok(())
}

impl SequenceClassifier for TractClassifier {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn classify(&self, text: &str) -> Result<ClassProbs> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenize: {}", e))?;

        // Already truncated by the tokenizer's configured max length.
        let ids = encoding.get_ids();
        let seq_len = ids.len();
        if seq_len == 0 {
            bail!("Tokenizer produced no tokens");
        }

        let input_ids: Vec<i64> = ids.iter().map(|&id| id as i64).collect();
        // Single-sequence batch: every position is real, so the mask is all
        // ones and no padding is needed.
        let attention_mask = vec![1i64; seq_len];

        let input_ids_t: Tensor = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| anyhow!("Input ids shape: {}", e))?
            .into();
        let attention_mask_t: Tensor = ndarray::Array2::from_shape_vec((1, seq_len), attention_mask)
            .map_err(|e| anyhow!("Attention mask shape: {}", e))?
            .into();

        let mut inputs = tvec!(input_ids_t.into(), attention_mask_t.into());
        if self.input_count == 3 {
            let token_type_ids_t: Tensor =
                ndarray::Array2::from_shape_vec((1, seq_len), vec![0i64; seq_len])
                    .map_err(|e| anyhow!("Token type ids shape: {}", e))?
                    .into();
            inputs.push(token_type_ids_t.into());
        }

        let result = self.plan.run(inputs)?;
        let output = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No output tensor"))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| anyhow!("Output to array: {}", e))?;

        let shape = view.shape();
        if shape.len() != 2 || shape[0] != 1 || shape[1] != 2 {
            bail!("Unexpected logits shape: {:?}", shape);
        }

        let probs = softmax2([view[[0, 0]], view[[0, 1]]]);
        Ok(ClassProbs {
            class_0_prob: probs[0],
            class_1_prob: probs[1],
        })
    }
}

/// Numerically stable softmax over two logits.
fn softmax2(logits: [f32; 2]) -> [f32; 2] {
    let max = logits[0].max(logits[1]);
    let e0 = (logits[0] - max).exp();
    let e1 = (logits[1] - max).exp();
    let sum = e0 + e1;
    [e0 / sum, e1 / sum]
}
