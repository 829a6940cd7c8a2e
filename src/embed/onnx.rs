//! Sentence embeddings from a local ONNX transformer model.
//!
//! Expects a MiniLM-class sentence-transformer export (for example
//! `paraphrase-MiniLM-L3-v2`) in one directory:
//!
//! - `model.onnx`, taking `input_ids`, `attention_mask` and `token_type_ids`
//! - `tokenizer.json`, the matching Hugging Face tokenizer
//!
//! The sentence vector is the attention-masked mean of the last hidden
//! state, L2-normalized.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array2;
use ort::{session::Session, value::Value};
use tokenizers::{Tokenizer, TruncationParams};

use super::{l2_normalize, Embedder};
use crate::error::{Error, Result};

/// Model file expected in the model directory.
pub const MODEL_FILE: &str = "model.onnx";
/// Tokenizer file expected in the model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Longest token sequence fed to the model.
const MAX_TOKENS: usize = 128;

/// Embedder running a transformer encoder through ONNX Runtime.
pub struct OnnxEmbedder {
    // Inference needs exclusive access to the session
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
}

fn onnx_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Embedding(format!("{}: {}", context, e))
}

fn tensor(values: Vec<i64>) -> Result<Value> {
    let len = values.len();
    let array = Array2::from_shape_vec((1, len), values)
        .map_err(|e| onnx_error("failed to shape model input", e))?;
    Ok(Value::from_array(array)
        .map_err(|e| onnx_error("failed to create model input", e))?
        .into_dyn())
}

impl OnnxEmbedder {
    /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        for path in [&model_path, &tokenizer_path] {
            if !path.is_file() {
                return Err(Error::Embedding(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        Self::from_files(&model_path, &tokenizer_path)
    }

    /// Load from specific file paths.
    ///
    /// One sentence is embedded during loading to learn the output
    /// dimension, so a model with unexpected inputs fails here.
    pub fn from_files(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        log::info!("Loading ONNX model from {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| onnx_error("failed to create ONNX session builder", e))?
            .commit_from_file(model_path)
            .map_err(|e| onnx_error(&format!("failed to load {}", model_path.display()), e))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| onnx_error("failed to load tokenizer", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| onnx_error("failed to configure tokenizer", e))?;

        let mut embedder = Self {
            session: Mutex::new(session),
            tokenizer,
            dimension: 0,
        };
        embedder.dimension = embedder.encode("warm-up")?.len();
        log::info!("ONNX embedder loaded, dimension {}", embedder.dimension);
        Ok(embedder)
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| onnx_error("tokenization failed", e))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let type_ids = vec![0_i64; ids.len()];

        let inputs = ort::inputs![
            "input_ids" => tensor(ids)?,
            "attention_mask" => tensor(mask.clone())?,
            "token_type_ids" => tensor(type_ids)?,
        ];

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Embedding("ONNX session lock poisoned".to_string()))?;
        let outputs = session
            .run(inputs)
            .map_err(|e| onnx_error("ONNX inference failed", e))?;

        // Last hidden state: [1, tokens, hidden]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| onnx_error("failed to extract output tensor", e))?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let (tokens, hidden) = match dims[..] {
            [1, tokens, hidden] if hidden > 0 && tokens * hidden <= data.len() => (tokens, hidden),
            _ => {
                return Err(Error::Embedding(format!(
                    "unexpected model output shape {:?}",
                    dims
                )))
            }
        };

        let mut pooled = vec![0.0_f32; hidden];
        let mut weight = 0.0_f32;
        for (row, &m) in data.chunks(hidden).take(tokens).zip(&mask) {
            if m == 0 {
                continue;
            }
            for (p, v) in pooled.iter_mut().zip(row) {
                *p += v;
            }
            weight += 1.0;
        }
        if weight > 0.0 {
            pooled.iter_mut().for_each(|p| *p /= weight);
        }
        l2_normalize(&mut pooled);
        Ok(pooled)
    }
}

impl Embedder for OnnxEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_embedding_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OnnxEmbedder::from_dir(dir.path()).err().unwrap();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains(MODEL_FILE));
    }

    #[test]
    fn test_missing_tokenizer_is_embedding_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), b"not a model").unwrap();
        let err = OnnxEmbedder::from_dir(dir.path()).err().unwrap();
        assert!(err.to_string().contains(TOKENIZER_FILE));
    }

    #[test]
    fn test_corrupt_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), b"not a model").unwrap();
        std::fs::write(dir.path().join(TOKENIZER_FILE), b"{}").unwrap();
        assert!(OnnxEmbedder::from_dir(dir.path()).is_err());
    }
}
