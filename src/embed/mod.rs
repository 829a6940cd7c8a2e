//! Text embedding capability.
//!
//! Every component that needs semantic similarity receives an [`Embedder`]
//! explicitly. The embedder is built once from an [`EmbedderConfig`] at
//! startup; a failure there is fatal to the run.
//!
//! [`HashingEmbedder`] needs no model files and is the default. With the
//! `onnx` feature, [`OnnxEmbedder`] runs a local sentence-transformer model.

mod hashing;
#[cfg(feature = "onnx")]
mod onnx;

pub use hashing::HashingEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Interface implemented by embedding backends.
///
/// Implementations must be deterministic for identical input and safe to call
/// from several documents at once.
pub trait Embedder: Send + Sync {
    /// Length of the produced vectors.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }
}

/// Cosine similarity of two vectors.
///
/// Returns 0.0 when either vector is empty or has zero norm, or when the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length in place. Zero vectors are left alone.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Supported embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProvider {
    /// Deterministic feature-hashing embedder
    #[default]
    Hashing,
    /// Sentence-transformer model run through ONNX Runtime (`onnx` feature)
    Onnx,
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hashing" | "hash" => Ok(Self::Hashing),
            "onnx" => Ok(Self::Onnx),
            other => Err(Error::Embedding(format!("unknown embedding provider: {}", other))),
        }
    }
}

/// Configuration of the embedding capability.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Backend to use
    pub provider: EmbeddingProvider,
    /// Vector dimension. Model-backed providers report their own.
    pub dimension: usize,
    /// Directory holding `model.onnx` and `tokenizer.json`
    pub model_dir: Option<PathBuf>,
}

impl EmbedderConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: EmbeddingProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the vector dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the model directory for model-backed providers.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    /// Build the embedder. Call once per process and share the result.
    pub fn build(&self) -> Result<Arc<dyn Embedder>> {
        log::debug!(
            "Initializing {:?} embedder with dimension {}",
            self.provider,
            self.dimension
        );
        match self.provider {
            EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(self.dimension)?)),
            EmbeddingProvider::Onnx => self.build_onnx(),
        }
    }

    #[cfg(feature = "onnx")]
    fn build_onnx(&self) -> Result<Arc<dyn Embedder>> {
        let dir = self.model_dir.as_deref().ok_or_else(|| {
            Error::Embedding("the onnx provider needs a model directory".to_string())
        })?;
        Ok(Arc::new(OnnxEmbedder::from_dir(dir)?))
    }

    #[cfg(not(feature = "onnx"))]
    fn build_onnx(&self) -> Result<Arc<dyn Embedder>> {
        Err(Error::Embedding(
            "onnx provider requested but pdf-outline was built without the `onnx` feature"
                .to_string(),
        ))
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Hashing,
            dimension: 384,
            model_dir: None,
        }
    }
}
