//! Query-focused excerpts of a section.

use std::sync::Arc;

use super::options::RankOptions;
use super::sentences::split_sentences;
use crate::embed::{cosine_similarity, Embedder};
use crate::error::Result;

/// Picks the sentences of a section most relevant to a query.
pub struct SummaryExtractor {
    embedder: Arc<dyn Embedder>,
    top_k: usize,
    min_sentence_chars: usize,
    fallback_chars: usize,
}

impl SummaryExtractor {
    /// Create an extractor.
    pub fn new(embedder: Arc<dyn Embedder>, options: &RankOptions) -> Self {
        Self {
            embedder,
            top_k: options.summary_top_k,
            min_sentence_chars: options.min_sentence_chars,
            fallback_chars: options.fallback_chars,
        }
    }

    /// Sentences of `content` long enough to be considered.
    pub fn candidate_sentences<'a>(&self, content: &'a str) -> Vec<&'a str> {
        split_sentences(content)
            .into_iter()
            .filter(|s| s.chars().count() >= self.min_sentence_chars)
            .collect()
    }

    /// Excerpt of `content` for an embedded query.
    ///
    /// The `top_k` sentences most similar to the query are joined in their
    /// original order. Without any candidate sentence the excerpt is the
    /// start of the raw content.
    pub fn summarize(&self, content: &str, query: &[f32]) -> Result<String> {
        let sentences = self.candidate_sentences(content);
        if sentences.is_empty() {
            return Ok(content.chars().take(self.fallback_chars).collect());
        }

        let vectors = self.embedder.embed_batch(&sentences)?;
        let mut order: Vec<(usize, f32)> = vectors
            .iter()
            .map(|v| cosine_similarity(query, v))
            .enumerate()
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut picked: Vec<usize> = order.iter().take(self.top_k).map(|(i, _)| *i).collect();
        picked.sort_unstable();

        Ok(picked
            .into_iter()
            .map(|i| sentences[i])
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Excerpt of `content` for a query string.
    pub fn summarize_text(&self, content: &str, query: &str) -> Result<String> {
        let query = self.embedder.embed(query)?;
        self.summarize(content, &query)
    }
}
