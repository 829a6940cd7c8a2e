//! Section relevance ranking.

use std::sync::Arc;

use crate::embed::{cosine_similarity, Embedder};
use crate::error::Result;
use crate::model::{RankedSection, ScoredSection, Section};

/// Scores sections against a query embedding and keeps the best.
pub struct RelevanceRanker {
    embedder: Arc<dyn Embedder>,
    top_n: usize,
}

impl RelevanceRanker {
    /// Create a ranker keeping `top_n` sections.
    pub fn new(embedder: Arc<dyn Embedder>, top_n: usize) -> Self {
        Self { embedder, top_n }
    }

    /// Score the sections of one document.
    pub fn score(
        &self,
        document: &str,
        sections: Vec<Section>,
        query: &[f32],
    ) -> Result<Vec<ScoredSection>> {
        let contents: Vec<&str> = sections.iter().map(|s| s.content.as_str()).collect();
        let vectors = self.embedder.embed_batch(&contents)?;

        Ok(sections
            .into_iter()
            .zip(vectors)
            .map(|(section, vector)| ScoredSection {
                document: document.to_string(),
                score: cosine_similarity(query, &vector),
                section,
            })
            .collect())
    }

    /// Order by descending score and keep the top sections.
    ///
    /// Equal scores keep their input order. Ranks start at 1.
    pub fn rank(&self, mut scored: Vec<ScoredSection>) -> Vec<RankedSection> {
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
            .into_iter()
            .take(self.top_n)
            .enumerate()
            .map(|(i, s)| RankedSection {
                document: s.document,
                section: s.section,
                score: s.score,
                rank: i + 1,
            })
            .collect()
    }
}
