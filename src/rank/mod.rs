//! Persona-driven section ranking and excerpting.
//!
//! A [`RankingPipeline`] segments every requested document into sections,
//! scores each section against the request's query, keeps the best ones and
//! condenses each into a short excerpt of its most relevant sentences.

mod options;
mod pipeline;
mod ranker;
mod sentences;
mod summary;

pub use options::{RankOptions, DEFAULT_QUERY_TEMPLATE};
pub use pipeline::RankingPipeline;
pub use ranker::RelevanceRanker;
pub use sentences::split_sentences;
pub use summary::SummaryExtractor;
