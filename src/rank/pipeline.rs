//! Request → ranked, summarized sections.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use rayon::prelude::*;

use super::options::RankOptions;
use super::ranker::RelevanceRanker;
use super::summary::SummaryExtractor;
use crate::analysis::{SectionSegmenter, SegmentOptions};
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::model::{
    DocumentContent, ExtractedSection, RankingMetadata, RankingRequest, RankingResult,
    ScoredSection, SubsectionAnalysis,
};
use crate::reader::{ReadOptions, ReaderRegistry};

/// Runs a ranking request over a directory of documents.
pub struct RankingPipeline {
    embedder: Arc<dyn Embedder>,
    registry: ReaderRegistry,
    read_options: ReadOptions,
    segmenter: SectionSegmenter,
    ranker: RelevanceRanker,
    summarizer: SummaryExtractor,
    options: RankOptions,
}

impl RankingPipeline {
    /// Create a pipeline with the default readers and segmentation.
    pub fn new(embedder: Arc<dyn Embedder>, options: RankOptions) -> Self {
        Self {
            registry: ReaderRegistry::with_defaults(),
            read_options: ReadOptions::default(),
            segmenter: SectionSegmenter::default(),
            ranker: RelevanceRanker::new(embedder.clone(), options.top_n),
            summarizer: SummaryExtractor::new(embedder.clone(), &options),
            embedder,
            options,
        }
    }

    /// Set the read options.
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// Set the segmentation options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.segmenter = SectionSegmenter::new(options);
        self
    }

    /// Replace the reader registry.
    pub fn with_registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Open the request's documents from `doc_dir`.
    ///
    /// Missing and unreadable documents are logged and skipped. Each returned
    /// document's id is its declared file name.
    pub fn load_documents(&self, request: &RankingRequest, doc_dir: &Path) -> Vec<DocumentContent> {
        request
            .documents
            .par_iter()
            .filter_map(|doc_ref| {
                let path = doc_dir.join(&doc_ref.filename);
                if !path.is_file() {
                    let err = Error::MissingDocument(path.display().to_string());
                    log::warn!("Skipping {}: {}", doc_ref.filename, err);
                    return None;
                }
                match self.registry.read(&path, &self.read_options) {
                    Ok(mut doc) => {
                        doc.id = doc_ref.filename.clone();
                        Some(doc)
                    }
                    Err(e) => {
                        log::warn!("Skipping {}: {}", doc_ref.filename, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Run the request over documents in `doc_dir`.
    pub fn run(&self, request: &RankingRequest, doc_dir: &Path) -> Result<RankingResult> {
        let docs = self.load_documents(request, doc_dir);
        log::info!(
            "Loaded {} of {} documents",
            docs.len(),
            request.documents.len()
        );
        self.rank_documents(request, &docs)
    }

    /// Run the request over already-read documents.
    ///
    /// Embedder failures abort the run; everything else degrades to empty
    /// output.
    pub fn rank_documents(
        &self,
        request: &RankingRequest,
        docs: &[DocumentContent],
    ) -> Result<RankingResult> {
        let query = request.query_context().render(&self.options.query_template);
        log::debug!("Query: {}", query);
        let query_vector = self.embedder.embed(&query)?;

        let per_document: Vec<Vec<ScoredSection>> = docs
            .par_iter()
            .map(|doc| {
                let sections = self.segmenter.segment(doc);
                self.ranker.score(&doc.id, sections, &query_vector)
            })
            .collect::<Result<_>>()?;

        let candidates: Vec<ScoredSection> = per_document.into_iter().flatten().collect();
        let total = candidates.len();
        let ranked = self.ranker.rank(candidates);
        log::info!("Ranked {} sections, kept {}", total, ranked.len());

        let subsection_analysis = ranked
            .par_iter()
            .map(|r| -> Result<SubsectionAnalysis> {
                Ok(SubsectionAnalysis {
                    document: r.document.clone(),
                    refined_text: self.summarizer.summarize(&r.section.content, &query_vector)?,
                    page_number: r.section.start_page,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let extracted_sections = ranked
            .into_iter()
            .map(|r| ExtractedSection {
                document: r.document,
                section_title: r.section.title,
                importance_rank: r.rank,
                page_number: r.section.start_page,
            })
            .collect();

        Ok(RankingResult {
            metadata: RankingMetadata::new(request, Local::now()),
            extracted_sections,
            subsection_analysis,
        })
    }
}
