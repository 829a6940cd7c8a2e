//! Ranking request and result objects.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Persona on whose behalf documents are ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Role description (e.g., "Travel Planner")
    pub role: String,
}

/// The task the persona needs to get done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// Task description
    pub task: String,
}

/// A document declared in a ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name relative to the collection's document directory
    pub filename: String,
    /// Optional human title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Input of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRequest {
    /// Free-form challenge metadata, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_info: Option<serde_json::Value>,
    /// Documents to open, in order
    pub documents: Vec<DocumentRef>,
    /// Persona
    pub persona: Persona,
    /// Job to be done
    pub job_to_be_done: JobToBeDone,
}

impl RankingRequest {
    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let request: RankingRequest = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Check that the request can be ranked.
    pub fn validate(&self) -> crate::Result<()> {
        if self.persona.role.trim().is_empty() {
            return Err(crate::Error::InvalidRequest("persona role is empty".into()));
        }
        if self.job_to_be_done.task.trim().is_empty() {
            return Err(crate::Error::InvalidRequest("task is empty".into()));
        }
        if let Some(doc) = self.documents.iter().find(|d| d.filename.trim().is_empty()) {
            return Err(crate::Error::InvalidRequest(format!(
                "document entry without filename (title: {:?})",
                doc.title
            )));
        }
        Ok(())
    }

    /// The query context of this request.
    pub fn query_context(&self) -> QueryContext {
        QueryContext::new(&self.persona.role, &self.job_to_be_done.task)
    }

    /// Declared document file names in order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

/// Persona role and task, combined into one query string for a ranking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Persona role
    pub role: String,
    /// Task description
    pub task: String,
}

impl QueryContext {
    /// Create a query context.
    pub fn new(role: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            task: task.into(),
        }
    }

    /// Render the query with a template containing `{role}` and `{task}`.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{role}", &self.role)
            .replace("{task}", &self.task)
    }
}

/// Metadata block of a ranking result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    /// Declared document identifiers
    pub input_documents: Vec<String>,
    /// Persona role
    pub persona: String,
    /// Task description
    pub job_to_be_done: String,
    /// ISO-8601 time the result was produced
    pub processing_timestamp: String,
}

impl RankingMetadata {
    /// Metadata for a request, stamped with the given time.
    pub fn new(request: &RankingRequest, at: DateTime<Local>) -> Self {
        Self {
            input_documents: request.filenames(),
            persona: request.persona.role.clone(),
            job_to_be_done: request.job_to_be_done.task.clone(),
            processing_timestamp: at.to_rfc3339(),
        }
    }
}

/// Summary of one ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document
    pub document: String,
    /// Section title
    pub section_title: String,
    /// Importance rank (1-based)
    pub importance_rank: usize,
    /// Start page
    pub page_number: u32,
}

/// Refined excerpt of one ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Source document
    pub document: String,
    /// Query-relevant excerpt
    pub refined_text: String,
    /// Start page
    pub page_number: u32,
}

/// Output of a ranking run. Both lists are in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Request metadata
    pub metadata: RankingMetadata,
    /// Ranked section summaries
    pub extracted_sections: Vec<ExtractedSection>,
    /// Refined excerpts, parallel to `extracted_sections`
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}
