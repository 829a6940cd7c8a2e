//! Ranking options.

/// Default query template.
pub const DEFAULT_QUERY_TEMPLATE: &str = "Task for a {role}: {task}";

/// Options for ranking and summarizing sections.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Number of sections kept after ranking
    pub top_n: usize,

    /// Number of sentences in a refined excerpt
    pub summary_top_k: usize,

    /// Sentences shorter than this many characters are noise
    pub min_sentence_chars: usize,

    /// Length of the raw-text excerpt used when no sentence survives
    pub fallback_chars: usize,

    /// Query template with `{role}` and `{task}` placeholders
    pub query_template: String,
}

impl RankOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections kept.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the number of sentences per excerpt.
    pub fn with_summary_top_k(mut self, top_k: usize) -> Self {
        self.summary_top_k = top_k;
        self
    }

    /// Set the minimum sentence length.
    pub fn with_min_sentence_chars(mut self, chars: usize) -> Self {
        self.min_sentence_chars = chars;
        self
    }

    /// Set the query template.
    pub fn with_query_template(mut self, template: impl Into<String>) -> Self {
        self.query_template = template.into();
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            summary_top_k: 3,
            min_sentence_chars: 20,
            fallback_chars: 500,
            query_template: DEFAULT_QUERY_TEMPLATE.to_string(),
        }
    }
}
