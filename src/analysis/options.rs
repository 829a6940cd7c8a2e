//! Tuning parameters for outline extraction and section segmentation.

use crate::model::HeadingLevel;

/// Exemplar heading strings for one level of the semantic fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ExemplarSet {
    /// Level assigned when this set matches best
    pub level: HeadingLevel,
    /// Example heading texts
    pub samples: Vec<String>,
}

impl ExemplarSet {
    /// Create an exemplar set.
    pub fn new<S: Into<String>>(level: HeadingLevel, samples: impl IntoIterator<Item = S>) -> Self {
        Self {
            level,
            samples: samples.into_iter().map(Into::into).collect(),
        }
    }

    /// Default exemplars for H1, H2 and H3.
    pub fn defaults() -> Vec<ExemplarSet> {
        vec![
            ExemplarSet::new(
                HeadingLevel::H1,
                ["1. Introduction", "2. Overview", "Appendix A"],
            ),
            ExemplarSet::new(HeadingLevel::H2, ["2.1 Features", "2.2 Use Case"]),
            ExemplarSet::new(
                HeadingLevel::H3,
                ["2.1.1 Details", "3.2.2 Method", "Timeline:"],
            ),
        ]
    }
}

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Lines on page 1 above this vertical position may be the title
    pub header_zone: f32,

    /// Title score weight applied to font size
    pub title_size_weight: f32,

    /// Title score bonus for bold lines
    pub title_bold_bonus: f32,

    /// Heading candidates must be shorter than this many characters
    pub max_heading_chars: usize,

    /// Minimum cosine similarity for the semantic fallback
    pub semantic_threshold: f32,

    /// Exemplar sets for the semantic fallback
    pub exemplars: Vec<ExemplarSet>,

    /// Maximum number of distinct candidate styles that receive a
    /// style-rank level (`None` = all of them)
    pub max_style_levels: Option<usize>,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title header zone.
    pub fn with_header_zone(mut self, header_zone: f32) -> Self {
        self.header_zone = header_zone;
        self
    }

    /// Set the maximum heading length in characters.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the semantic fallback threshold.
    pub fn with_semantic_threshold(mut self, threshold: f32) -> Self {
        self.semantic_threshold = threshold;
        self
    }

    /// Replace the semantic exemplar sets.
    pub fn with_exemplars(mut self, exemplars: Vec<ExemplarSet>) -> Self {
        self.exemplars = exemplars;
        self
    }

    /// Cap the number of style-ranked levels.
    pub fn with_max_style_levels(mut self, levels: usize) -> Self {
        self.max_style_levels = Some(levels);
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            header_zone: 200.0,
            title_size_weight: 1.5,
            title_bold_bonus: 2.0,
            max_heading_chars: 150,
            semantic_threshold: 0.6,
            exemplars: ExemplarSet::defaults(),
            max_style_levels: None,
        }
    }
}

/// Options for section segmentation.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// A block is a header when its size exceeds body size times this ratio
    pub heading_ratio: f32,

    /// Header blocks must be shorter than this many characters
    pub max_header_chars: usize,

    /// Title of the section preceding the first header
    pub default_title: String,

    /// Body size assumed for a document without any text
    pub default_body_size: i32,
}

impl SegmentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading size ratio.
    pub fn with_heading_ratio(mut self, ratio: f32) -> Self {
        self.heading_ratio = ratio;
        self
    }

    /// Set the maximum header length in characters.
    pub fn with_max_header_chars(mut self, chars: usize) -> Self {
        self.max_header_chars = chars;
        self
    }

    /// Set the title of the leading section.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            heading_ratio: 1.15,
            max_header_chars: 100,
            default_title: "Introduction".to_string(),
            default_body_size: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_options_builder() {
        let options = OutlineOptions::new()
            .with_header_zone(150.0)
            .with_semantic_threshold(0.75)
            .with_max_style_levels(3);

        assert_eq!(options.header_zone, 150.0);
        assert_eq!(options.semantic_threshold, 0.75);
        assert_eq!(options.max_style_levels, Some(3));
        assert_eq!(options.max_heading_chars, 150);
    }

    #[test]
    fn test_default_exemplars_cover_three_levels() {
        let sets = ExemplarSet::defaults();
        let levels: Vec<_> = sets.iter().map(|s| s.level).collect();
        assert_eq!(
            levels,
            vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
        );
        assert!(sets.iter().all(|s| !s.samples.is_empty()));
    }

    #[test]
    fn test_segment_options_defaults() {
        let options = SegmentOptions::default();
        assert_eq!(options.heading_ratio, 1.15);
        assert_eq!(options.max_header_chars, 100);
        assert_eq!(options.default_title, "Introduction");
    }
}
