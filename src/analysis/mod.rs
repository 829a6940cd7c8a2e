//! Layout analysis: lines, body style, title, headings and sections.
//!
//! All stages work on a [`DocumentContent`](crate::model::DocumentContent)
//! and are deterministic. Only heading classification touches the embedder,
//! for its semantic fallback.

mod heading;
mod lines;
mod options;
mod outline;
mod sections;
mod style;
mod title;

pub use heading::{HeadingClassifier, LevelRule, NumberingRule, SemanticMatcher, StyleRanking};
pub use lines::{GarbageFilter, LineAssembler};
pub use options::{ExemplarSet, OutlineOptions, SegmentOptions};
pub use outline::{LayoutProfile, OutlineExtractor};
pub use sections::SectionSegmenter;
pub use style::{most_common, StyleProfiler};
pub use title::TitleDetector;
