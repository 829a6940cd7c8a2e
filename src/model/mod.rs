//! Data model shared by the readers, the analysis pipeline and the ranker.
//!
//! Reader output ([`DocumentContent`]) is immutable once produced. The
//! analysis stages derive [`Line`]s from it and emit [`DocumentOutline`]s and
//! [`Section`]s; the ranking stage consumes those together with a
//! [`RankingRequest`].

mod content;
mod line;
mod outline;
mod ranking;
mod section;

pub use content::{is_bold_font, DocumentContent, PageContent, PositionedWord, TextBlock, TextSpan};
pub use line::{Line, StyleKey};
pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use ranking::{
    DocumentRef, ExtractedSection, JobToBeDone, Persona, QueryContext, RankingMetadata,
    RankingRequest, RankingResult, SubsectionAnalysis,
};
pub use section::{RankedSection, ScoredSection, Section};
