//! Heading detection and level assignment.
//!
//! A line is a heading candidate when its style dominates the body style and
//! its text is short. Each candidate then goes through an ordered chain of
//! [`LevelRule`]s; the first rule that yields a level wins:
//!
//! 1. [`LevelRule::Numbering`]: `1.2.3` → H3, `1.2` → H2, `1.` and
//!    `Appendix X` → H1.
//! 2. [`LevelRule::StyleRank`]: rank of the candidate's style among all
//!    distinct candidate styles (largest first, bold before regular).
//! 3. [`LevelRule::Semantic`]: best-matching exemplar set by cosine
//!    similarity, if above the threshold. Candidates no rule accepts are
//!    dropped.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use super::options::OutlineOptions;
use crate::embed::{cosine_similarity, Embedder};
use crate::error::Result;
use crate::model::{HeadingLevel, Line, OutlineEntry, StyleKey};

/// One step of the level assignment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    /// Numbering prefix of the text
    Numbering,
    /// Relative rank of the line's style
    StyleRank,
    /// Similarity to exemplar headings
    Semantic,
}

impl LevelRule {
    /// The default chain, in priority order.
    pub const CHAIN: [LevelRule; 3] = [
        LevelRule::Numbering,
        LevelRule::StyleRank,
        LevelRule::Semantic,
    ];
}

/// Level from a numbering prefix.
#[derive(Debug, Clone)]
pub struct NumberingRule {
    three_part: Regex,
    two_part: Regex,
    one_part: Regex,
    appendix: Regex,
}

impl NumberingRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self {
            three_part: Regex::new(r"^\d+\.\d+\.\d+").unwrap(),
            two_part: Regex::new(r"^\d+\.\d+").unwrap(),
            one_part: Regex::new(r"^\d+\.").unwrap(),
            appendix: Regex::new(r"^Appendix\s[A-Z]").unwrap(),
        }
    }

    /// Level implied by the text's numbering, if any.
    pub fn level(&self, text: &str) -> Option<HeadingLevel> {
        let text = text.trim();
        if self.three_part.is_match(text) {
            Some(HeadingLevel::H3)
        } else if self.two_part.is_match(text) {
            Some(HeadingLevel::H2)
        } else if self.one_part.is_match(text) || self.appendix.is_match(text) {
            Some(HeadingLevel::H1)
        } else {
            None
        }
    }
}

impl Default for NumberingRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Style → level map for one document's candidates.
#[derive(Debug, Clone, Default)]
pub struct StyleRanking {
    levels: HashMap<StyleKey, HeadingLevel>,
}

impl StyleRanking {
    /// Rank the distinct styles of `candidates`: larger first, bold before
    /// regular at equal size. Only the first `max_levels` styles get a level.
    pub fn new<'a>(
        candidates: impl IntoIterator<Item = &'a Line>,
        max_levels: Option<usize>,
    ) -> Self {
        let mut styles: Vec<StyleKey> = Vec::new();
        for line in candidates {
            let style = line.style();
            if !styles.contains(&style) {
                styles.push(style);
            }
        }
        styles.sort_by(|a, b| b.size_tenths.cmp(&a.size_tenths).then(b.bold.cmp(&a.bold)));

        let limit = max_levels.unwrap_or(styles.len());
        let levels = styles
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(rank, style)| (style, HeadingLevel::from_rank(rank)))
            .collect();
        Self { levels }
    }

    /// Level of a style, if ranked.
    pub fn level(&self, style: &StyleKey) -> Option<HeadingLevel> {
        self.levels.get(style).copied()
    }

    /// Number of ranked styles.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if no style is ranked.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Level from similarity to exemplar headings.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    exemplars: Vec<(HeadingLevel, Vec<Vec<f32>>)>,
    threshold: f32,
}

impl SemanticMatcher {
    /// Embed the exemplar sets once.
    pub fn new(embedder: Arc<dyn Embedder>, options: &OutlineOptions) -> Result<Self> {
        let mut exemplars = Vec::with_capacity(options.exemplars.len());
        for set in &options.exemplars {
            let samples: Vec<&str> = set.samples.iter().map(String::as_str).collect();
            exemplars.push((set.level, embedder.embed_batch(&samples)?));
        }
        Ok(Self {
            embedder,
            exemplars,
            threshold: options.semantic_threshold,
        })
    }

    /// Level of the best-matching set, if its best similarity reaches the
    /// threshold.
    pub fn level(&self, text: &str) -> Result<Option<HeadingLevel>> {
        let vector = self.embedder.embed(text)?;

        let mut best_level = None;
        let mut best_score = 0.0_f32;
        for (level, samples) in &self.exemplars {
            let score = samples
                .iter()
                .map(|s| cosine_similarity(&vector, s))
                .fold(f32::MIN, f32::max);
            if score > best_score {
                best_score = score;
                best_level = Some(*level);
            }
        }

        if best_score >= self.threshold {
            Ok(best_level)
        } else {
            log::debug!(
                "No exemplar match for {:?} (best {:.2} < {:.2})",
                text,
                best_score,
                self.threshold
            );
            Ok(None)
        }
    }
}

/// Classifies heading candidates into outline entries.
pub struct HeadingClassifier {
    numbering: NumberingRule,
    semantic: SemanticMatcher,
    trailing_page: Regex,
    max_chars: usize,
    max_style_levels: Option<usize>,
    rules: Vec<LevelRule>,
}

impl HeadingClassifier {
    /// Create a classifier with the default rule chain.
    pub fn new(embedder: Arc<dyn Embedder>, options: &OutlineOptions) -> Result<Self> {
        Ok(Self {
            numbering: NumberingRule::new(),
            semantic: SemanticMatcher::new(embedder, options)?,
            trailing_page: Regex::new(r"\s+\d+$").unwrap(),
            max_chars: options.max_heading_chars,
            max_style_levels: options.max_style_levels,
            rules: LevelRule::CHAIN.to_vec(),
        })
    }

    /// Replace the rule chain.
    pub fn with_rules(mut self, rules: Vec<LevelRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Whether `line` is a heading candidate against `body`.
    pub fn is_candidate(&self, line: &Line, body: &StyleKey) -> bool {
        line.style().dominates(body) && line.char_len() < self.max_chars
    }

    /// The heading candidates among `lines`, in order.
    pub fn candidates<'a>(&self, lines: &'a [Line], body: &StyleKey) -> Vec<&'a Line> {
        lines.iter().filter(|l| self.is_candidate(l, body)).collect()
    }

    /// Classify the headings of a document.
    ///
    /// The result is ordered by (page, vertical position) and heading texts
    /// have any trailing page number removed.
    pub fn classify(&self, lines: &[Line], body: &StyleKey) -> Result<Vec<OutlineEntry>> {
        let candidates = self.candidates(lines, body);
        let ranking = StyleRanking::new(candidates.iter().copied(), self.max_style_levels);
        log::debug!(
            "{} heading candidates in {} ranked styles",
            candidates.len(),
            ranking.len()
        );

        let mut entries = Vec::new();
        for line in candidates {
            if let Some(level) = self.assign_level(line, &ranking)? {
                entries.push(OutlineEntry::new(
                    level,
                    self.strip_page_suffix(&line.text),
                    line.page,
                    line.top,
                ));
            }
        }

        entries.sort_by(|a, b| a.page.cmp(&b.page).then(a.top.cmp(&b.top)));
        Ok(entries)
    }

    fn assign_level(&self, line: &Line, ranking: &StyleRanking) -> Result<Option<HeadingLevel>> {
        for rule in &self.rules {
            let level = match rule {
                LevelRule::Numbering => self.numbering.level(&line.text),
                LevelRule::StyleRank => ranking.level(&line.style()),
                LevelRule::Semantic => self.semantic.level(&line.text)?,
            };
            if level.is_some() {
                return Ok(level);
            }
        }
        Ok(None)
    }

    fn strip_page_suffix(&self, text: &str) -> String {
        self.trailing_page.replace(text, "").trim().to_string()
    }
}
