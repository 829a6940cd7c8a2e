//! Page layout: glyph runs → positioned words, lines and text blocks.

use super::interpreter::{is_spaceless_script_char, GlyphRun};
use crate::model::{PageContent, PositionedWord, TextBlock, TextSpan};

/// Ascender height as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// Glyph runs sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Runs sorted by x
    pub runs: Vec<GlyphRun>,
    /// Baseline of the first run
    pub y: f32,
    /// Leftmost x
    pub x: f32,
    /// Character-weighted font size
    pub font_size: f32,
}

impl TextLine {
    /// Build a line from runs; `None` when there are none.
    pub fn from_runs(mut runs: Vec<GlyphRun>) -> Option<Self> {
        runs.sort_by(|a, b| a.x.total_cmp(&b.x));
        let first = runs.first()?;
        let (y, x) = (first.y, first.x);

        let total: usize = runs.iter().map(|r| r.text.chars().count()).sum();
        let font_size = if total > 0 {
            runs.iter()
                .map(|r| r.size * r.text.chars().count() as f32)
                .sum::<f32>()
                / total as f32
        } else {
            first.size
        };

        Some(Self {
            runs,
            y,
            x,
            font_size,
        })
    }

    /// Words of the line in top-down page coordinates.
    pub fn words(&self, page_height: f32) -> Vec<PositionedWord> {
        let mut words = Vec::new();
        let mut current: Option<PositionedWord> = None;

        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 && needs_space(&self.runs[i - 1], run) {
                words.extend(current.take());
            }
            let top = page_height - run.y - ASCENT * run.size;
            let char_width = run.char_width();

            for (offset, ch) in run.text.chars().enumerate() {
                if ch.is_whitespace() {
                    words.extend(current.take());
                    continue;
                }
                match current.as_mut() {
                    Some(word) => {
                        word.text.push(ch);
                        if run.size > word.size {
                            word.size = run.size;
                            word.top = top;
                            word.font = run.font.clone();
                        }
                    }
                    None => {
                        current = Some(PositionedWord::new(
                            ch.to_string(),
                            0,
                            top,
                            run.x + offset as f32 * char_width,
                            run.size,
                            run.font.clone(),
                        ));
                    }
                }
            }
        }
        words.extend(current);
        words
    }

    /// Spans of the line: consecutive runs in the same font and size merged.
    pub fn spans(&self) -> Vec<TextSpan> {
        let mut spans: Vec<TextSpan> = Vec::new();
        for (i, run) in self.runs.iter().enumerate() {
            match spans.last_mut() {
                Some(span) if span.font == run.font && (span.size - run.size).abs() < 0.01 => {
                    if needs_space(&self.runs[i - 1], run) {
                        span.text.push(' ');
                    }
                    span.text.push_str(&run.text);
                }
                _ => spans.push(TextSpan::new(run.text.clone(), run.size, run.font.clone())),
            }
        }
        for span in &mut spans {
            span.text = span.text.trim().to_string();
        }
        spans.retain(|s| !s.text.is_empty());
        spans
    }
}

/// Whether a space separates two adjacent runs on a line.
fn needs_space(prev: &GlyphRun, next: &GlyphRun) -> bool {
    if prev.text.ends_with(char::is_whitespace) || next.text.starts_with(char::is_whitespace) {
        return false;
    }
    let gap = next.x - prev.end();
    if gap <= next.char_width() * 0.2 {
        return false;
    }
    let spaceless = |c: Option<char>| c.is_some_and(is_spaceless_script_char);
    !(spaceless(prev.text.chars().last()) && spaceless(next.text.chars().next()))
}

/// Group runs into lines, top to bottom.
///
/// Runs whose baselines differ by at most 30% of the font size share a line.
pub fn group_runs_into_lines(mut runs: Vec<GlyphRun>) -> Vec<TextLine> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<GlyphRun> = Vec::new();
    let mut current_y: Option<f32> = None;

    for run in runs {
        let tolerance = run.size * 0.3;
        match current_y {
            Some(y) if (run.y - y).abs() <= tolerance => current.push(run),
            _ => {
                lines.extend(TextLine::from_runs(std::mem::take(&mut current)));
                current_y = Some(run.y);
                current.push(run);
            }
        }
    }
    lines.extend(TextLine::from_runs(current));
    lines
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        12.0
    } else {
        spacings.iter().sum::<f32>() / spacings.len() as f32
    }
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    (prev.y - curr.y).abs() > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Group lines into blocks on spacing, size and indentation changes.
pub fn group_lines_into_blocks(lines: &[TextLine]) -> Vec<TextBlock> {
    let avg_spacing = average_line_spacing(lines);
    let mut blocks = Vec::new();
    let mut spans: Vec<TextSpan> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if i > 0 && should_break_block(&lines[i - 1], line, avg_spacing) && !spans.is_empty() {
            blocks.push(TextBlock::new(std::mem::take(&mut spans)));
        }
        spans.extend(line.spans());
    }
    if !spans.is_empty() {
        blocks.push(TextBlock::new(spans));
    }
    blocks
}

/// Lay out the runs of one page.
pub fn layout_page(number: u32, width: f32, height: f32, runs: Vec<GlyphRun>) -> PageContent {
    let lines = group_runs_into_lines(runs);
    let mut page = PageContent {
        number,
        width,
        height,
        words: Vec::new(),
        blocks: group_lines_into_blocks(&lines),
    };
    for line in &lines {
        for word in line.words(height) {
            page.push_word(word);
        }
    }
    log::debug!(
        "Page {}: {} lines, {} words, {} blocks",
        number,
        lines.len(),
        page.words.len(),
        page.blocks.len()
    );
    page
}
