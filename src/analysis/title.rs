//! Document title detection.

use crate::model::{Line, StyleKey};

/// Picks the title from the large-type lines at the top of page 1.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    header_zone: f32,
    size_weight: f32,
    bold_bonus: f32,
}

impl TitleDetector {
    /// Create a detector.
    ///
    /// Only lines on page 1 whose band is above `header_zone` are
    /// considered; each scores `size * size_weight`, plus `bold_bonus` when
    /// bold.
    pub fn new(header_zone: f32, size_weight: f32, bold_bonus: f32) -> Self {
        Self {
            header_zone,
            size_weight,
            bold_bonus,
        }
    }

    fn score(&self, line: &Line) -> f32 {
        line.size * self.size_weight + if line.bold { self.bold_bonus } else { 0.0 }
    }

    /// Find the title line. It must be strictly larger than body text.
    pub fn detect<'a>(&self, lines: &'a [Line], body: &StyleKey) -> Option<&'a Line> {
        let mut best: Option<(&Line, f32)> = None;
        for line in lines
            .iter()
            .filter(|l| l.page == 1 && (l.top as f32) < self.header_zone)
        {
            let score = self.score(line);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((line, score));
            }
        }

        let (line, score) = best?;
        if line.size > body.size() {
            log::debug!("Title {:?} (score {:.1})", line.text, score);
            Some(line)
        } else {
            log::debug!(
                "Rejected title candidate {:?}: size {:.1} <= body {:.1}",
                line.text,
                line.size,
                body.size()
            );
            None
        }
    }

    /// Detect the title and remove every line carrying its text.
    ///
    /// Returns an empty string when there is no title.
    pub fn extract(&self, lines: &mut Vec<Line>, body: &StyleKey) -> String {
        let title = match self.detect(lines, body) {
            Some(line) => line.text.clone(),
            None => return String::new(),
        };
        lines.retain(|l| l.text != title);
        title
    }
}

impl Default for TitleDetector {
    fn default() -> Self {
        Self::new(200.0, 1.5, 2.0)
    }
}
