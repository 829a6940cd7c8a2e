//! Body style profiling.

use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{Line, StyleKey};

/// Most frequent value of a sequence; ties go to the value seen first.
pub fn most_common<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut order: Vec<T> = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in order {
        let count = counts[&value];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Computes the body style of a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleProfiler;

impl StyleProfiler {
    /// The most frequent style over all lines, or `None` for a document
    /// without lines.
    pub fn body_style(lines: &[Line]) -> Option<StyleKey> {
        let body = most_common(lines.iter().map(Line::style));
        if let Some(style) = body {
            log::debug!("Body style {} over {} lines", style, lines.len());
        }
        body
    }
}
