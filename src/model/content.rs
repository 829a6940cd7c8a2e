//! Positioned text as delivered by a document reader.

use serde::{Deserialize, Serialize};

/// Whether a font name denotes a bold face.
pub fn is_bold_font(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    name.contains("bold") || name.contains("black") || name.contains("heavy")
}

/// A word with its position and font on a page.
///
/// `top` is measured downwards from the top edge of the page, so smaller
/// values are closer to the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedWord {
    /// Word text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Distance of the word's top edge from the top of the page
    pub top: f32,
    /// Left edge
    pub x0: f32,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font: String,
}

impl PositionedWord {
    /// Create a new positioned word.
    pub fn new(
        text: impl Into<String>,
        page: u32,
        top: f32,
        x0: f32,
        size: f32,
        font: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            page,
            top,
            x0,
            size,
            font: font.into(),
        }
    }

    /// Whether the word is set in a bold face.
    pub fn is_bold(&self) -> bool {
        is_bold_font(&self.font)
    }
}

/// A run of text in a single font, as part of a [`TextBlock`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name
    #[serde(default)]
    pub font: String,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size,
            font: font.into(),
        }
    }
}

/// A visually grouped block of text (paragraph or heading).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Spans in reading order
    pub spans: Vec<TextSpan>,
}

impl TextBlock {
    /// Create a block from spans.
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Span texts joined by single spaces, trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Size of the first span, which stands for the whole block.
    pub fn leading_size(&self) -> Option<f32> {
        self.spans.first().map(|s| s.size)
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// Text content of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    #[serde(default)]
    pub width: f32,
    /// Page height in points
    #[serde(default)]
    pub height: f32,
    /// Words in content order
    #[serde(default)]
    pub words: Vec<PositionedWord>,
    /// Text blocks in reading order
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl PageContent {
    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self {
            number,
            width: 612.0,
            height: 792.0,
            words: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Add a word to the page, stamping it with this page's number.
    pub fn push_word(&mut self, mut word: PositionedWord) {
        word.page = self.number;
        self.words.push(word);
    }

    /// Add a block to the page.
    pub fn push_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }
}

/// Everything the core needs to know about one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Document identifier (usually the file name)
    #[serde(default)]
    pub id: String,
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<PageContent>,
}

impl DocumentContent {
    /// Create an empty document.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pages: Vec::new(),
        }
    }

    /// Add a page.
    pub fn add_page(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Total number of words over all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }

    /// Check if the document carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.pages
            .iter()
            .all(|p| p.words.is_empty() && p.blocks.iter().all(TextBlock::is_empty))
    }
}
