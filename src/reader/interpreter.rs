//! Content stream interpretation into positioned glyph runs.

use std::collections::HashMap;

use super::backend::{ContentOp, PdfValue};

/// TJ adjustments (thousandths of text space) above this are word gaps.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size.
pub const AVG_CHAR_WIDTH: f32 = 0.5;

/// Unscaled advance of `text` at `font_size`.
fn estimated_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * AVG_CHAR_WIDTH * font_size
}

/// Text shown by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// Decoded text
    pub text: String,
    /// Left edge in user space
    pub x: f32,
    /// Baseline in user space (origin bottom-left)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size
    pub size: f32,
    /// Base font name
    pub font: String,
}

impl GlyphRun {
    /// Right edge.
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    /// Estimated width of one character.
    pub fn char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars > 0 && self.width > 0.0 {
            self.width / chars as f32
        } else {
            self.size * AVG_CHAR_WIDTH
        }
    }
}

/// 2D affine matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Self {
        Self {
            a: op.number(0, 1.0),
            b: op.number(1, 0.0),
            c: op.number(2, 0.0),
            d: op.number(3, 1.0),
            e: op.number(4, 0.0),
            f: op.number(5, 0.0),
        }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Text state between BT and ET.
#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    font_resource: Vec<u8>,
    font: String,
    font_size: f32,
    leading: Option<f32>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_resource: Vec::new(),
            font: String::new(),
            font_size: 12.0,
            leading: None,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.matrix = Matrix::translation(tx, 0.0).then(&self.matrix);
    }
}

/// Walks content stream operations and yields the text they show.
pub struct ContentInterpreter<'a> {
    fonts: &'a HashMap<Vec<u8>, String>,
}

impl<'a> ContentInterpreter<'a> {
    /// Create an interpreter for a page with the given font resources
    /// (resource name → base font name).
    pub fn new(fonts: &'a HashMap<Vec<u8>, String>) -> Self {
        Self { fonts }
    }

    /// Interpret `ops`. `decode` turns a string operand into text given the
    /// current font resource name.
    pub fn run<D>(&self, ops: &[ContentOp], decode: D) -> Vec<GlyphRun>
    where
        D: Fn(&[u8], &[u8]) -> String,
    {
        let mut runs = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut saved: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => ctm = saved.pop().unwrap_or(Matrix::IDENTITY),
                "cm" if op.operands.len() >= 6 => ctm = Matrix::from_op(op).then(&ctm),
                "BT" => {
                    in_text = true;
                    state.begin();
                }
                "ET" => in_text = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let PdfValue::Name(name) = &op.operands[0] {
                        state.font = self
                            .fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        state.font_resource = name.clone();
                    }
                    state.font_size = op.number(1, 12.0);
                }
                "TL" => state.leading = op.operands.first().and_then(PdfValue::as_number),
                "Td" if op.operands.len() >= 2 => {
                    state.move_line(op.number(0, 0.0), op.number(1, 0.0))
                }
                "TD" if op.operands.len() >= 2 => {
                    let ty = op.number(1, 0.0);
                    state.leading = Some(-ty);
                    state.move_line(op.number(0, 0.0), ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    state.line_matrix = Matrix::from_op(op);
                    state.matrix = state.line_matrix;
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        state.next_line();
                    }
                    if !in_text {
                        continue;
                    }
                    let operand = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(value) = op.operands.get(operand) {
                        if let Some(run) = self.show(value, &mut state, &ctm, &decode) {
                            runs.push(run);
                        }
                    }
                }
                _ => {}
            }
        }

        log::trace!("{} ops -> {} glyph runs", ops.len(), runs.len());
        runs
    }

    fn show<D>(
        &self,
        value: &PdfValue,
        state: &mut TextState,
        ctm: &Matrix,
        decode: &D,
    ) -> Option<GlyphRun>
    where
        D: Fn(&[u8], &[u8]) -> String,
    {
        let start = state.matrix.then(ctm);
        let mut text = String::new();
        // Advance in unscaled text space units
        let mut advance = 0.0_f32;

        match value {
            PdfValue::Str(bytes) => {
                let decoded = decode(&state.font_resource, bytes);
                advance += estimated_width(&decoded, state.font_size);
                text.push_str(&decoded);
            }
            PdfValue::Array(items) => {
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => {
                            let decoded = decode(&state.font_resource, bytes);
                            advance += estimated_width(&decoded, state.font_size);
                            text.push_str(&decoded);
                        }
                        other => {
                            let Some(adjust) = other.as_number() else {
                                continue;
                            };
                            advance -= adjust / 1000.0 * state.font_size;
                            if -adjust > TJ_SPACE_THRESHOLD
                                && !text.is_empty()
                                && !text.ends_with(char::is_whitespace)
                                && !text.chars().last().is_some_and(is_spaceless_script_char)
                            {
                                text.push(' ');
                            }
                        }
                    }
                }
            }
            _ => return None,
        }

        state.advance(advance);
        if text.trim().is_empty() {
            return None;
        }

        Some(GlyphRun {
            text,
            x: start.e,
            y: start.f,
            width: advance * start.horizontal_scale(),
            size: state.font_size * start.vertical_scale(),
            font: state.font.clone(),
        })
    }
}

/// Whether `c` belongs to a script written without word spaces (Chinese,
/// Japanese kana and CJK punctuation). Hangul is not included.
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::backend::decode_text_simple;

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp::new(operator, operands)
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    fn fonts() -> HashMap<Vec<u8>, String> {
        let mut fonts = HashMap::new();
        fonts.insert(b"F1".to_vec(), "Helvetica-Bold".to_string());
        fonts.insert(b"F2".to_vec(), "Helvetica".to_string());
        fonts
    }

    fn run(ops: Vec<ContentOp>) -> Vec<GlyphRun> {
        let fonts = fonts();
        ContentInterpreter::new(&fonts).run(&ops, |_, b| decode_text_simple(b))
    }

    #[test]
    fn test_tf_td_tj() {
        let runs = run(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(18.0)]),
            op("Td", vec![num(72.0), num(700.0)]),
            op("Tj", vec![s("Title")]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("Td", vec![num(0.0), num(-30.0)]),
            op("Tj", vec![s("Body")]),
            op("ET", vec![]),
        ]);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Title");
        assert_eq!(runs[0].font, "Helvetica-Bold");
        assert_eq!((runs[0].x, runs[0].y, runs[0].size), (72.0, 700.0, 18.0));
        assert_eq!(runs[1].y, 670.0);
        assert_eq!(runs[1].x, 72.0);
        assert_eq!(runs[1].font, "Helvetica");
    }

    #[test]
    fn test_tm_scales_font_size() {
        let runs = run(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(1.0)]),
            op("Tm", vec![num(14.0), num(0.0), num(0.0), num(14.0), num(50.0), num(500.0)]),
            op("Tj", vec![s("Scaled")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].size, 14.0);
        assert_eq!((runs[0].x, runs[0].y), (50.0, 500.0));
    }

    #[test]
    fn test_tj_array_spacing() {
        let runs = run(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    s("Hello"),
                    PdfValue::Integer(-250),
                    s("world"),
                    PdfValue::Integer(-20),
                    s("!"),
                ])],
            ),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].text, "Hello world!");
    }

    #[test]
    fn test_consecutive_tj_advance() {
        let runs = run(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("Td", vec![num(100.0), num(400.0)]),
            op("Tj", vec![s("abcd")]),
            op("Tj", vec![s("efgh")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].width, 20.0);
        assert_eq!(runs[1].x, 120.0);
        assert_eq!(runs[1].y, 400.0);
    }

    #[test]
    fn test_leading_and_quote_operators() {
        let runs = run(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("TL", vec![num(15.0)]),
            op("Td", vec![num(72.0), num(600.0)]),
            op("Tj", vec![s("one")]),
            op("'", vec![s("two")]),
            op("T*", vec![]),
            op("\"", vec![num(0.0), num(0.0), s("three")]),
            op("ET", vec![]),
        ]);
        let ys: Vec<f32> = runs.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![600.0, 585.0, 555.0]);
        assert!(runs.iter().all(|r| r.x == 72.0));
    }

    #[test]
    fn test_cm_translates_text() {
        let runs = run(vec![
            op("q", vec![]),
            op("cm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(10.0), num(20.0)]),
            op("BT", vec![]),
            op("Td", vec![num(5.0), num(5.0)]),
            op("Tj", vec![s("moved")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![num(5.0), num(5.0)]),
            op("Tj", vec![s("back")]),
            op("ET", vec![]),
        ]);
        assert_eq!((runs[0].x, runs[0].y), (15.0, 25.0));
        assert_eq!((runs[1].x, runs[1].y), (5.0, 5.0));
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let runs = run(vec![op("Tj", vec![s("stray")]), op("BT", vec![]), op("Tj", vec![s("  ")])]);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
