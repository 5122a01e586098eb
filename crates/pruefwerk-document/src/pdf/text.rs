// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream text interpreter: walks the text operators of one page and
// turns every shown string into whitespace-delimited word tokens with an
// estimated bounding box in top-left page space.
//
// Glyph widths are not read from the font; every glyph advances half the
// font size. Good enough to position words consistently between two
// renderings of the same template.

use lopdf::Object;
use lopdf::content::Operation;
use pruefwerk_core::types::{BBox, Token};

/// Advance of one glyph, as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.5;

/// A `TJ` adjustment wider than this fraction of the font size reads as a
/// word break.
const GAP_AS_SPACE: f64 = 0.25;

/// Affine text matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// `translate(tx, ty) x self`.
    fn translated(self, tx: f64, ty: f64) -> Self {
        let [a, b, c, d, e, f] = self.0;
        Self([a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d])
    }

    fn origin(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }

    fn x_scale(&self) -> f64 {
        self.0[0].hypot(self.0[1])
    }

    fn y_scale(&self) -> f64 {
        self.0[2].hypot(self.0[3])
    }
}

/// Word being assembled from consecutive glyphs, in PDF user space.
#[derive(Debug)]
struct PendingWord {
    text: String,
    x0: f64,
    x1: f64,
    baseline: f64,
    height: f64,
}

/// Text state for a single page's content stream.
pub(crate) struct TextExtractor {
    page_height: f64,
    matrix: Matrix,
    line_matrix: Matrix,
    font_size: f64,
    leading: f64,
    char_spacing: f64,
    word_spacing: f64,
    word: Option<PendingWord>,
    tokens: Vec<Token>,
}

impl TextExtractor {
    pub(crate) fn new(page_height: f64) -> Self {
        Self {
            page_height,
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            word: None,
            tokens: Vec::new(),
        }
    }

    /// Run every operation, then return the tokens in stream order.
    pub(crate) fn run(mut self, operations: &[Operation]) -> Vec<Token> {
        for op in operations {
            self.apply(op);
        }
        self.flush();
        self.tokens
    }

    fn apply(&mut self, op: &Operation) {
        let num = |i: usize| op.operands.get(i).and_then(number);
        match op.operator.as_str() {
            "BT" => {
                self.flush();
                self.matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.flush(),
            "Tf" => {
                if let Some(size) = num(1) {
                    self.font_size = size;
                }
            }
            "TL" => self.leading = num(0).unwrap_or(self.leading),
            "Tc" => self.char_spacing = num(0).unwrap_or(self.char_spacing),
            "Tw" => self.word_spacing = num(0).unwrap_or(self.word_spacing),
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                let values: Option<Vec<f64>> = (0..6).map(num).collect();
                if let Some(v) = values {
                    self.flush();
                    let m = Matrix([v[0], v[1], v[2], v[3], v[4], v[5]]);
                    self.matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes);
                }
                self.flush();
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes);
                }
                self.flush();
            }
            "\"" => {
                self.word_spacing = num(0).unwrap_or(self.word_spacing);
                self.char_spacing = num(1).unwrap_or(self.char_spacing);
                self.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    self.show(bytes);
                }
                self.flush();
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    self.kern(adjust);
                                }
                            }
                        }
                    }
                }
                self.flush();
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.flush();
        self.line_matrix = self.line_matrix.translated(tx, ty);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// `TJ` number: thousandths of text space, subtracted from the advance.
    fn kern(&mut self, adjust: f64) {
        let tx = -adjust / 1000.0 * self.font_size;
        if tx > GAP_AS_SPACE * self.font_size {
            self.flush();
        }
        self.matrix = self.matrix.translated(tx, 0.0);
    }

    fn show(&mut self, bytes: &[u8]) {
        for ch in decode_text(bytes).chars() {
            let mut advance = GLYPH_ADVANCE * self.font_size + self.char_spacing;
            if ch.is_whitespace() {
                self.flush();
                if ch == ' ' {
                    advance += self.word_spacing;
                }
            } else {
                self.push_glyph(ch, advance);
            }
            self.matrix = self.matrix.translated(advance, 0.0);
        }
    }

    fn push_glyph(&mut self, ch: char, advance: f64) {
        let (x, y) = self.matrix.origin();
        let right = x + advance.max(0.0) * self.matrix.x_scale();
        let height = self.font_size * self.matrix.y_scale();
        match &mut self.word {
            Some(word) => {
                word.text.push(ch);
                word.x1 = word.x1.max(right);
                word.height = word.height.max(height);
            }
            None => {
                self.word = Some(PendingWord {
                    text: ch.to_string(),
                    x0: x,
                    x1: right,
                    baseline: y,
                    height,
                })
            }
        }
    }

    fn flush(&mut self) {
        if let Some(word) = self.word.take() {
            let bottom = self.page_height - word.baseline;
            let top = bottom - word.height;
            self.tokens
                .push(Token::new(word.text, BBox::new(word.x0, top, word.x1, bottom)));
        }
    }
}

/// Numeric operand as `f64`.
pub(crate) fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise one byte per character.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|b| char::from(*b)).collect(),
    }
}
