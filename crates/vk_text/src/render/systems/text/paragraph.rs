//! Paragraph layout
//!
//! Places every drawable glyph of a paragraph relative to the pen origin of
//! its first row. Rows run downwards (y decreases by one font size per row)
//! and each row is shifted left by a fraction of its own measured width
//! according to the horizontal alignment.
//!
//! ```text
//! (0,0) ─► first baseline       Left:   |row 0
//!          y = -font_size       Center:  row 0
//!          y = -2*font_size     Right:   row 0|
//! ```
//!
//! A word wider than the whole row width is wrapped over as many rows as it
//! needs; the text following it starts on a fresh row.

use serde::{Deserialize, Serialize};

use crate::core::config::BASE_FONT_HEIGHT;
use crate::render::Color;

use super::error::FontResult;
use super::text_layout::{next_word, RowBreak, RowEnd, TextMeasure};

/// Horizontal placement of each row relative to the pen x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    /// Rows start at the pen x
    #[default]
    Left,
    /// Rows are centered on the pen x
    Center,
    /// Rows end at the pen x
    Right,
}

impl HorizontalAlignment {
    /// Fraction of the row width the row start moves left by
    pub const fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Vertical placement of the paragraph block relative to the pen y
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlignment {
    /// First baseline sits on the pen y, the block hangs below it
    #[default]
    Top,
    /// Block is centered on the pen y
    Center,
    /// Block sits on top of the pen y
    Bottom,
}

impl VerticalAlignment {
    /// Fraction of the block height the first baseline moves up by
    pub const fn factor(self) -> f32 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

/// Appearance and wrapping of one render call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph color shared by the whole call
    pub color: Color,
    /// Font size in pixels
    pub size: f32,
    /// Maximum row width in pixels
    pub row_width: f32,
    /// Horizontal alignment of each row
    pub halign: HorizontalAlignment,
    /// Vertical alignment of the block
    pub valign: VerticalAlignment,
}

impl TextStyle {
    /// Unwrapped, top-left aligned white text at `size` pixels
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the glyph color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Wrap rows at `row_width` pixels
    pub fn with_row_width(mut self, row_width: f32) -> Self {
        self.row_width = row_width;
        self
    }

    /// Set both alignments
    pub fn with_alignment(mut self, halign: HorizontalAlignment, valign: VerticalAlignment) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: BASE_FONT_HEIGHT,
            row_width: f32::INFINITY,
            halign: HorizontalAlignment::Left,
            valign: VerticalAlignment::Top,
        }
    }
}

/// Pen position of one drawable glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// The character
    pub ch: char,
    /// Pen x relative to the paragraph origin
    pub x: f32,
    /// Baseline y relative to the paragraph origin
    pub y: f32,
}

/// Result of laying out a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    /// Drawable glyphs in reading order
    pub glyphs: Vec<PlacedGlyph>,
    /// Number of rows, at least one
    pub rows: usize,
    /// Row height in pixels
    pub font_size: f32,
}

impl ParagraphLayout {
    /// Height of the block
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.font_size
    }
}

/// A row placed by [`lay_out_row`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRow {
    /// Aligned x the row starts at
    pub start_x: f32,
    /// Row decision
    pub row: RowBreak,
}

/// Result of [`lay_out_word_multiline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordWrap {
    /// Pen x after the word's last character
    pub end_x: f32,
    /// How far below the starting baseline the last line sits
    pub displacement: f32,
    /// Number of lines the word occupies
    pub lines: usize,
}

/// Lay out the row starting at `text[0]` on the baseline `y`
pub fn lay_out_row(
    measure: &TextMeasure<'_>,
    text: &[char],
    y: f32,
    row_width: f32,
    halign: HorizontalAlignment,
    glyphs: &mut Vec<PlacedGlyph>,
) -> FontResult<PlacedRow> {
    let row = measure.break_row(text, row_width)?;
    let start_x = -measure.measured_width(text, &row, row_width)? * halign.factor();

    let mut x = start_x;
    for &ch in &text[..row.len] {
        if !ch.is_whitespace() {
            glyphs.push(PlacedGlyph { ch, x, y });
        }
        x += measure.char_width(ch)?;
    }

    Ok(PlacedRow { start_x, row })
}

/// Lay out a single word over as many rows as it needs, starting on `y`
pub fn lay_out_word_multiline(
    measure: &TextMeasure<'_>,
    word: &[char],
    y: f32,
    row_width: f32,
    halign: HorizontalAlignment,
    glyphs: &mut Vec<PlacedGlyph>,
) -> FontResult<WordWrap> {
    let mut rest = word;
    let mut line_y = y;
    let mut lines = 0;

    loop {
        let placed = lay_out_row(measure, rest, line_y, row_width, halign, glyphs)?;
        lines += 1;
        rest = &rest[placed.row.consumed()..];

        if rest.is_empty() {
            return Ok(WordWrap {
                end_x: placed.start_x + placed.row.width,
                displacement: y - line_y,
                lines,
            });
        }
        line_y -= measure.font_size();
    }
}

/// Lay out a paragraph wrapped at `row_width`
pub fn lay_out(
    measure: &TextMeasure<'_>,
    text: &str,
    row_width: f32,
    halign: HorizontalAlignment,
) -> FontResult<ParagraphLayout> {
    let chars: Vec<char> = text.chars().collect();
    let mut rest = chars.as_slice();
    let mut glyphs = Vec::with_capacity(chars.len());
    let mut rows = 1;
    let mut y = 0.0;

    while !rest.is_empty() {
        let word = next_word(rest);

        let (consumed, newline) = if !word.is_empty() && measure.word_width(word)? > row_width {
            let wrap = lay_out_word_multiline(measure, word, y, row_width, halign, &mut glyphs)?;
            y -= wrap.displacement;
            rows += wrap.lines - 1;

            let separator = rest.get(word.len()).copied();
            (word.len() + usize::from(separator.is_some()), separator == Some('\n'))
        } else {
            let placed = lay_out_row(measure, rest, y, row_width, halign, &mut glyphs)?;
            (placed.row.consumed(), placed.row.end == RowEnd::Newline)
        };

        rest = &rest[consumed..];
        if rest.is_empty() && !newline {
            break;
        }
        y -= measure.font_size();
        rows += 1;
    }

    Ok(ParagraphLayout {
        glyphs,
        rows,
        font_size: measure.font_size(),
    })
}

impl TextMeasure<'_> {
    /// Number of rows `text` occupies when wrapped at `row_width`
    ///
    /// Always at least one. Counts exactly the rows [`lay_out`] produces.
    pub fn row_count(&self, text: &str, row_width: f32) -> FontResult<usize> {
        Ok(lay_out(self, text, row_width, HorizontalAlignment::Left)?.rows)
    }
}
