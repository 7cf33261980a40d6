//! Row and word layout engine
//!
//! Pure measuring over a font's [`GlyphMetrics`]. A word is a maximal run of
//! non-whitespace characters. `'\n'` ends a row; every other whitespace
//! character measures as a space.
//!
//! All row decisions go through [`TextMeasure::break_row`], so measuring,
//! counting and placing rows can never disagree about where a row ends.

use super::error::FontResult;
use super::metrics::GlyphMetrics;

/// How a row produced by [`TextMeasure::break_row`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEnd {
    /// The text ran out
    Exhausted,
    /// An explicit `'\n'`
    Newline,
    /// A space that did not fit in the remaining width
    Space,
    /// A word that did not fit and moves to the next row whole
    Deferred,
    /// The row's first word was too wide and was cut after `len` characters
    SplitWord,
}

/// One row's worth of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBreak {
    /// Width of the row's content in pixels
    pub width: f32,
    /// Characters belonging to the row
    pub len: usize,
    /// Separator characters consumed after the row without being drawn
    pub skip: usize,
    /// Why the row ended
    pub end: RowEnd,
}

impl RowBreak {
    /// Characters to advance past before the next row starts
    pub const fn consumed(&self) -> usize {
        self.len + self.skip
    }
}

/// Leading word of `text`, empty when `text` starts with whitespace
pub fn next_word(text: &[char]) -> &[char] {
    let len = text.iter().take_while(|ch| !ch.is_whitespace()).count();
    &text[..len]
}

/// Metrics of one font viewed at one font size
#[derive(Debug, Clone, Copy)]
pub struct TextMeasure<'a> {
    metrics: &'a GlyphMetrics,
    font_size: f32,
    scale: f32,
}

impl<'a> TextMeasure<'a> {
    /// Measure text set at `font_size` pixels
    pub fn new(metrics: &'a GlyphMetrics, font_size: f32) -> Self {
        Self {
            metrics,
            font_size,
            scale: metrics.scale(font_size),
        }
    }

    /// Font size in pixels, which is also the row height
    pub const fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Factor mapping base-height pixels to this font size
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Metrics being measured against
    pub const fn metrics(&self) -> &'a GlyphMetrics {
        self.metrics
    }

    /// Pen advance of a single character
    pub fn char_width(&self, ch: char) -> FontResult<f32> {
        let glyph = match ch {
            '\n' => return Ok(0.0),
            ch if ch.is_whitespace() => ' ',
            ch => ch,
        };
        Ok(self.metrics.get(glyph)?.advance_px() * self.scale)
    }

    /// Total advance of `word`
    pub fn word_width(&self, word: &[char]) -> FontResult<f32> {
        word.iter().try_fold(0.0, |width, &ch| Ok(width + self.char_width(ch)?))
    }

    fn fit_prefix(&self, word: &[char], row_width: f32) -> FontResult<(usize, f32)> {
        let mut width = 0.0;
        for (len, &ch) in word.iter().enumerate() {
            let advance = self.char_width(ch)?;
            if width + advance >= row_width {
                return Ok((len, width));
            }
            width += advance;
        }
        Ok((word.len(), width))
    }

    /// Longest prefix of `word` whose advance stays strictly under `row_width`
    ///
    /// May be empty when not even the first character fits.
    pub fn row_subword<'t>(&self, word: &'t [char], row_width: f32) -> FontResult<&'t [char]> {
        let (len, _) = self.fit_prefix(word, row_width)?;
        Ok(&word[..len])
    }

    /// Advance of [`row_subword`](Self::row_subword)
    pub fn row_subword_width(&self, word: &[char], row_width: f32) -> FontResult<f32> {
        let (_, width) = self.fit_prefix(word, row_width)?;
        Ok(width)
    }

    /// Decide where the row starting at `text[0]` ends
    ///
    /// Words and spaces are taken while they fit in what is left of
    /// `row_width`. A word that does not fit moves to the next row, unless it
    /// starts the row, in which case it is cut to its fitting prefix. At
    /// least one character is always taken so callers make progress.
    pub fn break_row(&self, text: &[char], row_width: f32) -> FontResult<RowBreak> {
        let mut width = 0.0;
        let mut len = 0;

        while let Some(&ch) = text.get(len) {
            if ch == '\n' {
                return Ok(RowBreak {
                    width,
                    len,
                    skip: 1,
                    end: RowEnd::Newline,
                });
            }

            if ch.is_whitespace() {
                let advance = self.char_width(ch)?;
                if width + advance > row_width {
                    return Ok(RowBreak {
                        width,
                        len,
                        skip: 1,
                        end: RowEnd::Space,
                    });
                }
                width += advance;
                len += 1;
                continue;
            }

            let word = next_word(&text[len..]);
            let word_width = self.word_width(word)?;
            if width + word_width <= row_width {
                width += word_width;
                len += word.len();
                continue;
            }

            if len > 0 {
                return Ok(RowBreak {
                    width,
                    len,
                    skip: 0,
                    end: RowEnd::Deferred,
                });
            }

            let (fit, fit_width) = self.fit_prefix(word, row_width)?;
            let (len, width) = if fit == 0 {
                (1, self.char_width(word[0])?)
            } else {
                (fit, fit_width)
            };
            return Ok(RowBreak {
                width,
                len,
                skip: 0,
                end: RowEnd::SplitWord,
            });
        }

        Ok(RowBreak {
            width,
            len,
            skip: 0,
            end: RowEnd::Exhausted,
        })
    }

    /// Width of the first row of `text` when wrapped at `row_width`
    ///
    /// When the row's first word does not fit, this is the width of its
    /// fitting prefix. That is zero when not even one character fits, even
    /// though [`break_row`](Self::break_row) still takes that character.
    pub fn row_width(&self, text: &[char], row_width: f32) -> FontResult<f32> {
        let row = self.break_row(text, row_width)?;
        self.measured_width(text, &row, row_width)
    }

    /// Width [`row_width`](Self::row_width) reports for an already broken row
    ///
    /// Rows are aligned by this width.
    pub fn measured_width(&self, text: &[char], row: &RowBreak, row_width: f32) -> FontResult<f32> {
        match row.end {
            RowEnd::SplitWord => self.row_subword_width(&text[..row.len], row_width),
            _ => Ok(row.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::systems::text::test_support::{monospace_metrics, CHAR_ADVANCE, SPACE_ADVANCE};
    use approx::assert_relative_eq;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_single_char_width_scales_with_font_size() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 32.0);

        assert_relative_eq!(measure.word_width(&chars("a")).unwrap(), CHAR_ADVANCE / 2.0);
        assert_relative_eq!(measure.char_width(' ').unwrap(), SPACE_ADVANCE / 2.0);
        assert_relative_eq!(measure.char_width('\t').unwrap(), SPACE_ADVANCE / 2.0);
        assert_relative_eq!(measure.char_width('\n').unwrap(), 0.0);
    }

    #[test]
    fn test_next_word() {
        assert_eq!(next_word(&chars("hello world")), chars("hello").as_slice());
        assert!(next_word(&chars(" hello")).is_empty());
        assert!(next_word(&[]).is_empty());
    }

    #[test]
    fn test_single_narrow_word_row_width_is_word_width() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);
        let text = chars("Hi");

        assert_relative_eq!(
            measure.row_width(&text, 1000.0).unwrap(),
            measure.word_width(&text).unwrap()
        );
    }

    #[test]
    fn test_word_that_does_not_fit_is_deferred() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);

        let row = measure.break_row(&chars("ab cd"), 100.0).unwrap();
        assert_eq!(row.end, RowEnd::Deferred);
        assert_eq!(row.len, 3);
        assert_eq!(row.skip, 0);
        assert_relative_eq!(row.width, 2.0 * CHAR_ADVANCE + SPACE_ADVANCE);
    }

    #[test]
    fn test_row_subword_is_strict_prefix() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);
        let word = chars("abcdef");
        let row_width = 100.0;

        let sub = measure.row_subword(&word, row_width).unwrap();
        let width = measure.row_subword_width(&word, row_width).unwrap();

        assert_eq!(sub, &word[..3]);
        assert!(width < row_width);
        assert!(width + measure.char_width(word[sub.len()]).unwrap() >= row_width);
    }

    #[test]
    fn test_row_subword_excludes_exact_fit() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);

        let ab = chars("ab");

        let sub = measure.row_subword(&ab, 2.0 * CHAR_ADVANCE).unwrap();
        assert_eq!(sub.len(), 1);
        assert!(measure.row_subword(&ab, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_first_word_is_split() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);
        let text = chars("abcdef gh");

        let row = measure.break_row(&text, 100.0).unwrap();
        assert_eq!(row.end, RowEnd::SplitWord);
        assert_eq!(row.len, 3);
        assert_relative_eq!(measure.row_width(&text, 100.0).unwrap(), 3.0 * CHAR_ADVANCE);
    }

    #[test]
    fn test_split_always_makes_progress() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);
        let text = chars("abc");

        let row = measure.break_row(&text, 0.0).unwrap();
        assert_eq!(row.end, RowEnd::SplitWord);
        assert_eq!(row.consumed(), 1);
        assert_relative_eq!(row.width, CHAR_ADVANCE);
        // The fitting prefix itself is empty
        assert_relative_eq!(measure.row_width(&text, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_newline_ends_row() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);

        let row = measure.break_row(&chars("ab\ncd"), f32::INFINITY).unwrap();
        assert_eq!(row.end, RowEnd::Newline);
        assert_eq!((row.len, row.skip), (2, 1));
        assert_relative_eq!(row.width, 2.0 * CHAR_ADVANCE);
    }

    #[test]
    fn test_space_that_does_not_fit_breaks_row() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);

        let row = measure.break_row(&chars("a b"), CHAR_ADVANCE).unwrap();
        assert_eq!(row.end, RowEnd::Space);
        assert_eq!((row.len, row.skip), (1, 1));
        assert_relative_eq!(row.width, CHAR_ADVANCE);
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let metrics = monospace_metrics();
        let measure = TextMeasure::new(&metrics, 64.0);

        assert!(measure.break_row(&chars("a\u{e9}"), f32::INFINITY).is_err());
    }
}
