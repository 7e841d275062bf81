//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Control and zero-width characters: 0 cells
//!
//! Widths come from the `unicode-width` tables.

use unicode_width::UnicodeWidthChar;

use crate::types::{Size, TextWrap, WritingMode};

/// Display width of a single character in cells.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        0
    } else {
        c.width().unwrap_or(0)
    }
}

/// Display width of a string in cells.
///
/// Newlines are ignored; use [`max_line_width`] for multi-line text.
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Width of the widest `\n`-separated line.
pub fn max_line_width(s: &str) -> usize {
    s.split('\n').map(string_width).max().unwrap_or(0)
}

/// Measure the height of text when wrapped to a given width.
///
/// Returns the number of lines (minimum 1 for non-empty text, 0 for empty).
pub fn measure_text_height(text: &str, available_width: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    wrap_text(text, available_width).len().max(1)
}

/// Wrap text to a given width.
///
/// Breaks at character boundaries; explicit newlines always break.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0usize;

    for c in text.chars() {
        if c == '\n' {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
            continue;
        }

        let w = char_width(c);
        if current_width + w > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        current_line.push(c);
        current_width += w;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Intrinsic size of a text leaf.
///
/// - Horizontal, no wrap: widest line × line count.
/// - Horizontal, wrap: wrapped to `available_width` when given.
/// - Vertical-rl: each line becomes a column, one glyph per row.
pub fn measure_text(
    text: &str,
    mode: WritingMode,
    wrap: TextWrap,
    available_width: Option<usize>,
) -> Size {
    if text.is_empty() {
        return Size::ZERO;
    }

    match mode {
        WritingMode::Horizontal => {
            let natural = max_line_width(text);
            match (wrap, available_width) {
                (TextWrap::Wrap, Some(avail)) if avail < natural => {
                    let lines = wrap_text(text, avail.max(1));
                    let width = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);
                    Size::new(width as f32, lines.len() as f32)
                }
                _ => {
                    let lines = text.split('\n').count();
                    Size::new(natural as f32, lines as f32)
                }
            }
        }
        WritingMode::VerticalRl => {
            let mut width = 0usize;
            let mut height = 0usize;
            for column in text.split('\n') {
                let glyphs: Vec<usize> = column
                    .chars()
                    .map(char_width)
                    .filter(|&w| w > 0)
                    .collect();
                width += glyphs.iter().copied().max().unwrap_or(0);
                height = height.max(glyphs.len());
            }
            Size::new(width as f32, height as f32)
        }
    }
}
