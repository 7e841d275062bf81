//! Text Arrays
//!
//! Text-related properties:
//! - content: The text string to display
//! - writing_mode: Horizontal or vertical-rl
//! - wrap: Wrap mode
//! - rotation: Visual rotation hint in degrees (never affects measurement)

use super::{mark_layout_dirty, Column};
use crate::types::{TextWrap, WritingMode};

thread_local! {
    static TEXT_CONTENT: Column<String> = Column::new(String::new());
    static WRITING_MODE: Column<WritingMode> = Column::new(WritingMode::Horizontal);
    static TEXT_WRAP: Column<TextWrap> = Column::new(TextWrap::Wrap);
    static ROTATION: Column<f32> = Column::new(0.0);
}

pub fn ensure_capacity(index: usize) {
    TEXT_CONTENT.with(|arr| arr.ensure(index));
    WRITING_MODE.with(|arr| arr.ensure(index));
    TEXT_WRAP.with(|arr| arr.ensure(index));
    ROTATION.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    TEXT_CONTENT.with(|arr| arr.clear(index));
    WRITING_MODE.with(|arr| arr.clear(index));
    TEXT_WRAP.with(|arr| arr.clear(index));
    ROTATION.with(|arr| arr.clear(index));
}

pub fn reset() {
    TEXT_CONTENT.with(|arr| arr.reset());
    WRITING_MODE.with(|arr| arr.reset());
    TEXT_WRAP.with(|arr| arr.reset());
    ROTATION.with(|arr| arr.reset());
}

pub fn get_text_content(index: usize) -> String {
    TEXT_CONTENT.with(|arr| arr.get(index))
}

/// Set text content. Only marks layout dirty when the text actually changed.
pub fn set_text_content(index: usize, content: String) {
    let changed = TEXT_CONTENT.with(|arr| arr.update(index, |current| {
        if *current == content {
            false
        } else {
            *current = content;
            true
        }
    }));
    if changed {
        mark_layout_dirty();
    }
}

pub fn get_writing_mode(index: usize) -> WritingMode {
    WRITING_MODE.with(|arr| arr.get(index))
}

pub fn set_writing_mode(index: usize, mode: WritingMode) {
    WRITING_MODE.with(|arr| arr.set(index, mode));
    mark_layout_dirty();
}

pub fn get_text_wrap(index: usize) -> TextWrap {
    TEXT_WRAP.with(|arr| arr.get(index))
}

pub fn set_text_wrap(index: usize, wrap: TextWrap) {
    TEXT_WRAP.with(|arr| arr.set(index, wrap));
    mark_layout_dirty();
}

pub fn get_rotation(index: usize) -> f32 {
    ROTATION.with(|arr| arr.get(index))
}

/// Rotation is paint-only, so layout stays clean.
pub fn set_rotation(index: usize, degrees: f32) {
    ROTATION.with(|arr| arr.set(index, degrees));
}
