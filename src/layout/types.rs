//! Layout output types.

use std::collections::HashMap;

use crate::types::{Rect, Size};

/// Result of one layout pass.
///
/// Every rect is in document coordinates: relative to the document origin,
/// independent of the scroll offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    /// Border box of every laid-out element.
    pub rects: HashMap<usize, Rect>,
    /// Extent of the document flow (portal layers excluded).
    pub document_size: Size,
    /// Layout generation this result was computed at.
    pub generation: u64,
}

impl ComputedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.rects.get(&index).copied()
    }
}
