//! Layout Module - Measurement for the rendering host.
//!
//! Flexbox layout computation using Taffy, plus the queries components use
//! to measure the result.
//!
//! # Architecture
//!
//! 1. Element mutations bump the layout generation (see `engine::arrays`)
//! 2. Any measurement call recomputes layout if the generation moved
//!    (a synchronous forced layout, like reading a DOM rect)
//! 3. Results are cached as document-coordinate rects
//!
//! # Example
//!
//! ```ignore
//! use spark_aside::layout;
//!
//! let rect = layout::bounds(trigger).unwrap();
//! let space = spark_aside::state::viewport::width() - rect.right();
//! ```

mod types;
mod text_measure;
mod taffy_bridge;

pub use types::*;
pub use text_measure::*;
pub use taffy_bridge::compute_layout_taffy as compute_layout;

use std::cell::RefCell;

use crate::engine::arrays::{core, layout_generation};
use crate::engine::is_allocated;
use crate::pipeline::portal;
use crate::state::viewport;
use crate::types::{Rect, Size};

thread_local! {
    static CACHE: RefCell<ComputedLayout> = RefCell::new(ComputedLayout {
        generation: u64::MAX,
        ..Default::default()
    });
}

/// Bring the cached layout up to date with the element arrays.
///
/// A layout failure keeps the previous result and is logged.
pub fn ensure_layout() {
    let generation = layout_generation();
    let fresh = CACHE.with(|c| c.borrow().generation == generation);
    if fresh {
        return;
    }

    let width = viewport::width();
    let portals = portal::layout_roots();
    match compute_layout(width, &portals) {
        Ok(mut layout) => {
            layout.generation = generation;
            CACHE.with(|c| *c.borrow_mut() = layout);
        }
        Err(e) => {
            log::error!("layout failed, keeping previous frame: {}", e);
            CACHE.with(|c| c.borrow_mut().generation = generation);
        }
    }
}

/// Border box of an element in document coordinates.
pub fn document_bounds(index: usize) -> Option<Rect> {
    if !is_allocated(index) {
        return None;
    }
    ensure_layout();
    CACHE.with(|c| c.borrow().rect(index))
}

/// Border box of an element relative to the viewport (document box minus the
/// scroll offset).
pub fn bounds(index: usize) -> Option<Rect> {
    let rect = document_bounds(index)?;
    Some(rect.translate(-viewport::scroll_x(), -viewport::scroll_y()))
}

/// Size of the element's border box.
pub fn size(index: usize) -> Option<Size> {
    document_bounds(index).map(|r| r.size())
}

/// Extent of the document flow.
pub fn document_size() -> Size {
    ensure_layout();
    CACHE.with(|c| c.borrow().document_size)
}

// =============================================================================
// HIT TESTING
// =============================================================================

/// Find the element under a viewport-relative point.
///
/// Portal layers are checked first, most recently mounted on top; then the
/// document tree. The deepest non-hidden element containing the point wins.
pub fn hit_test(x: f32, y: f32) -> Option<usize> {
    ensure_layout();
    let doc_x = x + viewport::scroll_x();
    let doc_y = y + viewport::scroll_y();

    CACHE.with(|c| {
        let layout = c.borrow();

        for (root, _) in portal::layout_roots().into_iter().rev() {
            if let Some(hit) = deepest_hit(&layout, root, doc_x, doc_y) {
                return Some(hit);
            }
        }

        let portals: Vec<usize> = portal::layout_roots().into_iter().map(|(r, _)| r).collect();
        let mut roots: Vec<usize> = crate::engine::get_allocated_indices()
            .into_iter()
            .filter(|&idx| core::get_parent_index(idx).is_none() && !portals.contains(&idx))
            .collect();
        roots.reverse();
        roots
            .into_iter()
            .find_map(|root| deepest_hit(&layout, root, doc_x, doc_y))
    })
}

fn deepest_hit(layout: &ComputedLayout, index: usize, x: f32, y: f32) -> Option<usize> {
    if core::is_hidden(index) {
        return None;
    }
    let rect = layout.rect(index)?;
    if !rect.contains(x, y) {
        return None;
    }
    // Later siblings paint over earlier ones
    core::get_children(index)
        .into_iter()
        .rev()
        .find_map(|child| deepest_hit(layout, child, x, y))
        .or(Some(index))
}
