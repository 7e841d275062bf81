//! Parallel Arrays - All element state lives in columns indexed by element.
//!
//! Each array index corresponds to one element. Columns grow on demand and
//! are reset to their default when an index is released.
//!
//! # Array Categories
//!
//! - **core**: Role, flags, parent, ordered children, layout style
//! - **text**: Text content, writing mode, wrap, rotation hint
//!
//! Every mutation that can change geometry bumps the layout generation so the
//! layout module knows to recompute.

pub mod core;
pub mod text;

use std::cell::{Cell, RefCell};

use self::core as core_arrays;
use self::text as text_arrays;

// =============================================================================
// Column
// =============================================================================

/// A growable column of per-element values with a default.
pub struct Column<T: Clone> {
    default: T,
    values: RefCell<Vec<T>>,
}

impl<T: Clone> Column<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            values: RefCell::new(Vec::new()),
        }
    }

    /// Grow the column so `index` is addressable.
    pub fn ensure(&self, index: usize) {
        let mut values = self.values.borrow_mut();
        if values.len() <= index {
            values.resize(index + 1, self.default.clone());
        }
    }

    pub fn get(&self, index: usize) -> T {
        self.values
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn set(&self, index: usize, value: T) {
        self.ensure(index);
        self.values.borrow_mut()[index] = value;
    }

    /// Mutate a value in place.
    pub fn update<R>(&self, index: usize, f: impl FnOnce(&mut T) -> R) -> R {
        self.ensure(index);
        let mut values = self.values.borrow_mut();
        f(&mut values[index])
    }

    /// Reset the value at `index` to the default.
    pub fn clear(&self, index: usize) {
        let mut values = self.values.borrow_mut();
        if let Some(slot) = values.get_mut(index) {
            *slot = self.default.clone();
        }
    }

    /// Drop every value.
    pub fn reset(&self) {
        self.values.borrow_mut().clear();
    }
}

// =============================================================================
// Layout Generation
// =============================================================================

thread_local! {
    static LAYOUT_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Record that geometry may have changed.
pub fn mark_layout_dirty() {
    LAYOUT_GENERATION.with(|g| g.set(g.get().wrapping_add(1)));
}

/// Current layout generation. Layout is stale whenever this differs from the
/// generation the last layout was computed at.
pub fn layout_generation() -> u64 {
    LAYOUT_GENERATION.with(|g| g.get())
}

// =============================================================================
// Bulk Operations
// =============================================================================

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    text_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    text_arrays::clear_at_index(index);
    mark_layout_dirty();
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically when all elements are destroyed.
pub fn reset_all_arrays() {
    core_arrays::reset();
    text_arrays::reset();
    mark_layout_dirty();
}
