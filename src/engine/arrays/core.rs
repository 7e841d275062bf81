//! Core Arrays - Tree structure, role and layout style.
//!
//! - role: Semantic role (article, paragraph, button, ...)
//! - flags: Behavior flags (hidden)
//! - parent: Parent index, `None` for roots
//! - children: Ordered child indices
//! - style: Layout style

use super::{mark_layout_dirty, Column};
use crate::types::{ElementFlags, ElementStyle, Role};

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    static ROLE: Column<Role> = Column::new(Role::NONE);
    static FLAGS: Column<ElementFlags> = Column::new(ElementFlags::NONE);
    static PARENT: Column<Option<usize>> = Column::new(None);
    static CHILDREN: Column<Vec<usize>> = Column::new(Vec::new());
    static STYLE: Column<ElementStyle> = Column::new(ElementStyle::default());
}

// =============================================================================
// Capacity Management
// =============================================================================

pub fn ensure_capacity(index: usize) {
    ROLE.with(|arr| arr.ensure(index));
    FLAGS.with(|arr| arr.ensure(index));
    PARENT.with(|arr| arr.ensure(index));
    CHILDREN.with(|arr| arr.ensure(index));
    STYLE.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    ROLE.with(|arr| arr.clear(index));
    FLAGS.with(|arr| arr.clear(index));
    PARENT.with(|arr| arr.clear(index));
    CHILDREN.with(|arr| arr.clear(index));
    STYLE.with(|arr| arr.clear(index));
}

pub fn reset() {
    ROLE.with(|arr| arr.reset());
    FLAGS.with(|arr| arr.reset());
    PARENT.with(|arr| arr.reset());
    CHILDREN.with(|arr| arr.reset());
    STYLE.with(|arr| arr.reset());
}

// =============================================================================
// Role / Flags
// =============================================================================

pub fn get_role(index: usize) -> Role {
    ROLE.with(|arr| arr.get(index))
}

pub fn set_role(index: usize, role: Role) {
    ROLE.with(|arr| arr.set(index, role));
}

pub fn get_flags(index: usize) -> ElementFlags {
    FLAGS.with(|arr| arr.get(index))
}

pub fn set_flags(index: usize, flags: ElementFlags) {
    FLAGS.with(|arr| arr.set(index, flags));
}

pub fn is_hidden(index: usize) -> bool {
    get_flags(index).contains(ElementFlags::HIDDEN)
}

// =============================================================================
// Tree
// =============================================================================

pub fn get_parent_index(index: usize) -> Option<usize> {
    PARENT.with(|arr| arr.get(index))
}

pub fn set_parent_index(index: usize, parent: Option<usize>) {
    PARENT.with(|arr| arr.set(index, parent));
    mark_layout_dirty();
}

/// Ordered children of an element.
pub fn get_children(index: usize) -> Vec<usize> {
    CHILDREN.with(|arr| arr.get(index))
}

/// Insert `child` into `parent`'s child list at `position` (clamped to the end).
pub fn insert_child(parent: usize, child: usize, position: Option<usize>) {
    CHILDREN.with(|arr| {
        arr.update(parent, |children| {
            let at = position.unwrap_or(children.len()).min(children.len());
            children.insert(at, child);
        })
    });
    mark_layout_dirty();
}

/// Remove `child` from `parent`'s child list.
pub fn remove_child(parent: usize, child: usize) {
    CHILDREN.with(|arr| arr.update(parent, |children| children.retain(|&c| c != child)));
    mark_layout_dirty();
}

// =============================================================================
// Style
// =============================================================================

pub fn get_style(index: usize) -> ElementStyle {
    STYLE.with(|arr| arr.get(index))
}

pub fn set_style(index: usize, style: ElementStyle) {
    let changed = STYLE.with(|arr| arr.update(index, |current| {
        let changed = *current != style;
        *current = style;
        changed
    }));
    if changed {
        mark_layout_dirty();
    }
}
