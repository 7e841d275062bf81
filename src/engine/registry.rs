//! Element Registry - Index allocation for parallel arrays.
//!
//! An element is an index. The registry hands indices out, recycles them,
//! maps optional string ids to them, and runs teardown when one is released:
//!
//! ```text
//! release(i): children first → on_destroy callbacks → detach from parent
//!           → drop pointer handlers, observations, portals → free i
//! ```
//!
//! When the last element goes, every array is reset so indices restart at 0.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use super::arrays;
use crate::pipeline::portal;
use crate::state::{pointer, resize_observer};

// =============================================================================
// Registry State
// =============================================================================

type DestroyCallback = Box<dyn FnOnce()>;

#[derive(Default)]
struct Registry {
    by_id: HashMap<String, usize>,
    ids: HashMap<usize, String>,
    live: BTreeSet<usize>,
    free: Vec<usize>,
    next_index: usize,
    next_auto_id: usize,
    destroy_callbacks: HashMap<usize, Vec<DestroyCallback>>,
}

impl Registry {
    fn claim(&mut self, id: Option<&str>) -> (usize, bool) {
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                let id = format!("e{}", self.next_auto_id);
                self.next_auto_id += 1;
                id
            }
        };
        if let Some(&index) = self.by_id.get(&id) {
            return (index, false);
        }

        let index = self.free.pop().unwrap_or_else(|| {
            self.next_index += 1;
            self.next_index - 1
        });
        self.by_id.insert(id.clone(), index);
        self.ids.insert(index, id);
        self.live.insert(index);
        (index, true)
    }

    /// Drop the bookkeeping for `index`. Returns true if nothing is left.
    fn forget(&mut self, index: usize) -> bool {
        if let Some(id) = self.ids.remove(&index) {
            self.by_id.remove(&id);
        }
        self.live.remove(&index);
        self.free.push(index);

        if self.live.is_empty() {
            self.free.clear();
            self.next_index = 0;
            return true;
        }
        false
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|r| f(&mut r.borrow_mut()))
}

// =============================================================================
// Allocation and Release
// =============================================================================

/// Allocate an index for a new element.
///
/// An `id` that is already registered returns its existing index.
pub fn allocate_index(id: Option<&str>) -> usize {
    let (index, fresh) = with_registry(|r| r.claim(id));
    if fresh {
        arrays::ensure_all_capacity(index);
    }
    index
}

/// Release an element and its whole subtree.
pub fn release_index(index: usize) {
    if !is_allocated(index) {
        return;
    }

    for child in arrays::core::get_children(index) {
        release_index(child);
    }

    let callbacks = with_registry(|r| r.destroy_callbacks.remove(&index));
    for callback in callbacks.into_iter().flatten() {
        callback();
    }
    // A destroy callback may have released it already
    if !is_allocated(index) {
        return;
    }

    if let Some(parent) = arrays::core::get_parent_index(index) {
        arrays::core::remove_child(parent, index);
    }
    pointer::cleanup_index(index);
    resize_observer::cleanup_index(index);
    portal::cleanup_index(index);

    arrays::clear_all_at_index(index);
    if with_registry(|r| r.forget(index)) {
        arrays::reset_all_arrays();
    }
}

/// Run `callback` when the element at `index` is released, after its
/// children and before it is detached from its parent.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    with_registry(|r| {
        r.destroy_callbacks
            .entry(index)
            .or_default()
            .push(Box::new(callback))
    });
}

// =============================================================================
// Lookups
// =============================================================================

pub fn get_index(id: &str) -> Option<usize> {
    with_registry(|r| r.by_id.get(id).copied())
}

pub fn get_id(index: usize) -> Option<String> {
    with_registry(|r| r.ids.get(&index).cloned())
}

/// Allocated indices in ascending order.
pub fn get_allocated_indices() -> Vec<usize> {
    with_registry(|r| r.live.iter().copied().collect())
}

pub fn is_allocated(index: usize) -> bool {
    with_registry(|r| r.live.contains(&index))
}

pub fn get_allocated_count() -> usize {
    with_registry(|r| r.live.len())
}

/// Clear every element without running destroy callbacks.
pub fn reset_registry() {
    with_registry(|r| *r = Registry::default());
    arrays::reset_all_arrays();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
    }

    fn adopt(parent: usize, child: usize) {
        arrays::core::set_parent_index(child, Some(parent));
        arrays::core::insert_child(parent, child, None);
    }

    #[test]
    fn test_indices_are_sequential_then_recycled() {
        setup();

        let a = allocate_index(None);
        let b = allocate_index(None);
        let c = allocate_index(Some("strip"));
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(get_allocated_count(), 3);

        release_index(b);
        assert!(!is_allocated(b));
        assert_eq!(allocate_index(None), b);
    }

    #[test]
    fn test_named_ids() {
        setup();

        let idx = allocate_index(Some("article"));
        assert_eq!(get_index("article"), Some(idx));
        assert_eq!(get_id(idx).as_deref(), Some("article"));
        assert_eq!(allocate_index(Some("article")), idx);

        release_index(idx);
        assert_eq!(get_index("article"), None);
    }

    #[test]
    fn test_release_runs_children_first() {
        setup();

        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = allocate_index(None);
        let child = allocate_index(None);
        let bystander = allocate_index(None);
        adopt(parent, child);

        for idx in [parent, child] {
            let order = order.clone();
            on_destroy(idx, move || order.borrow_mut().push(idx));
        }

        release_index(parent);
        assert_eq!(*order.borrow(), vec![child, parent]);
        assert!(!is_allocated(child));
        assert!(is_allocated(bystander));
    }

    #[test]
    fn test_callback_releasing_sibling() {
        setup();

        let a = allocate_index(None);
        let b = allocate_index(None);
        let keep = allocate_index(None);
        on_destroy(a, move || release_index(b));

        release_index(a);
        assert!(!is_allocated(b));
        assert_eq!(get_allocated_indices(), vec![keep]);

        // Each freed index comes back exactly once
        let x = allocate_index(None);
        let y = allocate_index(None);
        let z = allocate_index(None);
        assert_ne!(x, y);
        assert!(z > a.max(b));
    }

    #[test]
    fn test_callback_runs_once() {
        setup();

        let calls = Rc::new(Cell::new(0));
        let idx = allocate_index(None);
        let _keep = allocate_index(None);
        let counter = calls.clone();
        on_destroy(idx, move || counter.set(counter.get() + 1));

        release_index(idx);
        release_index(idx);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_registry_restarts_at_zero() {
        setup();

        let a = allocate_index(None);
        let b = allocate_index(None);
        release_index(a);
        release_index(b);
        assert_eq!(get_allocated_count(), 0);
        assert_eq!(allocate_index(None), 0);
        assert_eq!(allocate_index(None), 1);
    }
}
