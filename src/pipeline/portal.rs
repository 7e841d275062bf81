//! Portals - Detached render targets keyed by a stable identifier.
//!
//! A portal mount places a root element (one with no parent) at a document
//! position, outside the flow of the document tree. The mount records the
//! logical owner of the content, so identity survives the visual detachment:
//! destroying the owner tears the portal down with it.
//!
//! The portal takes ownership of its root element. Unmounting, remounting the
//! same key, or destroying the owner destroys the root.

use std::cell::{Cell, RefCell};

use crate::engine::arrays::mark_layout_dirty;
use crate::engine::{destroy_element, is_allocated};
use crate::types::Point;

/// Stable identifier of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalKey(u64);

thread_local! {
    static NEXT_KEY: Cell<u64> = const { Cell::new(0) };
    static PORTALS: RefCell<Vec<PortalMount>> = const { RefCell::new(Vec::new()) };
}

impl PortalKey {
    /// Allocate a fresh key.
    pub fn new() -> Self {
        NEXT_KEY.with(|next| {
            let key = next.get();
            next.set(key + 1);
            PortalKey(key)
        })
    }
}

impl Default for PortalKey {
    fn default() -> Self {
        Self::new()
    }
}

/// A mounted portal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalMount {
    pub key: PortalKey,
    /// Root element of the detached content.
    pub root: usize,
    /// Element that logically owns the content.
    pub owner: usize,
    /// Document position of the root's top-left corner.
    pub position: Point,
}

// =============================================================================
// MOUNTING
// =============================================================================

/// Mount `root` at `position` under `key`. Returns cleanup function.
///
/// Mounting a key that is already mounted replaces the previous content.
/// The cleanup only unmounts this mount; it is a no-op once the key has been
/// remounted or torn down.
pub fn mount(key: PortalKey, root: usize, owner: usize, position: Point) -> impl FnOnce() {
    unmount(key);

    PORTALS.with(|portals| {
        portals.borrow_mut().push(PortalMount { key, root, owner, position });
    });
    mark_layout_dirty();
    log::trace!("portal {:?} mounted root {} for owner {}", key, root, owner);

    move || {
        let ours = get(key).is_some_and(|m| m.root == root);
        if ours {
            unmount(key);
        }
    }
}

/// Remove the mount for `key` and destroy its root.
pub fn unmount(key: PortalKey) {
    let removed = PORTALS.with(|portals| {
        let mut portals = portals.borrow_mut();
        let position = portals.iter().position(|m| m.key == key)?;
        Some(portals.remove(position))
    });

    if let Some(mount) = removed {
        mark_layout_dirty();
        if is_allocated(mount.root) {
            destroy_element(mount.root);
        }
    }
}

/// Move a mounted portal. Returns false if `key` is not mounted.
pub fn set_position(key: PortalKey, position: Point) -> bool {
    let changed = PORTALS.with(|portals| {
        let mut portals = portals.borrow_mut();
        match portals.iter_mut().find(|m| m.key == key) {
            Some(mount) if mount.position != position => {
                mount.position = position;
                Some(true)
            }
            Some(_) => Some(false),
            None => None,
        }
    });

    match changed {
        Some(true) => {
            mark_layout_dirty();
            true
        }
        Some(false) => true,
        None => false,
    }
}

// =============================================================================
// QUERIES
// =============================================================================

pub fn get(key: PortalKey) -> Option<PortalMount> {
    PORTALS.with(|portals| portals.borrow().iter().find(|m| m.key == key).copied())
}

/// Keys of every mounted portal, in mount order.
pub fn mounted_keys() -> Vec<PortalKey> {
    PORTALS.with(|portals| portals.borrow().iter().map(|m| m.key).collect())
}

/// Roots and positions for layout, in mount order (last is topmost).
pub fn layout_roots() -> Vec<(usize, Point)> {
    PORTALS.with(|portals| {
        portals
            .borrow()
            .iter()
            .filter(|m| is_allocated(m.root))
            .map(|m| (m.root, m.position))
            .collect()
    })
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Drop mounts rooted at, or owned by, a released element.
pub fn cleanup_index(index: usize) {
    let affected: Vec<PortalMount> = PORTALS.with(|portals| {
        let mut portals = portals.borrow_mut();
        let (gone, kept): (Vec<_>, Vec<_>) = portals
            .drain(..)
            .partition(|m| m.root == index || m.owner == index);
        *portals = kept;
        gone
    });

    if affected.is_empty() {
        return;
    }
    mark_layout_dirty();

    for mount in affected {
        if mount.root != index && is_allocated(mount.root) {
            destroy_element(mount.root);
        }
    }
}

/// Reset portal state (for testing).
pub fn reset_portals() {
    PORTALS.with(|portals| portals.borrow_mut().clear());
    mark_layout_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{create_element, reset_registry, ElementSpec};
    use crate::layout;
    use crate::state::viewport;
    use crate::types::{ElementStyle, Rect, Role};

    fn setup() {
        reset_registry();
        reset_portals();
        viewport::reset_viewport_state();
    }

    fn panel() -> usize {
        create_element(None, ElementSpec::new(Role::PANEL).with_style(ElementStyle::sized(20.0, 3.0)))
    }

    #[test]
    fn test_mount_places_root() {
        setup();
        let owner = create_element(None, ElementSpec::new(Role::BUTTON));
        let root = panel();
        let key = PortalKey::new();

        let _cleanup = mount(key, root, owner, Point::new(60.0, 4.0));
        assert_eq!(mounted_keys(), vec![key]);
        assert_eq!(layout::document_bounds(root), Some(Rect::new(60.0, 4.0, 20.0, 3.0)));

        assert!(set_position(key, Point::new(61.0, 5.0)));
        assert_eq!(layout::document_bounds(root).map(|r| r.x), Some(61.0));
    }

    #[test]
    fn test_cleanup_destroys_root() {
        setup();
        let owner = create_element(None, ElementSpec::new(Role::BUTTON));
        let root = panel();
        let key = PortalKey::new();

        let cleanup = mount(key, root, owner, Point::ZERO);
        cleanup();
        assert!(get(key).is_none());
        assert!(!is_allocated(root));
        assert!(!set_position(key, Point::ZERO));
    }

    #[test]
    fn test_remount_replaces_and_stale_cleanup_is_noop() {
        setup();
        let owner = create_element(None, ElementSpec::new(Role::BUTTON));
        let key = PortalKey::new();

        let first_root = panel();
        let first = mount(key, first_root, owner, Point::ZERO);
        let second_root = panel();
        let _second = mount(key, second_root, owner, Point::ZERO);
        assert!(!is_allocated(first_root));

        first();
        assert_eq!(get(key).map(|m| m.root), Some(second_root));
        assert!(is_allocated(second_root));
    }

    #[test]
    fn test_destroying_owner_tears_down_portal() {
        setup();
        let page = create_element(None, ElementSpec::new(Role::MAIN));
        let owner = create_element(Some(page), ElementSpec::new(Role::BUTTON));
        let root = panel();
        let key = PortalKey::new();
        let _cleanup = mount(key, root, owner, Point::ZERO);

        crate::engine::destroy_element(owner);
        assert!(mounted_keys().is_empty());
        assert!(!is_allocated(root));
        assert!(is_allocated(page));
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(PortalKey::new(), PortalKey::new());
    }
}
