//! Elements - Creating, mutating and querying the element tree.
//!
//! The queries follow DOM semantics: `closest` and `contains` are inclusive
//! of the element itself.

use super::arrays::{core, text};
use super::registry::{allocate_index, is_allocated, release_index};
use crate::types::{ElementFlags, ElementStyle, Role, TextWrap, WritingMode};

// =============================================================================
// Element Spec
// =============================================================================

/// Everything needed to create an element.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    pub id: Option<String>,
    pub role: Role,
    pub flags: ElementFlags,
    pub style: ElementStyle,
    pub text: Option<String>,
    pub writing_mode: WritingMode,
    pub wrap: TextWrap,
    /// Visual rotation hint in degrees.
    pub rotation: f32,
}

impl ElementSpec {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    /// A text leaf.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: Role::TEXT,
            text: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role |= role;
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_writing_mode(mut self, mode: WritingMode) -> Self {
        self.writing_mode = mode;
        self
    }

    pub fn with_wrap(mut self, wrap: TextWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }
}

// =============================================================================
// Creation / Destruction
// =============================================================================

/// Create an element as the last child of `parent`, or as a detached root
/// when `parent` is `None` (document roots and portal content).
pub fn create_element(parent: Option<usize>, spec: ElementSpec) -> usize {
    let index = allocate(spec);
    if let Some(parent) = parent {
        attach(parent, index, None);
    }
    index
}

/// Create an element directly after `sibling` in the sibling's parent.
///
/// A root sibling has no parent to insert into, so the new element becomes a
/// root as well.
pub fn create_element_after(sibling: usize, spec: ElementSpec) -> usize {
    let index = allocate(spec);
    if let Some(parent) = core::get_parent_index(sibling) {
        let position = core::get_children(parent)
            .iter()
            .position(|&c| c == sibling)
            .map(|p| p + 1);
        attach(parent, index, position);
    }
    index
}

/// Destroy an element and its subtree.
pub fn destroy_element(index: usize) {
    release_index(index);
}

fn allocate(spec: ElementSpec) -> usize {
    let index = allocate_index(spec.id.as_deref());
    core::set_role(index, spec.role);
    core::set_flags(index, spec.flags);
    core::set_style(index, spec.style);
    if let Some(content) = spec.text {
        text::set_text_content(index, content);
    }
    text::set_writing_mode(index, spec.writing_mode);
    text::set_text_wrap(index, spec.wrap);
    text::set_rotation(index, spec.rotation);
    index
}

fn attach(parent: usize, child: usize, position: Option<usize>) {
    core::set_parent_index(child, Some(parent));
    core::insert_child(parent, child, position);
}

// =============================================================================
// Mutation
// =============================================================================

pub fn set_text(index: usize, content: impl Into<String>) {
    text::set_text_content(index, content.into());
}

pub fn set_style(index: usize, style: ElementStyle) {
    core::set_style(index, style);
}

pub fn set_writing_mode(index: usize, mode: WritingMode) {
    text::set_writing_mode(index, mode);
}

// =============================================================================
// Queries
// =============================================================================

pub fn parent(index: usize) -> Option<usize> {
    core::get_parent_index(index)
}

pub fn children(index: usize) -> Vec<usize> {
    core::get_children(index)
}

pub fn role(index: usize) -> Role {
    core::get_role(index)
}

pub fn text_content(index: usize) -> String {
    text::get_text_content(index)
}

/// Nearest inclusive ancestor whose role intersects `role`.
pub fn closest(index: usize, role: Role) -> Option<usize> {
    if !is_allocated(index) {
        return None;
    }
    let mut current = Some(index);
    while let Some(idx) = current {
        if core::get_role(idx).intersects(role) {
            return Some(idx);
        }
        current = core::get_parent_index(idx);
    }
    None
}

/// Whether `node` is `ancestor` or one of its descendants.
pub fn contains(ancestor: usize, node: usize) -> bool {
    if !is_allocated(ancestor) || !is_allocated(node) {
        return false;
    }
    let mut current = Some(node);
    while let Some(idx) = current {
        if idx == ancestor {
            return true;
        }
        current = core::get_parent_index(idx);
    }
    false
}

/// The content region a disclosure anchors to: the closest article, else the
/// closest main, else the closest section.
pub fn content_region(index: usize) -> Option<usize> {
    closest(index, Role::ARTICLE)
        .or_else(|| closest(index, Role::MAIN))
        .or_else(|| closest(index, Role::SECTION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::reset_registry;
    use crate::engine::{get_index, is_allocated};

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_child_order_and_insert_after() {
        setup();

        let p = create_element(None, ElementSpec::new(Role::PARAGRAPH));
        let a = create_element(Some(p), ElementSpec::text("a"));
        let c = create_element(Some(p), ElementSpec::text("c"));
        let b = create_element_after(a, ElementSpec::text("b"));

        assert_eq!(children(p), vec![a, b, c]);
        assert_eq!(parent(b), Some(p));
    }

    #[test]
    fn test_closest_is_inclusive() {
        setup();

        let article = create_element(None, ElementSpec::new(Role::ARTICLE));
        let p = create_element(Some(article), ElementSpec::new(Role::PARAGRAPH));
        let t = create_element(Some(p), ElementSpec::text("x"));

        assert_eq!(closest(t, Role::PARAGRAPH), Some(p));
        assert_eq!(closest(p, Role::PARAGRAPH), Some(p));
        assert_eq!(closest(t, Role::ARTICLE), Some(article));
        assert_eq!(closest(t, Role::MAIN), None);
    }

    #[test]
    fn test_content_region_priority() {
        setup();

        // article inside section inside main: article wins even though
        // section is nearer to the root than main
        let main = create_element(None, ElementSpec::new(Role::MAIN));
        let section = create_element(Some(main), ElementSpec::new(Role::SECTION));
        let article = create_element(Some(section), ElementSpec::new(Role::ARTICLE));
        let t = create_element(Some(article), ElementSpec::text("x"));
        assert_eq!(content_region(t), Some(article));

        // section inside main: main beats the nearer section
        let t2 = create_element(Some(section), ElementSpec::text("y"));
        assert_eq!(content_region(t2), Some(main));

        let orphan = create_element(None, ElementSpec::text("z"));
        assert_eq!(content_region(orphan), None);
    }

    #[test]
    fn test_contains() {
        setup();

        let root = create_element(None, ElementSpec::new(Role::BLOCK));
        let child = create_element(Some(root), ElementSpec::text("x"));
        let other = create_element(None, ElementSpec::new(Role::BLOCK));

        assert!(contains(root, root));
        assert!(contains(root, child));
        assert!(!contains(child, root));
        assert!(!contains(other, child));
    }

    #[test]
    fn test_destroy_removes_from_parent() {
        setup();

        let p = create_element(None, ElementSpec::new(Role::PARAGRAPH).with_id("p"));
        let a = create_element(Some(p), ElementSpec::text("a"));
        let b = create_element(Some(p), ElementSpec::text("b"));

        destroy_element(a);
        assert_eq!(children(p), vec![b]);
        assert!(!is_allocated(a));
        assert_eq!(get_index("p"), Some(p));
    }

    #[test]
    fn test_no_parent_makes_a_root() {
        setup();

        let main = create_element(None, ElementSpec::new(Role::MAIN));
        let child = create_element(Some(main), ElementSpec::text("x"));
        let detached = create_element(None, ElementSpec::new(Role::PANEL));

        assert_eq!(parent(child), Some(main));
        assert_eq!(parent(detached), None);
        assert!(!contains(main, detached));
        assert_eq!(children(main), vec![child]);
    }
}
