//! Label Strip - A strip filled with as many copies of a label as fit.
//!
//! The strip measures one hidden copy of the label and its own extent along
//! the orientation axis, then renders
//! `max(1, floor((container + gap) / (label + gap)))` visible copies.
//!
//! # Structure
//!
//! ```text
//! STRIP container (100% × thickness, clipped, centered, gap between children)
//! ├── hidden measurement copy (absolute, out of flow)
//! ├── copy 1
//! ├── ...
//! └── copy n
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spark_aside::primitives::{label_strip, LabelStripProps};
//!
//! let strip = label_strip(LabelStripProps {
//!     parent: Some(page),
//!     label: "SIGN HERE".into(),
//!     thickness: 1.0,
//!     ..Default::default()
//! });
//! assert!(strip.repeat_count() >= 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::config;
use crate::engine::{self, is_allocated, on_destroy, ElementSpec};
use crate::layout;
use crate::state::resize_observer;
use crate::types::{Dimension, ElementFlags, ElementStyle, Orientation, Role, TextWrap};

use super::types::{LabelStripProps, Subscription};

/// Number of label copies that fit in a container.
///
/// Returns `None` when the label cannot be measured (zero, negative or NaN
/// extent): the caller keeps its previous count. Never returns `Some(0)`.
pub fn tile_count(container_extent: f32, label_extent: f32, gap: f32) -> Option<usize> {
    if !(label_extent > 0.0) {
        return None;
    }
    let container = container_extent.max(0.0);
    let gap = gap.max(0.0);
    let fit = ((container + gap) / (label_extent + gap)).floor();
    Some((fit as usize).max(1))
}

// =============================================================================
// Strip State
// =============================================================================

struct StripInner {
    container: usize,
    measure: usize,
    instances: RefCell<Vec<usize>>,
    label: RefCell<String>,
    orientation: Orientation,
    gap: f32,
    rotation: f32,
    repeat_count: Signal<usize>,
    alive: Cell<bool>,
}

impl StripInner {
    fn instance_spec(&self) -> ElementSpec {
        ElementSpec::text(self.label.borrow().clone())
            .with_writing_mode(self.orientation.writing_mode())
            .with_wrap(TextWrap::NoWrap)
            .with_rotation(self.rotation)
            .with_style(ElementStyle {
                shrink: 0.0,
                ..Default::default()
            })
    }

    fn recompute(&self) {
        if !self.alive.get() {
            return;
        }
        let (Some(container), Some(label)) =
            (layout::size(self.container), layout::size(self.measure))
        else {
            return;
        };

        let container_extent = self.orientation.extent(container);
        let label_extent = self.orientation.extent(label);

        let Some(count) = tile_count(container_extent, label_extent, self.gap) else {
            log::trace!(
                "strip {}: label not measurable, keeping {} copies",
                self.container,
                self.repeat_count.get()
            );
            return;
        };

        if count != self.repeat_count.get() {
            log::debug!(
                "strip {}: {} -> {} copies (container {}, label {}, gap {})",
                self.container,
                self.repeat_count.get(),
                count,
                container_extent,
                label_extent,
                self.gap
            );
            self.repeat_count.set(count);
        }
        self.sync_instances(count);
    }

    fn sync_instances(&self, count: usize) {
        let current = self.instances.borrow().len();
        if current < count {
            let spec = self.instance_spec();
            let added: Vec<usize> = (current..count)
                .map(|_| engine::create_element(Some(self.container), spec.clone()))
                .collect();
            self.instances.borrow_mut().extend(added);
        } else if current > count {
            let removed: Vec<usize> = self.instances.borrow_mut().split_off(count);
            for index in removed {
                engine::destroy_element(index);
            }
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// A mounted label strip.
///
/// Dropping the handle unmounts the strip.
pub struct LabelStrip {
    inner: Rc<StripInner>,
    observation: Subscription,
}

/// Mount a label strip.
pub fn label_strip(props: LabelStripProps) -> LabelStrip {
    let gap = props.gap.unwrap_or_else(|| config::current().strip.gap).max(0.0);
    let thickness = props.thickness.max(0.0);
    let orientation = props.orientation;

    let (width, height) = match orientation {
        Orientation::Horizontal => (Dimension::Percent(100.0), Dimension::Length(thickness)),
        Orientation::Vertical => (Dimension::Length(thickness), Dimension::Percent(100.0)),
    };

    let container = engine::create_element(
        props.parent,
        ElementSpec::new(Role::STRIP).with_style(ElementStyle {
            width,
            height,
            direction: orientation.direction(),
            gap,
            shrink: 0.0,
            clip: true,
            centered: true,
            ..Default::default()
        }),
    );

    // Out of flow, never hit-tested, same text metrics as the visible copies
    let measure = engine::create_element(
        Some(container),
        ElementSpec::text(props.label.clone())
            .with_flags(ElementFlags::HIDDEN)
            .with_writing_mode(orientation.writing_mode())
            .with_wrap(TextWrap::NoWrap)
            .with_style(ElementStyle {
                absolute: true,
                ..Default::default()
            }),
    );

    let inner = Rc::new(StripInner {
        container,
        measure,
        instances: RefCell::new(Vec::new()),
        label: RefCell::new(props.label),
        orientation,
        gap,
        rotation: props.rotate.unwrap_or(0.0),
        repeat_count: signal(1),
        alive: Cell::new(true),
    });

    // One copy before the first measurement
    inner.sync_instances(1);

    let weak: Weak<StripInner> = Rc::downgrade(&inner);
    on_destroy(container, move || {
        if let Some(inner) = weak.upgrade() {
            inner.alive.set(false);
        }
    });

    let weak: Weak<StripInner> = Rc::downgrade(&inner);
    let observation = Subscription::new(resize_observer::observe(container, move |_| {
        if let Some(inner) = weak.upgrade() {
            inner.recompute();
        }
    }));

    inner.recompute();

    LabelStrip { inner, observation }
}

impl LabelStrip {
    /// The strip container element.
    pub fn container(&self) -> usize {
        self.inner.container
    }

    /// The hidden measurement copy.
    pub fn measure_element(&self) -> usize {
        self.inner.measure
    }

    /// Visible copies, in order.
    pub fn instances(&self) -> Vec<usize> {
        self.inner.instances.borrow().clone()
    }

    /// Number of visible copies.
    pub fn repeat_count(&self) -> usize {
        self.inner.repeat_count.get()
    }

    pub fn label(&self) -> String {
        self.inner.label.borrow().clone()
    }

    pub fn gap(&self) -> f32 {
        self.inner.gap
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.alive.get()
    }

    /// Remeasure and re-render. Idempotent.
    pub fn recompute(&self) {
        self.inner.recompute();
    }

    /// Change the label and recompute.
    pub fn set_label(&self, label: impl Into<String>) {
        if !self.inner.alive.get() {
            return;
        }
        let label = label.into();
        if *self.inner.label.borrow() == label {
            return;
        }
        *self.inner.label.borrow_mut() = label.clone();

        engine::set_text(self.inner.measure, label.clone());
        for &index in self.inner.instances.borrow().iter() {
            engine::set_text(index, label.clone());
        }
        self.inner.recompute();
    }

    /// Release the resize observation and destroy the strip.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.observation.release();
        if self.inner.alive.get() {
            self.inner.alive.set(false);
            if is_allocated(self.inner.container) {
                engine::destroy_element(self.inner.container);
            }
        }
    }
}

impl Drop for LabelStrip {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for LabelStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelStrip")
            .field("container", &self.inner.container)
            .field("label", &*self.inner.label.borrow())
            .field("repeat_count", &self.repeat_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{create_element, reset_registry};
    use crate::state::viewport;

    fn setup() {
        reset_registry();
        config::reset_config();
        viewport::reset_viewport_state();
        resize_observer::reset_resize_observers();
        crate::pipeline::portal::reset_portals();
        crate::state::pointer::reset_pointer_state();
    }

    fn page() -> usize {
        create_element(None, ElementSpec::new(Role::MAIN))
    }

    #[test]
    fn test_tile_count_formula() {
        assert_eq!(tile_count(600.0, 80.0, 48.0), Some(5));
        assert_eq!(tile_count(300.0, 80.0, 48.0), Some(2));
        assert_eq!(tile_count(0.0, 80.0, 48.0), Some(1));
        assert_eq!(tile_count(50.0, 80.0, 0.0), Some(1));
        assert_eq!(tile_count(100.0, 0.0, 48.0), None);
        assert_eq!(tile_count(100.0, f32::NAN, 48.0), None);
    }

    #[test]
    fn test_mount_counts_copies() {
        setup();
        viewport::dispatch_resize(600.0, 24.0);
        let root = page();

        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "X".repeat(80),
            gap: Some(48.0),
            ..Default::default()
        });

        assert_eq!(strip.repeat_count(), 5);
        assert_eq!(strip.instances().len(), 5);
        assert_eq!(layout::size(strip.container()).map(|s| s.width), Some(600.0));
    }

    #[test]
    fn test_resize_recomputes() {
        setup();
        viewport::dispatch_resize(600.0, 24.0);
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "X".repeat(80),
            gap: Some(48.0),
            ..Default::default()
        });

        viewport::dispatch_resize(300.0, 24.0);
        assert_eq!(strip.repeat_count(), 2);
        assert_eq!(strip.instances().len(), 2);
    }

    #[test]
    fn test_label_wider_than_container_renders_one() {
        setup();
        viewport::dispatch_resize(20.0, 24.0);
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "A LABEL MUCH WIDER THAN TWENTY CELLS".into(),
            ..Default::default()
        });

        assert_eq!(strip.repeat_count(), 1);
        assert_eq!(strip.instances().len(), 1);
    }

    #[test]
    fn test_empty_label_keeps_previous_count() {
        setup();
        viewport::dispatch_resize(100.0, 24.0);
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "ABCD".into(),
            gap: Some(1.0),
            ..Default::default()
        });
        assert_eq!(strip.repeat_count(), 20);

        strip.set_label("");
        assert_eq!(strip.repeat_count(), 20);

        strip.set_label("ABCDEFGHI");
        assert_eq!(strip.repeat_count(), 10);
        assert!(strip
            .instances()
            .iter()
            .all(|&i| engine::text_content(i) == "ABCDEFGHI"));
    }

    #[test]
    fn test_default_gap_from_config() {
        setup();
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "X".into(),
            ..Default::default()
        });
        assert_eq!(strip.gap(), 48.0);
    }

    #[test]
    fn test_vertical_strip_uses_height() {
        setup();
        let column = create_element(
            None,
            ElementSpec::new(Role::SECTION).with_style(ElementStyle::sized(3.0, 30.0)),
        );
        let strip = label_strip(LabelStripProps {
            parent: Some(column),
            label: "SIGN".into(),
            orientation: Orientation::Vertical,
            gap: Some(2.0),
            rotate: Some(180.0),
            ..Default::default()
        });

        // (30 + 2) / (4 + 2) = 5.33
        assert_eq!(strip.repeat_count(), 5);
        let first = strip.instances()[0];
        assert_eq!(crate::engine::arrays::text::get_rotation(first), 180.0);
    }

    #[test]
    fn test_measure_copy_is_hidden() {
        setup();
        viewport::dispatch_resize(40.0, 10.0);
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "ABC".into(),
            gap: Some(1.0),
            ..Default::default()
        });
        assert!(crate::engine::arrays::core::is_hidden(strip.measure_element()));
        assert!(!strip.instances().contains(&strip.measure_element()));
    }

    #[test]
    fn test_unmount_releases_observer_and_elements() {
        setup();
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "ABC".into(),
            ..Default::default()
        });
        let container = strip.container();
        assert_eq!(resize_observer::observation_count(), 1);

        strip.unmount();
        assert_eq!(resize_observer::observation_count(), 0);
        assert!(!is_allocated(container));
        assert!(engine::children(root).is_empty());
    }

    #[test]
    fn test_destroyed_parent_then_drop_is_safe() {
        setup();
        let root = page();
        let strip = label_strip(LabelStripProps {
            parent: Some(root),
            label: "ABC".into(),
            ..Default::default()
        });

        engine::destroy_element(root);
        assert!(!strip.is_mounted());
        assert_eq!(resize_observer::observation_count(), 0);

        // A new element may now reuse the old index
        let other = page();
        drop(strip);
        assert!(is_allocated(other));
    }
}
