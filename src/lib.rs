//! # spark-aside
//!
//! Viewport-aware layout components on a small reactive rendering host.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! observable state and [Taffy](https://github.com/DioxusLabs/taffy) for
//! flexbox layout.
//!
//! ## Components
//!
//! - [`label_strip`] - Tiles a label across a strip, as many copies as fit,
//!   recounting whenever the strip resizes or the label changes.
//! - [`disclosure`] - A trigger that reveals a quote either inline below it or
//!   in a floating side panel, depending on the room beside the content
//!   region, and dismisses itself on outside pointer-down or (floating) scroll.
//!
//! ## Architecture
//!
//! Elements are indices into parallel arrays, not objects. The host gives
//! components what a browser would:
//!
//! ```text
//! input → pointer / viewport dispatch → handlers mutate elements
//!       → flush: layout (Taffy) → resize observers
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry, roles, style
//! - [`engine`] - Element registry, arrays, tree queries
//! - [`layout`] - Taffy layout, bounds, hit testing
//! - [`state`] - Viewport, pointer, resize observation, terminal input
//! - [`pipeline`] - Flush, portals, terminal session
//! - [`primitives`] - The components
//! - [`config`] - TOML configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use config::{Config, ConfigIssue, DisclosureConfig, HostConfig, StripConfig};

pub use engine::{
    children, closest, contains, content_region, create_element, create_element_after,
    destroy_element, get_allocated_indices, get_id, get_index, is_allocated, on_destroy, parent,
    reset_registry, ElementSpec,
};

pub use layout::{bounds, document_bounds, document_size, hit_test, ComputedLayout};

pub use pipeline::{detect_viewport, flush, PortalKey, PortalMount, TerminalSession};

pub use primitives::{
    can_float, disclosure, floating_position, label_strip, tile_count, Cleanup, Disclosure,
    DisclosureContent, DisclosureMode, DisclosureProps, DisclosureState, LabelStrip,
    LabelStripProps, Subscription,
};

pub use state::pointer::{PointerAction, PointerEvent, PointerHandlers};

/// Reset all thread-local host state: elements, listeners, observers,
/// portals, viewport and configuration.
///
/// For tests and for hosts that rebuild the page from scratch.
pub fn reset_host() {
    reset_registry();
    state::viewport::reset_viewport_state();
    state::pointer::reset_pointer_state();
    state::resize_observer::reset_resize_observers();
    pipeline::portal::reset_portals();
    config::reset_config();
}
