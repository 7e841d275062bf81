//! Components - Viewport-aware building blocks.
//!
//! - [`label_strip`] - Fills a strip with as many copies of a label as fit
//! - [`disclosure`] - Trigger that reveals content inline or in a side panel
//!
//! # Architecture
//!
//! Components are groups of element indices plus a handle. Each component:
//! 1. Creates its elements through `engine`
//! 2. Registers handlers, observers and listeners, each held by a
//!    [`Subscription`] guard
//! 3. Recomputes explicitly from those handlers
//! 4. Returns a handle; dropping it (or `unmount()`) releases everything

mod types;
mod label_strip;
mod disclosure;

pub use types::*;
pub use label_strip::{label_strip, tile_count, LabelStrip};
pub use disclosure::{
    can_float, disclosure, floating_position, Disclosure, DisclosureMode, DisclosureState,
};
