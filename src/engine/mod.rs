//! Engine - Element registry, parallel arrays and the element tree.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping, destroy callbacks
//! - Arrays: Per-element columns (role, style, text, tree links)
//! - Element: Creation, mutation and DOM-like tree queries
//!
//! # Architecture
//!
//! Elements are NOT objects. They are indices into parallel arrays:
//!
//! ```text
//! Index 0: Article   (parent=None, children=[1])
//! Index 1: Paragraph (parent=0,    children=[2, 3])
//! Index 2: Text      (parent=1,    text="Our clients say ")
//! Index 3: Button    (parent=1,    text="it changed everything")
//! ```

mod registry;
mod element;
pub mod arrays;

pub use registry::*;
pub use element::*;
