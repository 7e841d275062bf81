//! Host Pipeline
//!
//! Connects input dispatch to layout and observation delivery.
//!
//! ```text
//! input event → handlers mutate elements → flush: layout → resize observers
//! ```
//!
//! - **flush** - Settle layout and deliver resize observations
//! - **portal** - Detached render targets keyed by `PortalKey`
//! - **terminal** - Viewport detection and terminal session setup

mod flush;
pub mod portal;
pub mod terminal;

pub use flush::flush;
pub use portal::{PortalKey, PortalMount};
pub use terminal::{detect_viewport, TerminalSession};
