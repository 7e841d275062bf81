//! State Module - Host state and event systems
//!
//! - **viewport** - Viewport size and scroll offset, global resize/scroll listeners
//! - **pointer** - Pointer dispatch, capture-phase listeners, click bubbling
//! - **resize_observer** - Per-element size observation, delivered on flush
//! - **input** - crossterm event conversion and routing

pub mod input;
pub mod pointer;
pub mod resize_observer;
pub mod viewport;
