//! Window + event loop.
//!
//! Owns the `winit` event loop and the single window, and feeds its size
//! notifications and redraw requests to the ring field.

mod runtime;

pub use runtime::Runtime;
