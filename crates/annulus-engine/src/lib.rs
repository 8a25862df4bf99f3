//! Annulus engine crate.
//!
//! Renders a fixed population of randomly colored, placed and scaled rings with
//! a single instanced draw per frame.

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod random;
pub mod render;
pub mod window;

pub use config::AppConfig;
pub use error::RenderError;
