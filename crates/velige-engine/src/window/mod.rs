//! The winit event loop, one window and its GPU session.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
