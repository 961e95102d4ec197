//! Velige engine crate.
//!
//! A retained-mode drawing layer over a GL-shaped [`device::GraphicsContext`]:
//! typed scalar data and vectors, vertex and index records packed into GPU
//! buffers, meshes with queued partial updates, and a [`render::SceneRenderer`]
//! that replays those updates and issues one indexed draw per mesh.

pub mod core;
pub mod data;
pub mod device;
pub mod graphics;
pub mod logging;
pub mod math;
pub mod render;
pub mod time;
pub mod window;

mod error;

pub use error::{Error, Result};
