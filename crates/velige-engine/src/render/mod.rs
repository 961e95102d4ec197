//! Scene rendering.

mod scene;

pub use scene::SceneRenderer;
