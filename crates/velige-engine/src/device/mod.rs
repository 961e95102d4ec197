//! GPU access.
//!
//! - [`GraphicsContext`]: the bind-point style interface the scene code draws through
//! - [`HeadlessContext`]: an in-memory implementation for tests and tooling
//! - [`WgpuContext`]: the wgpu implementation
//! - [`Gpu`]: device, queue and swapchain for a window

mod context;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;
mod wgpu_context;

pub use context::{BufferId, ContextError, GraphicsContext, ProgramId, UniformLocation};
pub use surface::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::{Command, DrawCall, HeadlessContext};
pub use init::GpuInit;
pub use wgpu_context::WgpuContext;
