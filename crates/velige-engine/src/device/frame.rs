/// A swapchain texture acquired by [`super::Gpu::begin_frame`].
///
/// The next frame cannot be acquired until this one is handed to
/// [`super::Gpu::present`].
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    /// Render target for the frame, passed to `WgpuContext::set_target`.
    pub view: wgpu::TextureView,
}
