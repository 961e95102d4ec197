use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction, WgpuContext};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Drawable size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Context passed to [`super::App::on_init`].
pub struct InitCtx<'a> {
    pub window: WindowCtx<'a>,
    pub graphics: &'a mut WgpuContext,
}

/// Per-frame context passed to [`super::App::on_frame`].
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub graphics: &'a mut WgpuContext,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Acquires the next surface texture, points the graphics context at it,
    /// runs `draw` and presents the result.
    ///
    /// `draw` is expected to flush the context; commands still pending
    /// afterwards are flushed before presenting.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&mut WgpuContext),
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface error: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        self.graphics.set_target(frame.view.clone());
        draw(self.graphics);
        crate::device::GraphicsContext::flush(self.graphics);

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
