use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, InitCtx, WindowCtx};
use crate::device::{Gpu, GpuInit, WgpuContext};
use crate::time::FrameClock;

/// Window and frame-loop settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Redraw every loop iteration instead of only on window damage.
    pub continuous: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "velige".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            continuous: true,
        }
    }
}

/// Single-window runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until it exits or the window closes.
    ///
    /// An error raised while creating the window, the GPU or the app's
    /// initial state is returned once the event loop has stopped.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            session: None,
            error: None,
            exiting: false,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        driver.error.map_or(Ok(()), Err)
    }
}

/// The window and the surface borrowing it.
#[self_referencing]
struct Surface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that lives as long as the window.
struct Session {
    surface: Surface,
    graphics: WgpuContext,
    clock: FrameClock,
}

impl Session {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let surface = SurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let graphics = surface.with_gpu(|gpu| gpu.create_context());
        log::debug!("session opened, surface format {:?}", graphics.format());

        Ok(Self {
            surface,
            graphics,
            clock: FrameClock::new(),
        })
    }

    fn request_redraw(&self) {
        self.surface.with_window(|w| w.request_redraw());
    }

    fn resize(&mut self, size: Option<PhysicalSize<u32>>) {
        let size = size.unwrap_or_else(|| self.surface.with_window(|w| w.inner_size()));
        self.surface.with_gpu_mut(|gpu| gpu.resize(size));
        self.request_redraw();
    }

    fn init<A: App>(&mut self, app: &mut A) -> Result<()> {
        let graphics = &mut self.graphics;
        self.surface.with_window(|w| {
            app.on_init(&mut InitCtx {
                window: WindowCtx { id: w.id(), window: w },
                graphics,
            })
        })
    }

    fn frame<A: App>(&mut self, app: &mut A) -> AppControl {
        let time = self.clock.tick();
        let graphics = &mut self.graphics;
        self.surface.with_mut(|fields| {
            let window = fields.window;
            app.on_frame(&mut FrameCtx {
                window: WindowCtx { id: window.id(), window },
                gpu: fields.gpu,
                graphics,
                time,
            })
        })
    }
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    session: Option<Session>,
    error: Option<anyhow::Error>,
    exiting: bool,
}

impl<A: App + 'static> Driver<A> {
    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exiting = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut session = Session::open(event_loop, &self.config, self.gpu_init.clone())?;
        session.init(&mut self.app).context("app initialization failed")?;
        session.request_redraw();
        self.session = Some(session);
        Ok(())
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            self.exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        if let (true, Some(session)) = (self.config.continuous, &self.session) {
            session.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.exiting || self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }
        let Some(session) = self.session.as_mut() else { return };

        let control = match event {
            WindowEvent::CloseRequested => AppControl::Exit,
            WindowEvent::Resized(size) => {
                session.resize(Some(size));
                AppControl::Continue
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                session.resize(None);
                AppControl::Continue
            }
            WindowEvent::RedrawRequested => session.frame(&mut self.app),
            _ => AppControl::Continue,
        };

        if control == AppControl::Exit {
            self.session = None;
            self.exit(event_loop);
        }
    }
}
