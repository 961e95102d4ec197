//! Rotating color circle.
//!
//! `R` removes the circle from the scene, `A` adds it back.

use std::f32::consts::TAU;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;
use winit::window::WindowId;

use velige_engine::core::{App, AppControl, FrameCtx, InitCtx};
use velige_engine::device::GpuInit;
use velige_engine::graphics::{DrawMode, Indices, Material, MaterialRef, Mesh, MeshRef, Shader, Vertex};
use velige_engine::logging::{LoggingConfig, init_logging};
use velige_engine::math::{Matrix, Transform, float2, float4, ubyte3};
use velige_engine::render::SceneRenderer;
use velige_engine::window::{Runtime, RuntimeConfig};

const RESOLUTION: u8 = 40;
const RADIUS: f32 = 1.0;
/// Rim vertices per color band.
const BAND: usize = 13;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SceneEdit {
    Add,
    Remove,
}

#[derive(Default)]
struct ColorCircle {
    scene: SceneRenderer,
    circle: Option<(MeshRef, MaterialRef)>,
    pending: Option<SceneEdit>,
}

impl App for ColorCircle {
    fn on_init(&mut self, ctx: &mut InitCtx<'_>) -> Result<()> {
        let shaders = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        let shader = Shader::load_from(shaders.join("flat.vert.wgsl"), shaders.join("flat.frag.wgsl"))?;
        let material = Material::new(Rc::new(shader)).into_shared();

        let mesh = circle_mesh(material.clone())?;
        self.scene.add_mesh(ctx.graphics, &mesh)?;
        self.circle = Some((mesh, material));

        log::info!("press R to remove the circle, A to add it");
        Ok(())
    }

    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state != ElementState::Pressed {
                return AppControl::Continue;
            }
            match event.logical_key.as_ref() {
                Key::Character("r") => self.pending = Some(SceneEdit::Remove),
                Key::Character("a") => self.pending = Some(SceneEdit::Add),
                _ => {}
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some((mesh, material)) = &self.circle else {
            return AppControl::Exit;
        };

        match self.pending.take() {
            Some(SceneEdit::Add) => {
                if let Err(e) = self.scene.add_mesh(ctx.graphics, mesh) {
                    log::error!("failed to add circle: {e}");
                }
            }
            Some(SceneEdit::Remove) => {
                self.scene.remove_mesh(ctx.graphics, mesh);
            }
            None => {}
        }

        let (width, height) = ctx.window.physical_size();
        let (width, height) = (width.max(1) as f32, height.max(1) as f32);
        let angle = ctx.time.elapsed as f32 * 4.0;

        let camera = Transform::new(float2(-width / 2.0, -height / 2.0), 0.0, float2(1.0, 1.0));
        let model = Transform::new(float2(0.0, 0.0), angle, float2(50.0, 50.0));
        {
            let mut material = material.borrow_mut();
            let uniforms = [
                ("projection", Matrix::projection(width, height)),
                ("view", camera.matrix()),
                ("model", model.matrix()),
            ];
            for (name, value) in uniforms {
                if let Err(e) = material.set_uniform(name, value) {
                    log::warn!("{e}");
                }
            }
        }

        let scene = &mut self.scene;
        ctx.render(|graphics| {
            if let Err(e) = scene.render(graphics) {
                log::error!("render failed: {e}");
            }
        })
    }
}

/// A fan of triangles around a white center, its rim banded red, green
/// and blue.
fn circle_mesh(material: MaterialRef) -> velige_engine::Result<MeshRef> {
    let colors = [
        float4(1.0, 0.0, 0.0, 1.0),
        float4(0.0, 1.0, 0.0, 1.0),
        float4(0.0, 0.0, 1.0, 1.0),
    ];

    let mut vertices = vec![Vertex::new(vec![
        float2(0.0, 0.0).into(),
        float4(1.0, 1.0, 1.0, 1.0).into(),
    ])];
    for j in 0..usize::from(RESOLUTION) {
        let angle = TAU * j as f32 / f32::from(RESOLUTION);
        let position = float2(angle.sin() * RADIUS, angle.cos() * RADIUS);
        let color = colors[(j / BAND) % colors.len()].clone();
        vertices.push(Vertex::new(vec![position.into(), color.into()]));
    }

    let mut indices: Vec<Indices> = (1..RESOLUTION).map(|j| ubyte3(0, j, j + 1).into()).collect();
    indices.push(ubyte3(0, RESOLUTION, 1).into());

    Mesh::new(vertices, indices, material, DrawMode::Triangles).map(Mesh::into_shared)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "velige · color circle".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), ColorCircle::default())
}
