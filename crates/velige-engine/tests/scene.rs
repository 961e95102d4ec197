//! End-to-end scene rendering against the headless context.

use std::f32::consts::TAU;
use std::rc::Rc;

use velige_engine::data::{BufferTarget, BufferUsage, DataType};
use velige_engine::device::{Command, HeadlessContext};
use velige_engine::graphics::{
    DrawMode, Indices, IndicesBuffer, Material, MaterialRef, Mesh, MeshRef, Shader, UniformValue,
    Vertex, VertexBuffer,
};
use velige_engine::math::{Matrix, Transform, float2, float4, ubyte3};
use velige_engine::render::SceneRenderer;

const VS: &str = r#"
struct Transforms {
    projection: mat3x3<f32>,
    view: mat3x3<f32>,
    model: mat3x3<f32>,
};
@group(0) @binding(0) var<uniform> transforms: Transforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec2<f32>, @location(1) color: vec4<f32>) -> VsOut {
    let p = transforms.projection * transforms.view * transforms.model * vec3<f32>(pos, 1.0);
    var out: VsOut;
    out.position = vec4<f32>(p.xy, 0.0, 1.0);
    out.color = color;
    return out;
}
"#;

const FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

const RESOLUTION: usize = 40;

fn material() -> MaterialRef {
    let shader = Rc::new(Shader::new(VS, FS).unwrap());
    let mut material = Material::new(shader);
    material.set_uniform("projection", Matrix::projection(800.0, 600.0)).unwrap();
    material.set_uniform("view", Transform::default().matrix()).unwrap();
    material.set_uniform("model", Transform::default().matrix()).unwrap();
    material.into_shared()
}

fn circle(material: MaterialRef) -> MeshRef {
    let colors = [float4(1.0, 0.0, 0.0, 1.0), float4(0.0, 1.0, 0.0, 1.0), float4(0.0, 0.0, 1.0, 1.0)];

    let mut vertices = vec![Vertex::new(vec![float2(0.0, 0.0).into(), float4(1.0, 1.0, 1.0, 1.0).into()])];
    for j in 0..RESOLUTION {
        let angle = TAU * j as f32 / RESOLUTION as f32;
        let color = colors[(j / 13) % colors.len()].clone();
        vertices.push(Vertex::new(vec![float2(angle.sin(), angle.cos()).into(), color.into()]));
    }

    let mut indices: Vec<Indices> = (1..RESOLUTION as u8)
        .map(|j| ubyte3(0, j, j + 1).into())
        .collect();
    indices.push(ubyte3(0, RESOLUTION as u8, 1).into());

    Mesh::new(vertices, indices, material, DrawMode::Triangles)
        .unwrap()
        .into_shared()
}

#[test]
fn circle_mesh_draws_every_triangle() {
    let mesh = circle(material());
    {
        let m = mesh.borrow();
        assert_eq!(m.vertices().len(), RESOLUTION + 1);
        assert_eq!(m.indices().len(), RESOLUTION);
        assert_eq!(m.index_count(), 120);
        assert_eq!(m.index_type(), DataType::U8);
        assert_eq!(IndicesBuffer::inline_data(m.indices()).len(), RESOLUTION * 3);
    }

    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();
    assert!(scene.add_mesh(&mut ctx, &mesh).unwrap());
    scene.render(&mut ctx).unwrap();

    let draws: Vec<_> = ctx.draws().collect();
    assert_eq!(draws.len(), 1);
    let draw = draws[0];
    assert_eq!(draw.mode, DrawMode::Triangles);
    assert_eq!(draw.count, 120);
    assert_eq!(draw.offset, 0);
    assert_eq!(ctx.buffer_data(draw.index_buffer).map(<[u8]>::len), Some(120));
    assert_eq!(ctx.buffer_usage(draw.index_buffer), Some(BufferUsage::Static));

    let vertex_buffer = draw.attributes[0].1;
    assert_eq!(ctx.buffer_target(vertex_buffer), Some(BufferTarget::Array));
    assert_eq!(ctx.buffer_usage(vertex_buffer), Some(BufferUsage::Dynamic));
    assert_eq!(ctx.buffer_data(vertex_buffer).map(<[u8]>::len), Some(41 * 24));
}

#[test]
fn uniforms_reach_the_program() {
    let material = material();
    let mesh = circle(material.clone());
    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();
    scene.add_mesh(&mut ctx, &mesh).unwrap();
    scene.render(&mut ctx).unwrap();

    let program = material.borrow().shader().program().unwrap();
    assert_eq!(
        ctx.uniform(program, "projection"),
        Some(&UniformValue::from(Matrix::projection(800.0, 600.0)))
    );
    let uploads = ctx.uniform_upload_count();
    assert_eq!(uploads, 3);

    // Unchanged uniforms are not uploaded again.
    scene.render(&mut ctx).unwrap();
    assert_eq!(ctx.uniform_upload_count(), uploads);

    let spin = Transform::new(float2(0.0, 0.0), 0.5, float2(50.0, 50.0));
    material.borrow_mut().set_uniform("model", spin.matrix()).unwrap();
    scene.render(&mut ctx).unwrap();
    assert_eq!(ctx.uniform_upload_count(), uploads + 1);
}

#[test]
fn queued_updates_replay_in_order() {
    let mesh = circle(material());
    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();
    scene.add_mesh(&mut ctx, &mesh).unwrap();
    ctx.take_commands();

    {
        let mut m = mesh.borrow_mut();
        let white = Vertex::new(vec![float2(0.5, 0.5).into(), float4(1.0, 1.0, 1.0, 1.0).into()]);
        m.update_vertices(&[white.clone(), white], 3).unwrap();
        m.update_indices(&[ubyte3(0, 2, 1).into()], 0).unwrap();
        m.update_vertices(&[Vertex::new(vec![float2(0.0, 0.0).into(), float4(0.0, 0.0, 0.0, 1.0).into()])], 0)
            .unwrap();
    }
    scene.render(&mut ctx).unwrap();

    let writes: Vec<(usize, usize)> = ctx
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::WriteBuffer { offset, len, .. } => Some((*offset, *len)),
            _ => None,
        })
        .collect();
    assert_eq!(writes, vec![(72, 48), (0, 24), (0, 3)]);

    let m = mesh.borrow();
    assert!(m.vertex_updates().is_empty());
    assert!(m.index_updates().is_empty());

    let draw = ctx.draws().next().unwrap();
    let vb = draw.attributes[0].1;
    assert_eq!(ctx.buffer_data(vb), Some(VertexBuffer::inline_data(m.vertices()).as_slice()));
    assert_eq!(
        ctx.buffer_data(draw.index_buffer),
        Some(IndicesBuffer::inline_data(m.indices()).as_slice())
    );
}

#[test]
fn overlapping_updates_keep_the_last_write() {
    let mesh = circle(material());
    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();
    scene.add_mesh(&mut ctx, &mesh).unwrap();

    let red = Vertex::new(vec![float2(1.0, 1.0).into(), float4(1.0, 0.0, 0.0, 1.0).into()]);
    let blue = Vertex::new(vec![float2(2.0, 2.0).into(), float4(0.0, 0.0, 1.0, 1.0).into()]);
    {
        let mut m = mesh.borrow_mut();
        m.update_vertices(&[red.clone(), red], 0).unwrap();
        m.update_vertices(&[blue.clone()], 1).unwrap();
    }
    scene.render(&mut ctx).unwrap();

    let vb = ctx.draws().next().unwrap().attributes[0].1;
    let data = ctx.buffer_data(vb).unwrap();
    assert_eq!(&data[24..48], VertexBuffer::inline_data(&[blue]).as_slice());
    assert_eq!(data, VertexBuffer::inline_data(mesh.borrow().vertices()).as_slice());
}

#[test]
fn remove_then_add_again() {
    let mesh = circle(material());
    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();

    assert!(scene.add_mesh(&mut ctx, &mesh).unwrap());
    assert!(!scene.add_mesh(&mut ctx, &mesh).unwrap());
    assert!(scene.remove_mesh(&mut ctx, &mesh));
    assert!(!scene.remove_mesh(&mut ctx, &mesh));
    assert_eq!(ctx.live_buffer_count(), 0);

    ctx.take_commands();
    scene.render(&mut ctx).unwrap();
    assert_eq!(ctx.draws().count(), 0);
    assert_eq!(ctx.commands().last(), Some(&Command::Flush));

    assert!(scene.add_mesh(&mut ctx, &mesh).unwrap());
    scene.render(&mut ctx).unwrap();
    assert_eq!(ctx.draws().count(), 1);
    assert_eq!(ctx.live_buffer_count(), 2);
}

#[test]
fn fan_mode_is_forwarded() {
    let mesh = circle(material());
    mesh.borrow_mut().set_draw_mode(DrawMode::TriangleFan);

    let mut ctx = HeadlessContext::new();
    let mut scene = SceneRenderer::new();
    scene.add_mesh(&mut ctx, &mesh).unwrap();
    scene.render(&mut ctx).unwrap();

    assert_eq!(ctx.draws().next().map(|d| d.mode), Some(DrawMode::TriangleFan));
}
