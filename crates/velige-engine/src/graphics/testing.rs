//! Fixtures shared by the graphics unit tests.

use std::rc::Rc;

use crate::math::{float2, float4};

use super::material::{Material, MaterialRef};
use super::shader::Shader;
use super::vertex::Vertex;

pub(crate) const FLAT_VS: &str = r#"
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

pub(crate) const FLAT_FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

pub(crate) fn flat_shader() -> Rc<Shader> {
    Rc::new(Shader::new(FLAT_VS, FLAT_FS).expect("flat shader compiles"))
}

pub(crate) fn flat_material() -> MaterialRef {
    Material::new(flat_shader()).into_shared()
}

pub(crate) fn triangle_vertex(x: f32, y: f32) -> Vertex {
    Vertex::new(vec![float2(x, y).into(), float4(1.0, 1.0, 1.0, 1.0).into()])
}
