//! Meshes, materials and the buffers that carry them to the GPU.

mod buffer;
mod indices;
mod material;
mod mesh;
mod mesh_buffer;
mod shader;
mod uniform;
mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::GpuBuffer;
pub use indices::Indices;
pub use material::{Material, MaterialRef};
pub use mesh::{BufferUpdate, BufferUpdateMode, DrawMode, Mesh, MeshRef};
pub use mesh_buffer::{IndicesBuffer, MeshBuffer, Record, VertexBuffer};
pub use shader::{FRAGMENT_ENTRY, Shader, ShaderError, ShaderStage, UniformDecl, VERTEX_ENTRY};
pub use uniform::{UniformKind, UniformScalar, UniformShape, UniformValue};
pub use vertex::{Vertex, VertexAttribute};
