use thiserror::Error;

use crate::data::{BufferTarget, BufferUsage, DataType};
use crate::graphics::{DrawMode, Shader, UniformKind, UniformValue, VertexAttribute};

/// Opaque handle to a GPU buffer owned by a context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub(crate) u64);

/// Opaque handle to a linked shader program owned by a context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub(crate) u64);

/// Resolved location of a uniform inside a program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    pub program: ProgramId,
    pub offset: u32,
    pub kind: UniformKind,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("unsupported by this context: {0}")]
    Unsupported(String),

    #[error("failed to create program: {0}")]
    Program(String),

    #[error("no program is in use")]
    NoProgram,

    #[error("no {0:?} buffer is bound")]
    NoBuffer(BufferTarget),
}

/// Immediate-mode GPU interface with bind points, in the style of GL.
///
/// Buffer and program handles are only meaningful to the context that
/// created them. Calls that reference a deleted handle are ignored.
pub trait GraphicsContext {
    /// Creates a buffer holding a copy of `data`.
    fn create_buffer(&mut self, target: BufferTarget, usage: BufferUsage, data: &[u8]) -> Option<BufferId>;

    /// Overwrites bytes `offset..offset + data.len()` of `buffer`.
    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]);

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);

    fn delete_buffer(&mut self, buffer: BufferId);

    fn create_program(&mut self, shader: &Shader) -> Result<ProgramId, ContextError>;

    fn delete_program(&mut self, program: ProgramId);

    fn use_program(&mut self, program: ProgramId);

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Stores `value` for the program named by `location`.
    fn set_uniform(&mut self, location: &UniformLocation, value: &UniformValue);

    /// Sources `attribute` from the buffer currently bound to [`BufferTarget::Array`].
    fn enable_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), ContextError>;

    /// Disables every enabled attribute, so the next draw reads only the
    /// attributes enabled after this call.
    fn disable_vertex_attributes(&mut self);

    fn clear(&mut self, color: [f32; 4]);

    /// Draws `count` indices from the bound element buffer, starting at byte `offset`.
    fn draw_elements(
        &mut self,
        mode: DrawMode,
        count: usize,
        index_type: DataType,
        offset: usize,
    ) -> Result<(), ContextError>;

    /// Submits everything recorded since the last flush.
    fn flush(&mut self);
}
