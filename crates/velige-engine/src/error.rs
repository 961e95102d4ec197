use thiserror::Error;

use crate::data::DataType;
use crate::device::ContextError;
use crate::graphics::{ShaderError, UniformKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checked precondition failures of the engine's data model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("mixed data types: expected {expected:?}, found {found:?}")]
    MixedDataTypes { expected: DataType, found: DataType },

    #[error("no data type is {0} bytes wide")]
    NoTypeWithSize(usize),

    #[error("a vector needs at least one component")]
    EmptyVector,

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("matrix dimensions {width}x{height} do not fit {len} elements")]
    MatrixDimensions { width: usize, height: usize, len: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("range {offset}..{end} out of bounds for length {len}")]
    RangeOutOfBounds { offset: usize, end: usize, len: usize },

    #[error("a mesh needs at least one vertex and one triangle")]
    EmptyMesh,

    #[error("shader declares no uniform named `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is {expected:?}, got {found:?}")]
    UniformMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Context(#[from] ContextError),
}
