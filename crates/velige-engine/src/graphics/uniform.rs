use crate::data::{DataType, TypedData, pack_typed_data};
use crate::math::{Matrix, Vector, VectorN};

/// Scalar family of a shader uniform. Every member is 4 bytes wide.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformScalar {
    Float,
    Sint,
    Uint,
}

impl UniformScalar {
    fn of(ty: DataType) -> Self {
        if ty.is_float() {
            Self::Float
        } else if ty.is_signed() {
            Self::Sint
        } else {
            Self::Uint
        }
    }

    fn gpu_type(self) -> DataType {
        match self {
            Self::Float => DataType::F32,
            Self::Sint => DataType::I32,
            Self::Uint => DataType::U32,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformShape {
    Scalar,
    Vector(usize),
    Matrix { columns: usize, rows: usize },
}

/// Shape and scalar family of a uniform, as declared by a shader or carried
/// by a value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformKind {
    pub shape: UniformShape,
    pub scalar: UniformScalar,
}

impl UniformKind {
    pub const fn new(shape: UniformShape, scalar: UniformScalar) -> Self {
        Self { shape, scalar }
    }

    /// Bytes occupied inside a uniform block.
    pub fn block_size(&self) -> usize {
        match self.shape {
            UniformShape::Scalar => 4,
            UniformShape::Vector(n) => 4 * n,
            UniformShape::Matrix { columns, rows } => columns * column_stride(rows),
        }
    }
}

/// Vec2 columns pack to 8 bytes; vec3 and vec4 columns align to 16.
#[inline]
fn column_stride(rows: usize) -> usize {
    if rows == 2 { 8 } else { 16 }
}

/// A value assignable to a shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Scalar(TypedData),
    Vector(Vector),
    Matrix(Matrix),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Scalar(d) => UniformKind::new(UniformShape::Scalar, UniformScalar::of(d.data_type())),
            Self::Vector(v) if v.len() == 1 => {
                UniformKind::new(UniformShape::Scalar, UniformScalar::of(v.data_type()))
            }
            Self::Vector(v) => {
                UniformKind::new(UniformShape::Vector(v.len()), UniformScalar::of(v.data_type()))
            }
            Self::Matrix(m) => UniformKind::new(
                UniformShape::Matrix {
                    columns: m.width(),
                    rows: m.height(),
                },
                UniformScalar::of(m.data_type()),
            ),
        }
    }

    fn values(&self) -> Vec<f64> {
        match self {
            Self::Scalar(d) => vec![d.value()],
            Self::Vector(v) => v.values().collect(),
            Self::Matrix(m) => m.values().collect(),
        }
    }

    /// Writes the value into `block` at `offset` using the layout of `kind`.
    ///
    /// Matrix data is consumed column by column from the flat sequence, so
    /// a matrix's first `rows` elements form its first column.
    pub fn write_block(&self, kind: UniformKind, block: &mut [u8], offset: usize) {
        let ty = kind.scalar.gpu_type();
        let values = self.values();

        match kind.shape {
            UniformShape::Scalar | UniformShape::Vector(_) => {
                let mut at = offset;
                for v in values {
                    at += pack_typed_data(at, &TypedData::new(v, ty), block);
                }
            }
            UniformShape::Matrix { rows, .. } => {
                let stride = column_stride(rows);
                for (i, v) in values.into_iter().enumerate() {
                    let at = offset + (i / rows) * stride + (i % rows) * 4;
                    pack_typed_data(at, &TypedData::new(v, ty), block);
                }
            }
        }
    }
}

impl From<TypedData> for UniformValue {
    fn from(d: TypedData) -> Self {
        Self::Scalar(d)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Scalar(TypedData::f32(v))
    }
}

impl From<Vector> for UniformValue {
    fn from(v: Vector) -> Self {
        Self::Vector(v)
    }
}

impl<const N: usize> From<VectorN<N>> for UniformValue {
    fn from(v: VectorN<N>) -> Self {
        Self::Vector(v.into_vector())
    }
}

impl From<Matrix> for UniformValue {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}
