use crate::error::{Error, Result};

/// Numeric element type of a [`TypedData`](super::TypedData).
///
/// Each variant has a fixed byte width; see [`DataType::size`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
}

impl DataType {
    /// Every scalar type, unsigned first.
    pub const ALL: [DataType; 7] = [
        DataType::U8,
        DataType::U16,
        DataType::U32,
        DataType::I8,
        DataType::I16,
        DataType::I32,
        DataType::F32,
    ];

    /// Width of one element in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            DataType::U8 | DataType::I8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
        }
    }

    /// Returns the unsigned type with the given width.
    ///
    /// Widths are ambiguous (4 bytes is `u32`, `i32` and `f32`); the unsigned
    /// integer type is chosen, matching how index widths are usually derived.
    pub fn with_size(size: usize) -> Result<Self> {
        match size {
            1 => Ok(DataType::U8),
            2 => Ok(DataType::U16),
            4 => Ok(DataType::U32),
            other => Err(Error::NoTypeWithSize(other)),
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, DataType::F32)
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, DataType::I8 | DataType::I16 | DataType::I32 | DataType::F32)
    }
}

/// GPU buffer kind a byte layout is uploaded to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data.
    Element,
}

/// Expected update frequency of a GPU buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
}
