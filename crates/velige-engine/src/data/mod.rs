//! Typed scalars and their byte encoding.
//!
//! Everything the GPU consumes is built from [`TypedData`] values packed
//! little-endian at their natural width.

mod pack;
mod typed;
mod types;

pub use pack::{pack_all, pack_typed_data, read_typed_data};
pub use typed::TypedData;
pub use types::{BufferTarget, BufferUsage, DataType};

/// Byte size of a value as laid out in a GPU buffer.
pub trait ByteSized {
    fn size(&self) -> usize;
}

impl ByteSized for TypedData {
    #[inline]
    fn size(&self) -> usize {
        TypedData::size(self)
    }
}

/// Sum of the byte sizes of `items`.
pub fn size_of_many<T: ByteSized>(items: &[T]) -> usize {
    items.iter().map(ByteSized::size).sum()
}
