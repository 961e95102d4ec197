//! Little-endian serialization of [`TypedData`] into byte buffers.

use super::{DataType, TypedData};

/// Writes `data` into `buffer` at `offset` and returns the number of bytes written.
///
/// Integers are narrowed with saturating casts; `f32` uses its IEEE-754 bits.
///
/// # Panics
/// Panics if `buffer` is shorter than `offset + data.size()`.
pub fn pack_typed_data(offset: usize, data: &TypedData, buffer: &mut [u8]) -> usize {
    let v = data.value();
    let dst = &mut buffer[offset..offset + data.size()];

    match data.data_type() {
        DataType::U8 => dst.copy_from_slice(&(v as u8).to_le_bytes()),
        DataType::U16 => dst.copy_from_slice(&(v as u16).to_le_bytes()),
        DataType::U32 => dst.copy_from_slice(&(v as u32).to_le_bytes()),
        DataType::I8 => dst.copy_from_slice(&(v as i8).to_le_bytes()),
        DataType::I16 => dst.copy_from_slice(&(v as i16).to_le_bytes()),
        DataType::I32 => dst.copy_from_slice(&(v as i32).to_le_bytes()),
        DataType::F32 => dst.copy_from_slice(&(v as f32).to_le_bytes()),
    }

    data.size()
}

/// Packs a run of scalars back to back starting at `offset`.
///
/// Returns the offset just past the last byte written.
pub fn pack_all<'a, I>(mut offset: usize, data: I, buffer: &mut [u8]) -> usize
where
    I: IntoIterator<Item = &'a TypedData>,
{
    for d in data {
        offset += pack_typed_data(offset, d, buffer);
    }
    offset
}

/// Reads a scalar of type `ty` from `buffer` at `offset`.
///
/// # Panics
/// Panics if `buffer` is shorter than `offset + ty.size()`.
pub fn read_typed_data(offset: usize, ty: DataType, buffer: &[u8]) -> TypedData {
    let src = &buffer[offset..offset + ty.size()];

    let value = match ty {
        DataType::U8 => src[0] as f64,
        DataType::I8 => src[0] as i8 as f64,
        DataType::U16 => u16::from_le_bytes([src[0], src[1]]) as f64,
        DataType::I16 => i16::from_le_bytes([src[0], src[1]]) as f64,
        DataType::U32 => u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as f64,
        DataType::I32 => i32::from_le_bytes([src[0], src[1], src[2], src[3]]) as f64,
        DataType::F32 => f32::from_le_bytes([src[0], src[1], src[2], src[3]]) as f64,
    };

    TypedData::new(value, ty)
}
