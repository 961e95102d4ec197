use super::DataType;

/// A scalar tagged with a fixed-width numeric type.
///
/// The type is fixed at construction; only the value can change. Values are
/// held as `f64` and narrowed to the tagged type when packed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TypedData {
    value: f64,
    ty: DataType,
}

impl TypedData {
    #[inline]
    pub const fn new(value: f64, ty: DataType) -> Self {
        Self { value, ty }
    }

    #[inline]
    pub const fn f32(value: f32) -> Self {
        Self::new(value as f64, DataType::F32)
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    #[inline]
    pub const fn data_type(&self) -> DataType {
        self.ty
    }

    /// Size in bytes; always `data_type().size()`.
    #[inline]
    pub const fn size(&self) -> usize {
        self.ty.size()
    }
}
