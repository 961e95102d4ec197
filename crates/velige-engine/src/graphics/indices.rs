use crate::data::{ByteSized, DataType};
use crate::math::Vector3;

/// The three vertex indices of one triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Indices {
    indices: Vector3,
}

impl Indices {
    pub fn new(indices: Vector3) -> Self {
        Self { indices }
    }

    #[inline]
    pub fn indices(&self) -> &Vector3 {
        &self.indices
    }

    pub fn set_indices(&mut self, indices: Vector3) {
        self.indices = indices;
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.indices.data_type()
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.indices.size()
    }
}

impl From<Vector3> for Indices {
    fn from(indices: Vector3) -> Self {
        Self::new(indices)
    }
}

impl ByteSized for Indices {
    #[inline]
    fn size(&self) -> usize {
        Indices::size(self)
    }
}
