use crate::data::{ByteSized, DataType};
use crate::error::{Error, Result};
use crate::math::Vector;

/// Layout of one vertex attribute inside an interleaved vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Shader input location.
    pub index: u32,
    /// Components per attribute (1..=4).
    pub component_count: usize,
    pub data_type: DataType,
    pub normalized: bool,
    /// Bytes between consecutive vertices.
    pub stride: usize,
    /// Byte offset of the first component inside a vertex.
    pub offset: usize,
}

/// An ordered set of vectors forming one interleaved vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    vectors: Vec<Vector>,
    size: usize,
}

impl Vertex {
    pub fn new(vectors: Vec<Vector>) -> Self {
        let size = vectors.iter().map(Vector::size).sum();
        Self { vectors, size }
    }

    #[inline]
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn set_vectors(&mut self, vectors: Vec<Vector>) {
        *self = Self::new(vectors);
    }

    /// Replaces one vector; the vertex size follows.
    pub fn set_vector(&mut self, index: usize, vector: Vector) -> Result<()> {
        let len = self.vectors.len();
        let slot = self
            .vectors
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = vector;
        self.size = self.vectors.iter().map(Vector::size).sum();
        Ok(())
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// True when both vertices have pairwise equal vector types and lengths.
    pub fn same_shape(&self, other: &Vertex) -> bool {
        self.vectors.len() == other.vectors.len()
            && self.vectors.iter().zip(&other.vectors).all(|(a, b)| a.same_shape(b))
    }

    /// One attribute per vector, at location `i`, interleaved with stride
    /// equal to the vertex size.
    pub fn attributes(&self) -> Vec<VertexAttribute> {
        let mut offset = 0;
        self.vectors
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let attr = VertexAttribute {
                    index: i as u32,
                    component_count: v.len(),
                    data_type: v.data_type(),
                    normalized: false,
                    stride: self.size,
                    offset,
                };
                offset += v.size();
                attr
            })
            .collect()
    }
}

impl ByteSized for Vertex {
    #[inline]
    fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{float2, float4, ubyte4};

    fn colored(x: f32, y: f32) -> Vertex {
        Vertex::new(vec![float2(x, y).into(), float4(1.0, 0.0, 0.0, 1.0).into()])
    }

    #[test]
    fn attributes_are_interleaved() {
        let attrs = colored(0.0, 0.0).attributes();
        assert_eq!(attrs.len(), 2);

        assert_eq!(attrs[0].index, 0);
        assert_eq!(attrs[0].component_count, 2);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[0].stride, 24);

        assert_eq!(attrs[1].index, 1);
        assert_eq!(attrs[1].component_count, 4);
        assert_eq!(attrs[1].data_type, DataType::F32);
        assert_eq!(attrs[1].offset, 8);
        assert!(!attrs[1].normalized);
    }

    #[test]
    fn size_follows_vector_changes() {
        let mut v = colored(0.0, 0.0);
        assert_eq!(v.size(), 24);

        v.set_vector(1, ubyte4(255, 0, 0, 255).into()).unwrap();
        assert_eq!(v.size(), 12);
        assert_eq!(v.attributes()[1].data_type, DataType::U8);

        assert!(v.set_vector(2, float2(0.0, 0.0).into()).is_err());
    }

    #[test]
    fn shape_compares_types_and_lengths() {
        let a = colored(0.0, 0.0);
        assert!(a.same_shape(&colored(5.0, 6.0)));

        let b = Vertex::new(vec![float2(0.0, 0.0).into(), ubyte4(0, 0, 0, 0).into()]);
        assert!(!a.same_shape(&b));

        let c = Vertex::new(vec![float2(0.0, 0.0).into()]);
        assert!(!a.same_shape(&c));
    }
}
