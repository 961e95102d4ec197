use std::cell::RefCell;
use std::rc::Rc;

use crate::data::DataType;
use crate::error::{Error, Result};

use super::indices::Indices;
use super::material::MaterialRef;
use super::vertex::Vertex;

/// How indices are assembled into primitives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DrawMode {
    #[default]
    Triangles,
    TriangleFan,
    TriangleStrip,
    Lines,
    LineStrip,
    LineLoop,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUpdateMode {
    None,
    /// The whole array was replaced.
    All,
    /// Records `offset..offset + length` were overwritten in place.
    Keep,
}

/// A pending GPU buffer refresh, in records.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferUpdate {
    pub mode: BufferUpdateMode,
    pub offset: usize,
    pub length: usize,
}

impl BufferUpdate {
    fn all(length: usize) -> Self {
        Self { mode: BufferUpdateMode::All, offset: 0, length }
    }

    fn keep(offset: usize, length: usize) -> Self {
        Self { mode: BufferUpdateMode::Keep, offset, length }
    }
}

/// Mesh shared between the application and a renderer.
pub type MeshRef = Rc<RefCell<Mesh>>;

/// Vertices, triangle indices and a material.
///
/// All vertices share the shape of the first one and all indices share one
/// unsigned type. Every mutation records a [`BufferUpdate`] that the
/// renderer replays, in order, on its next frame.
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<Indices>,
    material: MaterialRef,
    draw_mode: DrawMode,
    vertex_updates: Vec<BufferUpdate>,
    index_updates: Vec<BufferUpdate>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<Indices>,
        material: MaterialRef,
        draw_mode: DrawMode,
    ) -> Result<Self> {
        let (Some(first_vertex), Some(first_index)) = (vertices.first(), indices.first()) else {
            return Err(Error::EmptyMesh);
        };
        check_vertices(first_vertex, &vertices)?;
        check_index_type(first_index.data_type())?;
        check_indices(first_index.data_type(), &indices)?;

        Ok(Self {
            vertices,
            indices,
            material,
            draw_mode,
            vertex_updates: Vec::new(),
            index_updates: Vec::new(),
        })
    }

    /// Wraps the mesh for sharing with a renderer.
    pub fn into_shared(self) -> MeshRef {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[Indices] {
        &self.indices
    }

    #[inline]
    pub fn material(&self) -> &MaterialRef {
        &self.material
    }

    pub fn set_material(&mut self, material: MaterialRef) {
        self.material = material;
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) {
        self.draw_mode = draw_mode;
    }

    /// Element type of the index buffer.
    #[inline]
    pub fn index_type(&self) -> DataType {
        self.indices[0].data_type()
    }

    /// Number of indices drawn.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len() * 3
    }

    /// Replaces every vertex. The new vertices must keep the current shape.
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) -> Result<()> {
        if vertices.is_empty() {
            return Err(Error::EmptyMesh);
        }
        check_vertices(&self.vertices[0], &vertices)?;

        self.vertex_updates.push(BufferUpdate::all(vertices.len()));
        self.vertices = vertices;
        Ok(())
    }

    /// Overwrites `vertices.len()` vertices starting at `offset`.
    pub fn update_vertices(&mut self, vertices: &[Vertex], offset: usize) -> Result<()> {
        check_range(offset, vertices.len(), self.vertices.len())?;
        check_vertices(&self.vertices[0], vertices)?;
        if vertices.is_empty() {
            return Ok(());
        }

        self.vertices[offset..offset + vertices.len()].clone_from_slice(vertices);
        self.vertex_updates.push(BufferUpdate::keep(offset, vertices.len()));
        Ok(())
    }

    /// Replaces every triangle. The index type may change, so a mesh can
    /// outgrow `u8` indices.
    pub fn set_indices(&mut self, indices: Vec<Indices>) -> Result<()> {
        let Some(first) = indices.first() else {
            return Err(Error::EmptyMesh);
        };
        check_index_type(first.data_type())?;
        check_indices(first.data_type(), &indices)?;

        self.index_updates.push(BufferUpdate::all(indices.len()));
        self.indices = indices;
        Ok(())
    }

    /// Overwrites `indices.len()` triangles starting at `offset`.
    pub fn update_indices(&mut self, indices: &[Indices], offset: usize) -> Result<()> {
        check_range(offset, indices.len(), self.indices.len())?;
        check_indices(self.index_type(), indices)?;
        if indices.is_empty() {
            return Ok(());
        }

        self.indices[offset..offset + indices.len()].clone_from_slice(indices);
        self.index_updates.push(BufferUpdate::keep(offset, indices.len()));
        Ok(())
    }

    #[inline]
    pub fn vertex_updates(&self) -> &[BufferUpdate] {
        &self.vertex_updates
    }

    #[inline]
    pub fn index_updates(&self) -> &[BufferUpdate] {
        &self.index_updates
    }

    /// Drains pending vertex updates in mutation order.
    pub fn take_vertex_updates(&mut self) -> Vec<BufferUpdate> {
        std::mem::take(&mut self.vertex_updates)
    }

    /// Drains pending index updates in mutation order.
    pub fn take_index_updates(&mut self) -> Vec<BufferUpdate> {
        std::mem::take(&mut self.index_updates)
    }

    pub fn clear_updates(&mut self) {
        self.vertex_updates.clear();
        self.index_updates.clear();
    }
}

fn check_vertices(shape: &Vertex, vertices: &[Vertex]) -> Result<()> {
    match vertices.iter().position(|v| !v.same_shape(shape)) {
        Some(i) => Err(Error::ShapeMismatch(format!(
            "vertex {i} does not share the mesh vertex layout"
        ))),
        None => Ok(()),
    }
}

fn check_index_type(ty: DataType) -> Result<()> {
    if ty.is_float() || ty.is_signed() {
        return Err(Error::ShapeMismatch(format!(
            "indices must be unsigned integers, got {ty:?}"
        )));
    }
    Ok(())
}

fn check_indices(ty: DataType, indices: &[Indices]) -> Result<()> {
    match indices.iter().position(|i| i.data_type() != ty) {
        Some(i) => Err(Error::ShapeMismatch(format!(
            "triangle {i} uses {:?} indices, expected {ty:?}",
            indices[i].data_type()
        ))),
        None => Ok(()),
    }
}

fn check_range(offset: usize, length: usize, len: usize) -> Result<()> {
    let end = offset.saturating_add(length);
    if end > len {
        return Err(Error::RangeOutOfBounds { offset, end, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::testing::{flat_material, triangle_vertex};
    use crate::math::{float2, int3, ubyte3, ushort3};

    fn quad() -> Mesh {
        Mesh::new(
            (0..4).map(|i| triangle_vertex(i as f32, 0.0)).collect(),
            vec![Indices::new(ubyte3(0, 1, 2)), Indices::new(ubyte3(0, 2, 3))],
            flat_material(),
            DrawMode::Triangles,
        )
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn rejects_empty_and_mixed_input() {
        let m = flat_material();
        assert!(matches!(
            Mesh::new(Vec::new(), vec![ubyte3(0, 1, 2).into()], m.clone(), DrawMode::Triangles),
            Err(Error::EmptyMesh)
        ));

        let mixed = vec![
            triangle_vertex(0.0, 0.0),
            Vertex::new(vec![float2(0.0, 0.0).into()]),
        ];
        assert!(matches!(
            Mesh::new(mixed, vec![ubyte3(0, 1, 0).into()], m.clone(), DrawMode::Triangles),
            Err(Error::ShapeMismatch(_))
        ));

        let signed = vec![Indices::new(int3(0, 0, 0))];
        assert!(Mesh::new(vec![triangle_vertex(0.0, 0.0)], signed, m, DrawMode::Triangles).is_err());
    }

    #[test]
    fn index_count_and_type() {
        let mesh = quad();
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_type(), DataType::U8);
        assert!(mesh.vertex_updates().is_empty());
    }

    // ── update queues ─────────────────────────────────────────────────────

    #[test]
    fn updates_queue_in_mutation_order() {
        let mut mesh = quad();

        mesh.update_vertices(&[triangle_vertex(5.0, 5.0)], 2).unwrap();
        mesh.set_vertices((0..6).map(|i| triangle_vertex(i as f32, 1.0)).collect()).unwrap();
        mesh.update_vertices(&[triangle_vertex(1.0, 1.0), triangle_vertex(2.0, 2.0)], 4).unwrap();

        let updates = mesh.take_vertex_updates();
        assert_eq!(
            updates,
            [
                BufferUpdate { mode: BufferUpdateMode::Keep, offset: 2, length: 1 },
                BufferUpdate { mode: BufferUpdateMode::All, offset: 0, length: 6 },
                BufferUpdate { mode: BufferUpdateMode::Keep, offset: 4, length: 2 },
            ]
        );
        assert!(mesh.take_vertex_updates().is_empty());
    }

    #[test]
    fn index_splice_is_a_keep_update() {
        let mut mesh = quad();
        mesh.update_indices(&[ubyte3(3, 2, 1).into()], 1).unwrap();

        assert_eq!(mesh.indices()[1].indices().x(), 3.0);
        assert_eq!(
            mesh.take_index_updates(),
            [BufferUpdate { mode: BufferUpdateMode::Keep, offset: 1, length: 1 }]
        );
    }

    #[test]
    fn full_index_replacement_can_widen() {
        let mut mesh = quad();
        mesh.set_indices(vec![ushort3(0, 1, 2).into(), ushort3(0, 2, 300).into()]).unwrap();

        assert_eq!(mesh.index_type(), DataType::U16);
        assert_eq!(
            mesh.take_index_updates(),
            [BufferUpdate { mode: BufferUpdateMode::All, offset: 0, length: 2 }]
        );
        assert!(mesh.update_indices(&[ubyte3(0, 1, 2).into()], 0).is_err());
    }

    #[test]
    fn invalid_updates_change_nothing() {
        let mut mesh = quad();

        let err = mesh.update_vertices(&[triangle_vertex(0.0, 0.0)], 4).unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds { offset: 4, end: 5, len: 4 }));

        let wrong = Vertex::new(vec![float2(0.0, 0.0).into()]);
        assert!(mesh.update_vertices(&[wrong], 0).is_err());
        assert!(mesh.update_indices(&[ushort3(0, 1, 2).into()], 0).is_err());
        assert!(mesh.set_indices(vec![ubyte3(0, 1, 2).into(), ushort3(0, 2, 3).into()]).is_err());
        assert!(mesh.set_indices(vec![int3(0, 1, 2).into()]).is_err());
        assert!(mesh.set_vertices(Vec::new()).is_err());

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.indices().len(), 2);
        assert!(mesh.vertex_updates().is_empty());
        assert!(mesh.index_updates().is_empty());
    }
}
