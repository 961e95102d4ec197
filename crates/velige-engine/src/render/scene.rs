use std::rc::Rc;

use crate::data::BufferUsage;
use crate::device::GraphicsContext;
use crate::error::Result;
use crate::graphics::{
    BufferUpdate, BufferUpdateMode, IndicesBuffer, MeshRef, Record, MeshBuffer, VertexAttribute,
    VertexBuffer,
};
use crate::math::{Vector4, float4};

/// GPU-side state of one mesh in the scene.
#[derive(Debug)]
struct MeshRenderData {
    vertex_buffer: VertexBuffer,
    index_buffer: IndicesBuffer,
    attributes: Vec<VertexAttribute>,
}

/// Draws a list of meshes, one indexed draw call each, in insertion order.
///
/// Meshes are identified by pointer: adding the same [`MeshRef`] twice is a
/// no-op, while two meshes with equal contents are distinct.
#[derive(Debug)]
pub struct SceneRenderer {
    meshes: Vec<MeshRef>,
    render_data: Vec<MeshRenderData>,
    clear_color: Vector4,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            render_data: Vec::new(),
            clear_color: float4(0.1, 0.1, 0.1, 1.0),
        }
    }

    pub fn clear_color(&self) -> &Vector4 {
        &self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Vector4) {
        self.clear_color = color;
    }

    pub fn meshes(&self) -> &[MeshRef] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn contains(&self, mesh: &MeshRef) -> bool {
        self.position(mesh).is_some()
    }

    fn position(&self, mesh: &MeshRef) -> Option<usize> {
        self.meshes.iter().position(|m| Rc::ptr_eq(m, mesh))
    }

    /// Uploads `mesh` and appends it to the scene.
    ///
    /// Returns `Ok(false)` (with a warning) if the mesh is already present.
    /// Updates queued on the mesh before this call are discarded since the
    /// new buffers hold its current contents.
    pub fn add_mesh<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, mesh: &MeshRef) -> Result<bool> {
        if self.contains(mesh) {
            log::warn!("cannot add mesh: it is already in the scene");
            return Ok(false);
        }

        let mut m = mesh.borrow_mut();
        m.material().borrow().shader().compile_and_link(ctx)?;

        let mut index_buffer = IndicesBuffer::new(ctx, m.indices(), BufferUsage::Static);
        let mut vertex_buffer = VertexBuffer::new(ctx, m.vertices(), BufferUsage::Dynamic);
        let attributes = m.vertices()[0].attributes();

        if let Err(e) = enable_attributes(ctx, &vertex_buffer, &attributes) {
            vertex_buffer.delete(ctx);
            index_buffer.delete(ctx);
            return Err(e);
        }
        m.clear_updates();

        log::debug!(
            "mesh added: {} vertices, {} triangles",
            m.vertices().len(),
            m.indices().len()
        );

        drop(m);
        self.meshes.push(Rc::clone(mesh));
        self.render_data.push(MeshRenderData {
            vertex_buffer,
            index_buffer,
            attributes,
        });
        Ok(true)
    }

    /// Removes `mesh` and releases its buffers.
    ///
    /// Returns `false` (with a warning) if the mesh is not in the scene.
    pub fn remove_mesh<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, mesh: &MeshRef) -> bool {
        let Some(index) = self.position(mesh) else {
            log::warn!("cannot remove mesh: it is not in the scene");
            return false;
        };

        let mut data = self.render_data.remove(index);
        data.vertex_buffer.delete(ctx);
        data.index_buffer.delete(ctx);
        self.meshes.remove(index);

        log::debug!("mesh removed; {} left", self.meshes.len());
        true
    }

    /// Clears, replays pending mesh updates, draws every mesh and flushes.
    ///
    /// A mesh that fails to draw is logged and skipped. The frame is still
    /// flushed and the first failure is returned.
    pub fn render<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) -> Result<()> {
        let [r, g, b, a] = [0, 1, 2, 3].map(|i| self.clear_color.get(i).unwrap_or(0.0) as f32);
        ctx.clear([r, g, b, a]);

        let mut first_error = None;
        for (i, (mesh, data)) in self.meshes.iter().zip(&mut self.render_data).enumerate() {
            if let Err(e) = draw_mesh(ctx, mesh, data) {
                log::warn!("mesh {i} not drawn: {e}");
                first_error.get_or_insert(e);
            }
        }

        ctx.flush();
        first_error.map_or(Ok(()), Err)
    }
}

fn draw_mesh<C: GraphicsContext + ?Sized>(
    ctx: &mut C,
    mesh: &MeshRef,
    data: &mut MeshRenderData,
) -> Result<()> {
    let mut m = mesh.borrow_mut();

    let vertex_updates = m.take_vertex_updates();
    replay(ctx, &mut data.vertex_buffer, m.vertices(), &vertex_updates);
    let index_updates = m.take_index_updates();
    replay(ctx, &mut data.index_buffer, m.indices(), &index_updates);

    enable_attributes(ctx, &data.vertex_buffer, &data.attributes)?;

    let material = Rc::clone(m.material());
    let mut material = material.borrow_mut();
    material.shader().compile_and_link(ctx)?;
    material.bind(ctx);

    data.index_buffer.bind(ctx);
    ctx.draw_elements(m.draw_mode(), m.index_count(), m.index_type(), 0)?;
    Ok(())
}

/// Makes `attributes` the only enabled attributes, read from `vertex_buffer`.
fn enable_attributes<C: GraphicsContext + ?Sized>(
    ctx: &mut C,
    vertex_buffer: &VertexBuffer,
    attributes: &[VertexAttribute],
) -> Result<()> {
    ctx.disable_vertex_attributes();
    vertex_buffer.bind(ctx);
    for attribute in attributes {
        ctx.enable_vertex_attribute(attribute)?;
    }
    Ok(())
}

fn replay<C: GraphicsContext + ?Sized, R: Record>(
    ctx: &mut C,
    buffer: &mut MeshBuffer<R>,
    records: &[R],
    updates: &[BufferUpdate],
) {
    for update in updates {
        match update.mode {
            BufferUpdateMode::None => continue,
            BufferUpdateMode::All => buffer.update_all(ctx, records),
            BufferUpdateMode::Keep => buffer.update_range(ctx, records, update.offset, update.length),
        }
    }
}
