use std::marker::PhantomData;

use crate::data::{BufferTarget, BufferUsage, ByteSized, TypedData, pack_all};
use crate::device::GraphicsContext;

use super::buffer::GpuBuffer;
use super::indices::Indices;
use super::vertex::Vertex;

/// A fixed-size record stored back to back in a mesh buffer.
pub trait Record: ByteSized {
    const TARGET: BufferTarget;

    /// Every scalar of the record, in buffer order.
    fn scalars(&self) -> impl Iterator<Item = &TypedData>;
}

impl Record for Vertex {
    const TARGET: BufferTarget = BufferTarget::Array;

    fn scalars(&self) -> impl Iterator<Item = &TypedData> {
        self.vectors().iter().flat_map(|v| v.data())
    }
}

impl Record for Indices {
    const TARGET: BufferTarget = BufferTarget::Element;

    fn scalars(&self) -> impl Iterator<Item = &TypedData> {
        self.indices().data().iter()
    }
}

/// Serializes a run of same-sized records into one GPU buffer.
///
/// The records themselves are owned by the mesh and passed in on every call.
#[derive(Debug)]
pub struct MeshBuffer<R: Record> {
    buffer: GpuBuffer,
    _records: PhantomData<fn(&R)>,
}

pub type VertexBuffer = MeshBuffer<Vertex>;
pub type IndicesBuffer = MeshBuffer<Indices>;

impl<R: Record> MeshBuffer<R> {
    /// Creates the buffer and uploads `records`.
    pub fn new<C: GraphicsContext + ?Sized>(ctx: &mut C, records: &[R], usage: BufferUsage) -> Self {
        let mut buffer = GpuBuffer::new(R::TARGET, usage);
        buffer.init(ctx, &Self::inline_data(records));
        Self {
            buffer,
            _records: PhantomData,
        }
    }

    /// All records packed in order. The length is `records[0].size() * records.len()`.
    pub fn inline_data(records: &[R]) -> Vec<u8> {
        let record_size = records.first().map_or(0, ByteSized::size);
        let mut bytes = vec![0u8; record_size * records.len()];
        pack_all(0, records.iter().flat_map(|r| r.scalars()), &mut bytes);
        bytes
    }

    #[inline]
    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    /// Re-uploads every record. A change in total size re-creates the buffer.
    pub fn update_all<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, records: &[R]) {
        let bytes = Self::inline_data(records);
        if bytes.len() != self.buffer.size() {
            log::debug!(
                "{:?} buffer resized {} -> {} bytes",
                R::TARGET,
                self.buffer.size(),
                bytes.len()
            );
            self.buffer.init(ctx, &bytes);
        } else {
            self.buffer.update(ctx, 0, &bytes);
        }
    }

    /// Re-uploads records `index..index + length`.
    pub fn update_range<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        records: &[R],
        index: usize,
        length: usize,
    ) {
        let Some(range) = records.get(index..index.saturating_add(length)) else {
            log::warn!(
                "skipping {:?} update: records {}..{} out of {}",
                R::TARGET,
                index,
                index.saturating_add(length),
                records.len()
            );
            return;
        };
        let Some(first) = range.first() else { return };

        let record_size = first.size();
        let mut scratch = vec![0u8; record_size * length];
        pack_all(0, range.iter().flat_map(|r| r.scalars()), &mut scratch);

        self.buffer.update(ctx, record_size * index, &scratch);
    }

    /// Applies each `(index, length)` range in order.
    pub fn update_ranges<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        records: &[R],
        ranges: &[(usize, usize)],
    ) {
        for &(index, length) in ranges {
            self.update_range(ctx, records, index, length);
        }
    }

    pub fn bind<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) {
        self.buffer.bind(ctx);
    }

    pub fn delete<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) {
        self.buffer.delete(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pack_typed_data;
    use crate::device::HeadlessContext;
    use crate::math::{float2, float4, ubyte3, ushort3};

    fn vertex(x: f32, y: f32, r: f32) -> Vertex {
        Vertex::new(vec![float2(x, y).into(), float4(r, 0.0, 0.0, 1.0).into()])
    }

    fn hand_pack(values: &[f32]) -> Vec<u8> {
        let mut out = vec![0u8; values.len() * 4];
        for (i, v) in values.iter().enumerate() {
            pack_typed_data(i * 4, &TypedData::f32(*v), &mut out);
        }
        out
    }

    // ── inline_data ───────────────────────────────────────────────────────

    #[test]
    fn inline_matches_hand_packing() {
        let records = [vertex(1.0, 2.0, 0.5), vertex(3.0, 4.0, 0.25)];
        let expected = hand_pack(&[1.0, 2.0, 0.5, 0.0, 0.0, 1.0, 3.0, 4.0, 0.25, 0.0, 0.0, 1.0]);
        assert_eq!(VertexBuffer::inline_data(&records), expected);
    }

    #[test]
    fn indices_pack_at_their_width() {
        let records = [Indices::new(ushort3(1, 2, 3)), Indices::new(ushort3(4, 5, 6))];
        let bytes = IndicesBuffer::inline_data(&records);
        assert_eq!(bytes, [1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0]);
    }

    // ── updates ───────────────────────────────────────────────────────────

    #[test]
    fn single_record_update() {
        let mut ctx = HeadlessContext::new();
        let mut records = vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 1.0, 0.0), vertex(2.0, 2.0, 0.0)];
        let mut vb = VertexBuffer::new(&mut ctx, &records, BufferUsage::Dynamic);

        records[1] = vertex(9.0, 8.0, 7.0);
        vb.update_range(&mut ctx, &records, 1, 1);

        let id = vb.buffer().id().unwrap();
        assert_eq!(ctx.buffer_data(id).unwrap(), VertexBuffer::inline_data(&records).as_slice());
    }

    #[test]
    fn multi_record_update() {
        let mut ctx = HeadlessContext::new();
        let mut records: Vec<_> = (0..5).map(|i| vertex(i as f32, 0.0, 0.0)).collect();
        let mut vb = VertexBuffer::new(&mut ctx, &records, BufferUsage::Dynamic);

        records[2] = vertex(20.0, 0.0, 1.0);
        records[3] = vertex(30.0, 0.0, 1.0);
        vb.update_range(&mut ctx, &records, 2, 2);

        let id = vb.buffer().id().unwrap();
        assert_eq!(ctx.buffer_data(id).unwrap(), VertexBuffer::inline_data(&records).as_slice());
    }

    #[test]
    fn out_of_range_update_is_skipped() {
        let mut ctx = HeadlessContext::new();
        let records = vec![Indices::new(ubyte3(0, 1, 2))];
        let mut ib = IndicesBuffer::new(&mut ctx, &records, BufferUsage::Static);
        let before = ctx.buffer_data(ib.buffer().id().unwrap()).unwrap().to_vec();

        ib.update_range(&mut ctx, &records, 1, 1);
        ib.update_ranges(&mut ctx, &records, &[(0, 2)]);
        assert_eq!(ctx.buffer_data(ib.buffer().id().unwrap()).unwrap(), before.as_slice());
    }

    #[test]
    fn update_all_resizes() {
        let mut ctx = HeadlessContext::new();
        let mut records = vec![Indices::new(ubyte3(0, 1, 2))];
        let mut ib = IndicesBuffer::new(&mut ctx, &records, BufferUsage::Static);
        assert_eq!(ib.buffer().size(), 3);

        records.push(Indices::new(ubyte3(0, 2, 3)));
        ib.update_all(&mut ctx, &records);
        assert_eq!(ib.buffer().size(), 6);
        assert_eq!(ctx.buffer_data(ib.buffer().id().unwrap()).unwrap(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(ctx.live_buffer_count(), 1);
    }

    #[test]
    fn empty_records_allocate_nothing() {
        assert!(IndicesBuffer::inline_data(&[]).is_empty());
    }
}
