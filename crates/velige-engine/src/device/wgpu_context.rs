//! [`GraphicsContext`] on top of wgpu.
//!
//! Buffers keep a CPU shadow copy; writes mark a dirty range that is
//! uploaded on [`GraphicsContext::flush`]. Draw calls are recorded with the
//! state bound at call time and replayed into a single render pass on flush.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use crate::data::{BufferTarget, BufferUsage, DataType};
use crate::graphics::{
    DrawMode, FRAGMENT_ENTRY, Shader, UniformDecl, UniformValue, VERTEX_ENTRY, VertexAttribute,
};

use super::context::{BufferId, ContextError, GraphicsContext, ProgramId, UniformLocation};

const ALIGN: usize = wgpu::COPY_BUFFER_ALIGNMENT as usize;

#[inline]
fn align_up(n: usize, to: usize) -> usize {
    n.div_ceil(to) * to
}

struct WgpuBuffer {
    target: BufferTarget,
    /// Logical length; `shadow` is padded up to the copy alignment.
    len: usize,
    shadow: Vec<u8>,
    dirty: Option<Range<usize>>,
    gpu: Option<wgpu::Buffer>,
    /// The GPU copy holds u8 indices widened to u16.
    widened: bool,
}

impl WgpuBuffer {
    fn new(target: BufferTarget, data: &[u8]) -> Self {
        let mut shadow = vec![0u8; align_up(data.len().max(1), ALIGN)];
        shadow[..data.len()].copy_from_slice(data);
        Self {
            target,
            len: data.len(),
            dirty: Some(0..shadow.len()),
            shadow,
            gpu: None,
            widened: false,
        }
    }

    fn mark_dirty(&mut self, range: Range<usize>) {
        self.dirty = Some(match self.dirty.take() {
            Some(d) => d.start.min(range.start)..d.end.max(range.end),
            None => range,
        });
    }

    fn usage(&self) -> wgpu::BufferUsages {
        let kind = match self.target {
            BufferTarget::Array => wgpu::BufferUsages::VERTEX,
            BufferTarget::Element => wgpu::BufferUsages::INDEX,
        };
        kind | wgpu::BufferUsages::COPY_DST
    }

    /// Brings the GPU copy up to date.
    fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, widen: bool) {
        if widen {
            if self.gpu.is_some() && self.widened && self.dirty.is_none() {
                return;
            }
            let mut wide: Vec<u16> = self.shadow[..self.len].iter().map(|&b| u16::from(b)).collect();
            wide.resize(align_up(wide.len().max(1), ALIGN / 2), 0);
            self.upload_all(device, queue, bytemuck::cast_slice(&wide));
            self.widened = true;
            self.dirty = None;
            return;
        }

        let stale = self
            .gpu
            .as_ref()
            .is_none_or(|b| self.widened || b.size() != self.shadow.len() as u64);
        if stale {
            let shadow = std::mem::take(&mut self.shadow);
            self.upload_all(device, queue, &shadow);
            self.shadow = shadow;
            self.widened = false;
            self.dirty = None;
            return;
        }

        if let (Some(range), Some(gpu)) = (self.dirty.take(), &self.gpu) {
            let start = range.start / ALIGN * ALIGN;
            let end = align_up(range.end, ALIGN).min(self.shadow.len());
            queue.write_buffer(gpu, start as u64, &self.shadow[start..end]);
        }
    }

    fn upload_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let reuse = self.gpu.as_ref().is_some_and(|b| b.size() == bytes.len() as u64);
        if !reuse {
            self.gpu = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("velige mesh buffer"),
                size: bytes.len() as u64,
                usage: self.usage(),
                mapped_at_creation: false,
            }));
        }
        if let Some(gpu) = &self.gpu {
            queue.write_buffer(gpu, 0, bytes);
        }
    }
}

struct WgpuProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    uniforms: Vec<UniformDecl>,
    block: Option<UniformBlock>,
}

/// The program's uniform block.
///
/// Every draw sees the values set before it: each draw that follows a
/// change appends a copy of the block to `snapshots`, and the draw binds
/// its copy through a dynamic offset.
struct UniformBlock {
    layout: wgpu::BindGroupLayout,
    /// Block size rounded up to 16 bytes.
    size: u64,
    /// Distance between snapshots; a multiple of the device's offset alignment.
    stride: u64,
    shadow: Vec<u8>,
    /// `shadow` changed since the last snapshot.
    dirty: bool,
    snapshots: Vec<u8>,
    gpu: Option<(wgpu::Buffer, wgpu::BindGroup)>,
}

impl UniformBlock {
    /// Byte offset of the snapshot holding the current values.
    fn snapshot(&mut self) -> u32 {
        if self.dirty || self.snapshots.is_empty() {
            let at = self.snapshots.len();
            self.snapshots.extend_from_slice(&self.shadow);
            self.snapshots.resize(at + self.stride as usize, 0);
            self.dirty = false;
        }
        (self.snapshots.len() as u64 - self.stride) as u32
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.snapshots.is_empty() {
            return;
        }
        let needed = self.snapshots.len() as u64;
        if self.gpu.as_ref().is_none_or(|(b, _)| b.size() < needed) {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("velige uniforms ubo"),
                size: needed.next_power_of_two(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("velige uniforms bind group"),
                layout: &self.layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(self.size),
                    }),
                }],
            });
            self.gpu = Some((buffer, bind_group));
        }
        if let Some((buffer, _)) = &self.gpu {
            queue.write_buffer(buffer, 0, &self.snapshots);
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct BufferLayoutKey {
    stride: u64,
    attributes: Vec<(wgpu::VertexFormat, u64, u32)>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    program: ProgramId,
    buffers: Vec<BufferLayoutKey>,
    topology: wgpu::PrimitiveTopology,
    strip_index_format: Option<wgpu::IndexFormat>,
}

struct RecordedDraw {
    pipeline: PipelineKey,
    program: ProgramId,
    uniform_offset: Option<u32>,
    vertex_buffers: Vec<BufferId>,
    index_buffer: BufferId,
    index_format: wgpu::IndexFormat,
    widen: bool,
    indices: Range<u32>,
}

/// A wgpu-backed context drawing into one color target per flush.
///
/// Call [`WgpuContext::set_target`] with the frame's view before flushing.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    target: Option<wgpu::TextureView>,

    next_id: u64,
    buffers: HashMap<BufferId, WgpuBuffer>,
    programs: HashMap<ProgramId, WgpuProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    bound: HashMap<BufferTarget, BufferId>,
    attributes: BTreeMap<u32, (VertexAttribute, BufferId)>,
    current_program: Option<ProgramId>,

    clear: Option<wgpu::Color>,
    draws: Vec<RecordedDraw>,
    warned_topology: bool,
}

impl WgpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            format,
            target: None,
            next_id: 0,
            buffers: HashMap::new(),
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            bound: HashMap::new(),
            attributes: BTreeMap::new(),
            current_program: None,
            clear: None,
            draws: Vec::new(),
            warned_topology: false,
        }
    }

    /// Color attachment for the next flush.
    pub fn set_target(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    /// Target texture format. Changing it drops every cached pipeline.
    pub fn set_format(&mut self, format: wgpu::TextureFormat) {
        if format != self.format {
            self.format = format;
            self.pipelines.clear();
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn topology(&mut self, mode: DrawMode) -> (wgpu::PrimitiveTopology, bool) {
        use wgpu::PrimitiveTopology as T;
        let (topology, approximated) = match mode {
            DrawMode::Triangles => (T::TriangleList, false),
            DrawMode::TriangleStrip => (T::TriangleStrip, false),
            DrawMode::Lines => (T::LineList, false),
            DrawMode::LineStrip => (T::LineStrip, false),
            DrawMode::TriangleFan => (T::TriangleList, true),
            DrawMode::LineLoop => (T::LineStrip, true),
        };
        if approximated && !self.warned_topology {
            log::warn!("{mode:?} is not supported by wgpu; drawing as {topology:?}");
            self.warned_topology = true;
        }
        (topology, topology.is_strip())
    }

    fn buffer_layouts(&self) -> Result<(Vec<BufferLayoutKey>, Vec<BufferId>), ContextError> {
        let mut keys: Vec<BufferLayoutKey> = Vec::new();
        let mut ids: Vec<BufferId> = Vec::new();

        for (attr, buffer) in self.attributes.values() {
            let format = vertex_format(attr)?;
            let slot = match ids.iter().position(|id| id == buffer) {
                Some(slot) => slot,
                None => {
                    ids.push(*buffer);
                    keys.push(BufferLayoutKey {
                        stride: attr.stride as u64,
                        attributes: Vec::new(),
                    });
                    ids.len() - 1
                }
            };
            if keys[slot].stride != attr.stride as u64 {
                return Err(ContextError::Unsupported(
                    "attributes of one buffer with different strides".into(),
                ));
            }
            keys[slot].attributes.push((format, attr.offset as u64, attr.index));
        }

        Ok((keys, ids))
    }

    fn ensure_pipeline(&mut self, key: &PipelineKey) -> Result<(), ContextError> {
        if self.pipelines.contains_key(key) {
            return Ok(());
        }
        let program = self
            .programs
            .get(&key.program)
            .ok_or(ContextError::NoProgram)?;

        let attributes: Vec<Vec<wgpu::VertexAttribute>> = key
            .buffers
            .iter()
            .map(|b| {
                b.attributes
                    .iter()
                    .map(|&(format, offset, shader_location)| wgpu::VertexAttribute {
                        format,
                        offset,
                        shader_location,
                    })
                    .collect()
            })
            .collect();
        let layouts: Vec<wgpu::VertexBufferLayout<'_>> = key
            .buffers
            .iter()
            .zip(&attributes)
            .map(|(b, attrs)| wgpu::VertexBufferLayout {
                array_stride: b.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("velige mesh pipeline"),
            layout: Some(&program.layout),
            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: key.strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created pipeline for {:?} ({:?})", key.program, key.topology);
        self.pipelines.insert(key.clone(), pipeline);
        Ok(())
    }

    fn upload(&mut self) {
        let mut widen: HashMap<BufferId, bool> = HashMap::new();
        for draw in &self.draws {
            for id in &draw.vertex_buffers {
                widen.insert(*id, false);
            }
            widen.insert(draw.index_buffer, draw.widen);
        }

        for (id, widen) in widen {
            if let Some(buffer) = self.buffers.get_mut(&id) {
                buffer.sync(&self.device, &self.queue, widen);
            }
        }

        for block in self.programs.values_mut().filter_map(|p| p.block.as_mut()) {
            block.upload(&self.device, &self.queue);
        }
    }

    fn end_frame(&mut self) {
        self.draws.clear();
        self.clear = None;
        for block in self.programs.values_mut().filter_map(|p| p.block.as_mut()) {
            block.snapshots.clear();
        }
    }

    fn encode(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let load = match self.clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("velige scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for draw in &self.draws {
            let Some(pipeline) = self.pipelines.get(&draw.pipeline) else { continue };
            let Some(index) = self.buffers.get(&draw.index_buffer).and_then(|b| b.gpu.as_ref()) else {
                continue;
            };

            rpass.set_pipeline(pipeline);
            let block = self.programs.get(&draw.program).and_then(|p| p.block.as_ref());
            if let (Some((_, bind_group)), Some(offset)) =
                (block.and_then(|b| b.gpu.as_ref()), draw.uniform_offset)
            {
                rpass.set_bind_group(0, bind_group, &[offset]);
            }
            for (slot, id) in draw.vertex_buffers.iter().enumerate() {
                if let Some(gpu) = self.buffers.get(id).and_then(|b| b.gpu.as_ref()) {
                    rpass.set_vertex_buffer(slot as u32, gpu.slice(..));
                }
            }
            rpass.set_index_buffer(index.slice(..), draw.index_format);
            rpass.draw_indexed(draw.indices.clone(), 0, 0..1);
        }
    }
}

impl GraphicsContext for WgpuContext {
    fn create_buffer(&mut self, target: BufferTarget, _usage: BufferUsage, data: &[u8]) -> Option<BufferId> {
        let id = BufferId(self.next_id());
        self.buffers.insert(id, WgpuBuffer::new(target, data));
        Some(id)
    }

    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        let Some(b) = self.buffers.get_mut(&buffer) else {
            log::warn!("write to unknown buffer {buffer:?} ignored");
            return;
        };
        let end = offset + data.len();
        if end > b.len {
            log::warn!("write of {} bytes at {offset} overflows buffer {buffer:?}", data.len());
            return;
        }
        b.shadow[offset..end].copy_from_slice(data);
        b.mark_dirty(offset..end);
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match buffer {
            Some(id) if self.buffers.contains_key(&id) => {
                self.bound.insert(target, id);
            }
            Some(id) => log::warn!("bind of unknown buffer {id:?} ignored"),
            None => {
                self.bound.remove(&target);
            }
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(b) = self.buffers.remove(&buffer) {
            if let Some(gpu) = b.gpu {
                gpu.destroy();
            }
            self.bound.retain(|_, id| *id != buffer);
            self.attributes.retain(|_, (_, id)| *id != buffer);
        }
    }

    fn create_program(&mut self, shader: &Shader) -> Result<ProgramId, ContextError> {
        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("velige vertex shader"),
            source: wgpu::ShaderSource::Wgsl(shader.vertex_source().into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("velige fragment shader"),
            source: wgpu::ShaderSource::Wgsl(shader.fragment_source().into()),
        });

        let block_size = shader.uniform_block_size() as u64;
        let block = wgpu::BufferSize::new(block_size).map(|min_binding_size| {
            let layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("velige uniforms bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(min_binding_size),
                    },
                    count: None,
                }],
            });
            let size = align_up(block_size as usize, 16) as u64;
            let alignment = u64::from(self.device.limits().min_uniform_buffer_offset_alignment);
            UniformBlock {
                layout,
                size,
                stride: align_up(size as usize, alignment as usize) as u64,
                shadow: vec![0u8; size as usize],
                dirty: true,
                snapshots: Vec::new(),
                gpu: None,
            }
        });

        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("velige pipeline layout"),
            bind_group_layouts: &block.as_ref().map(|b| vec![&b.layout]).unwrap_or_default(),
            immediate_size: 0,
        });

        let id = ProgramId(self.next_id());
        self.programs.insert(
            id,
            WgpuProgram {
                vertex,
                fragment,
                layout,
                uniforms: shader.uniforms().to_vec(),
                block,
            },
        );
        log::debug!("created program {id:?}");
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(p) = self.programs.remove(&program) {
            if let Some((buffer, _)) = p.block.and_then(|b| b.gpu) {
                buffer.destroy();
            }
            self.pipelines.retain(|key, _| key.program != program);
            if self.current_program == Some(program) {
                self.current_program = None;
            }
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        if self.programs.contains_key(&program) {
            self.current_program = Some(program);
        } else {
            log::warn!("use of unknown program {program:?} ignored");
        }
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let decl = self.programs.get(&program)?.uniforms.iter().find(|d| d.name == name)?;
        Some(UniformLocation {
            program,
            offset: decl.offset,
            kind: decl.kind,
        })
    }

    fn set_uniform(&mut self, location: &UniformLocation, value: &UniformValue) {
        let Some(block) = self
            .programs
            .get_mut(&location.program)
            .and_then(|p| p.block.as_mut())
        else {
            log::warn!("uniform upload to {:?} ignored: no uniform block", location.program);
            return;
        };
        value.write_block(location.kind, &mut block.shadow, location.offset as usize);
        block.dirty = true;
    }

    fn enable_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), ContextError> {
        vertex_format(attribute)?;
        let buffer = *self
            .bound
            .get(&BufferTarget::Array)
            .ok_or(ContextError::NoBuffer(BufferTarget::Array))?;
        self.attributes.insert(attribute.index, (*attribute, buffer));
        Ok(())
    }

    fn disable_vertex_attributes(&mut self) {
        self.attributes.clear();
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color.map(f64::from);
        self.clear = Some(wgpu::Color { r, g, b, a });
    }

    fn draw_elements(
        &mut self,
        mode: DrawMode,
        count: usize,
        index_type: DataType,
        offset: usize,
    ) -> Result<(), ContextError> {
        let (index_format, widen) = match index_type {
            DataType::U8 => (wgpu::IndexFormat::Uint16, true),
            DataType::U16 => (wgpu::IndexFormat::Uint16, false),
            DataType::U32 => (wgpu::IndexFormat::Uint32, false),
            other => return Err(ContextError::Unsupported(format!("{other:?} indices"))),
        };
        if offset % index_type.size() != 0 {
            return Err(ContextError::Unsupported(format!(
                "index offset {offset} is not a multiple of {}",
                index_type.size()
            )));
        }

        let program = self.current_program.ok_or(ContextError::NoProgram)?;
        let index_buffer = *self
            .bound
            .get(&BufferTarget::Element)
            .ok_or(ContextError::NoBuffer(BufferTarget::Element))?;

        let (topology, strip) = self.topology(mode);
        let (buffers, vertex_buffers) = self.buffer_layouts()?;
        let pipeline = PipelineKey {
            program,
            buffers,
            topology,
            strip_index_format: strip.then_some(index_format),
        };
        self.ensure_pipeline(&pipeline)?;

        let uniform_offset = self
            .programs
            .get_mut(&program)
            .and_then(|p| p.block.as_mut())
            .map(UniformBlock::snapshot);

        let first = (offset / index_type.size()) as u32;
        self.draws.push(RecordedDraw {
            pipeline,
            program,
            uniform_offset,
            vertex_buffers,
            index_buffer,
            index_format,
            widen,
            indices: first..first + count as u32,
        });
        Ok(())
    }

    fn flush(&mut self) {
        let Some(view) = self.target.take() else {
            if !self.draws.is_empty() {
                log::warn!("no render target set; dropping {} draw(s)", self.draws.len());
            }
            self.end_frame();
            return;
        };

        self.upload();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("velige scene encoder"),
            });
        self.encode(&mut encoder, &view);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.end_frame();
    }
}

fn vertex_format(attr: &VertexAttribute) -> Result<wgpu::VertexFormat, ContextError> {
    use wgpu::VertexFormat as F;

    let format = match (attr.data_type, attr.normalized, attr.component_count) {
        (DataType::F32, false, 1) => F::Float32,
        (DataType::F32, false, 2) => F::Float32x2,
        (DataType::F32, false, 3) => F::Float32x3,
        (DataType::F32, false, 4) => F::Float32x4,

        (DataType::U32, false, 1) => F::Uint32,
        (DataType::U32, false, 2) => F::Uint32x2,
        (DataType::U32, false, 3) => F::Uint32x3,
        (DataType::U32, false, 4) => F::Uint32x4,
        (DataType::I32, false, 1) => F::Sint32,
        (DataType::I32, false, 2) => F::Sint32x2,
        (DataType::I32, false, 3) => F::Sint32x3,
        (DataType::I32, false, 4) => F::Sint32x4,

        (DataType::U16, false, 1) => F::Uint16,
        (DataType::U16, false, 2) => F::Uint16x2,
        (DataType::U16, false, 4) => F::Uint16x4,
        (DataType::U16, true, 1) => F::Unorm16,
        (DataType::U16, true, 2) => F::Unorm16x2,
        (DataType::U16, true, 4) => F::Unorm16x4,
        (DataType::I16, false, 1) => F::Sint16,
        (DataType::I16, false, 2) => F::Sint16x2,
        (DataType::I16, false, 4) => F::Sint16x4,
        (DataType::I16, true, 1) => F::Snorm16,
        (DataType::I16, true, 2) => F::Snorm16x2,
        (DataType::I16, true, 4) => F::Snorm16x4,

        (DataType::U8, false, 1) => F::Uint8,
        (DataType::U8, false, 2) => F::Uint8x2,
        (DataType::U8, false, 4) => F::Uint8x4,
        (DataType::U8, true, 1) => F::Unorm8,
        (DataType::U8, true, 2) => F::Unorm8x2,
        (DataType::U8, true, 4) => F::Unorm8x4,
        (DataType::I8, false, 1) => F::Sint8,
        (DataType::I8, false, 2) => F::Sint8x2,
        (DataType::I8, false, 4) => F::Sint8x4,
        (DataType::I8, true, 1) => F::Snorm8,
        (DataType::I8, true, 2) => F::Snorm8x2,
        (DataType::I8, true, 4) => F::Snorm8x4,

        (ty, normalized, n) => {
            return Err(ContextError::Unsupported(format!(
                "vertex attribute of {n} {}{ty:?} components",
                if normalized { "normalized " } else { "" }
            )));
        }
    };
    Ok(format)
}
