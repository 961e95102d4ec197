//! In-memory graphics context.
//!
//! Stores buffer contents and uniform values on the CPU and records every
//! call, so scene code can run and be inspected without a GPU.

use std::collections::{BTreeMap, HashMap};

use crate::data::{BufferTarget, BufferUsage, DataType};
use crate::graphics::{DrawMode, Shader, UniformDecl, UniformValue, VertexAttribute};

use super::context::{BufferId, ContextError, GraphicsContext, ProgramId, UniformLocation};

/// One recorded context call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer { buffer: BufferId, target: BufferTarget, len: usize },
    WriteBuffer { buffer: BufferId, offset: usize, len: usize },
    BindBuffer { target: BufferTarget, buffer: Option<BufferId> },
    DeleteBuffer(BufferId),
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform { program: ProgramId, offset: u32 },
    EnableAttribute(VertexAttribute),
    DisableAttributes,
    Clear([f32; 4]),
    Draw(DrawCall),
    Flush,
}

/// State captured by a `draw_elements` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mode: DrawMode,
    pub count: usize,
    pub index_type: DataType,
    pub offset: usize,
    pub program: ProgramId,
    pub index_buffer: BufferId,
    /// Enabled attributes and the buffer each reads from, by location.
    pub attributes: Vec<(VertexAttribute, BufferId)>,
}

#[derive(Debug)]
struct HeadlessBuffer {
    target: BufferTarget,
    usage: BufferUsage,
    data: Vec<u8>,
}

#[derive(Debug)]
struct HeadlessProgram {
    uniforms: Vec<UniformDecl>,
    values: HashMap<u32, UniformValue>,
}

#[derive(Debug, Default)]
pub struct HeadlessContext {
    next_id: u64,
    buffers: HashMap<BufferId, HeadlessBuffer>,
    programs: HashMap<ProgramId, HeadlessProgram>,
    bound: HashMap<BufferTarget, BufferId>,
    attributes: BTreeMap<u32, (VertexAttribute, BufferId)>,
    current_program: Option<ProgramId>,
    commands: Vec<Command>,
    uniform_uploads: usize,
    buffer_limit: Option<usize>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Caps the number of live buffers. Creation past the cap fails, the
    /// way it does when a real device runs out of memory.
    pub fn set_buffer_limit(&mut self, limit: Option<usize>) {
        self.buffer_limit = limit;
    }

    /// Current contents of a live buffer.
    pub fn buffer_data(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.data.as_slice())
    }

    pub fn buffer_target(&self, buffer: BufferId) -> Option<BufferTarget> {
        self.buffers.get(&buffer).map(|b| b.target)
    }

    pub fn buffer_usage(&self, buffer: BufferId) -> Option<BufferUsage> {
        self.buffers.get(&buffer).map(|b| b.usage)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        self.bound.get(&target).copied()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Last value uploaded for uniform `name` of `program`.
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<&UniformValue> {
        let p = self.programs.get(&program)?;
        let decl = p.uniforms.iter().find(|d| d.name == name)?;
        p.values.get(&decl.offset)
    }

    /// Number of `set_uniform` calls that reached a live program.
    pub fn uniform_upload_count(&self) -> usize {
        self.uniform_uploads
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(d) => Some(d),
            _ => None,
        })
    }
}

impl GraphicsContext for HeadlessContext {
    fn create_buffer(&mut self, target: BufferTarget, usage: BufferUsage, data: &[u8]) -> Option<BufferId> {
        if self.buffer_limit.is_some_and(|limit| self.buffers.len() >= limit) {
            return None;
        }
        let buffer = BufferId(self.next_id());
        self.buffers.insert(
            buffer,
            HeadlessBuffer {
                target,
                usage,
                data: data.to_vec(),
            },
        );
        self.commands.push(Command::CreateBuffer {
            buffer,
            target,
            len: data.len(),
        });
        Some(buffer)
    }

    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        let Some(b) = self.buffers.get_mut(&buffer) else {
            log::warn!("write to unknown buffer {buffer:?} ignored");
            return;
        };
        let Some(dst) = b.data.get_mut(offset..offset + data.len()) else {
            log::warn!(
                "write of {} bytes at {offset} overflows buffer {buffer:?} ({} bytes)",
                data.len(),
                b.data.len()
            );
            return;
        };
        dst.copy_from_slice(data);
        self.commands.push(Command::WriteBuffer {
            buffer,
            offset,
            len: data.len(),
        });
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match buffer {
            Some(id) if self.buffers.contains_key(&id) => {
                self.bound.insert(target, id);
            }
            Some(id) => {
                log::warn!("bind of unknown buffer {id:?} ignored");
                return;
            }
            None => {
                self.bound.remove(&target);
            }
        }
        self.commands.push(Command::BindBuffer { target, buffer });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            return;
        }
        self.bound.retain(|_, id| *id != buffer);
        self.attributes.retain(|_, (_, id)| *id != buffer);
        self.commands.push(Command::DeleteBuffer(buffer));
    }

    fn create_program(&mut self, shader: &Shader) -> Result<ProgramId, ContextError> {
        let program = ProgramId(self.next_id());
        self.programs.insert(
            program,
            HeadlessProgram {
                uniforms: shader.uniforms().to_vec(),
                values: HashMap::new(),
            },
        );
        self.commands.push(Command::CreateProgram(program));
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_some() {
            if self.current_program == Some(program) {
                self.current_program = None;
            }
            self.commands.push(Command::DeleteProgram(program));
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        if !self.programs.contains_key(&program) {
            log::warn!("use of unknown program {program:?} ignored");
            return;
        }
        self.current_program = Some(program);
        self.commands.push(Command::UseProgram(program));
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
        let Some(p) = self.programs.get_mut(&location.program) else {
            log::warn!("uniform upload to unknown program {:?} ignored", location.program);
            return;
        };
        p.values.insert(location.offset, value.clone());
        self.uniform_uploads += 1;
        self.commands.push(Command::SetUniform {
            program: location.program,
            offset: location.offset,
        });
    }

    fn enable_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), ContextError> {
        let buffer = self
            .bound_buffer(BufferTarget::Array)
            .ok_or(ContextError::NoBuffer(BufferTarget::Array))?;
        self.attributes.insert(attribute.index, (*attribute, buffer));
        self.commands.push(Command::EnableAttribute(*attribute));
        Ok(())
    }

    fn disable_vertex_attributes(&mut self) {
        self.attributes.clear();
        self.commands.push(Command::DisableAttributes);
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(Command::Clear(color));
    }

    fn draw_elements(
        &mut self,
        mode: DrawMode,
        count: usize,
        index_type: DataType,
        offset: usize,
    ) -> Result<(), ContextError> {
        if index_type.is_float() || index_type.is_signed() {
            return Err(ContextError::Unsupported(format!("{index_type:?} indices")));
        }
        let program = self.current_program.ok_or(ContextError::NoProgram)?;
        let index_buffer = self
            .bound_buffer(BufferTarget::Element)
            .ok_or(ContextError::NoBuffer(BufferTarget::Element))?;

        let needed = offset + count * index_type.size();
        let available = self.buffers.get(&index_buffer).map_or(0, |b| b.data.len());
        if needed > available {
            log::warn!("draw reads {needed} index bytes but the buffer holds {available}");
        }

        self.commands.push(Command::Draw(DrawCall {
            mode,
            count,
            index_type,
            offset,
            program,
            index_buffer,
            attributes: self.attributes.values().copied().collect(),
        }));
        Ok(())
    }

    fn flush(&mut self) {
        self.commands.push(Command::Flush);
    }
}
