use crate::data::{BufferTarget, BufferUsage};
use crate::device::{BufferId, GraphicsContext};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    Uninitialized,
    Live(BufferId),
    Deleted,
}

/// A GPU buffer with a fixed target and usage.
///
/// Misuse (updating before [`GpuBuffer::init`], after [`GpuBuffer::delete`],
/// or past the end) is logged and ignored.
#[derive(Debug)]
pub struct GpuBuffer {
    target: BufferTarget,
    usage: BufferUsage,
    size: usize,
    state: State,
}

impl GpuBuffer {
    pub fn new(target: BufferTarget, usage: BufferUsage) -> Self {
        Self {
            target,
            usage,
            size: 0,
            state: State::Uninitialized,
        }
    }

    #[inline]
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn id(&self) -> Option<BufferId> {
        match self.state {
            State::Live(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        self.id().is_some()
    }

    /// (Re)creates the buffer holding `data`. A previous buffer is released first.
    pub fn init<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, data: &[u8]) {
        if let State::Live(id) = self.state {
            ctx.delete_buffer(id);
            self.state = State::Uninitialized;
        }

        let Some(id) = ctx.create_buffer(self.target, self.usage, data) else {
            log::warn!("failed to create {:?} buffer", self.target);
            self.size = 0;
            return;
        };
        ctx.bind_buffer(self.target, Some(id));

        self.size = data.len();
        self.state = State::Live(id);
        log::trace!("{:?} buffer {:?} created ({} bytes)", self.target, id, data.len());
    }

    /// Overwrites `data.len()` bytes starting at byte `offset`.
    pub fn update<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, offset: usize, data: &[u8]) {
        let State::Live(id) = self.state else {
            log::warn!("cannot update {:?} buffer: it is not initialized", self.target);
            return;
        };

        if offset > self.size || data.len() > self.size - offset {
            log::warn!(
                "cannot update {:?} buffer: {} bytes at offset {} exceed its {} bytes",
                self.target,
                data.len(),
                offset,
                self.size
            );
            return;
        }

        ctx.bind_buffer(self.target, Some(id));
        ctx.write_buffer(id, offset, data);
    }

    pub fn bind<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) {
        match self.state {
            State::Live(id) => ctx.bind_buffer(self.target, Some(id)),
            _ => log::warn!("cannot bind {:?} buffer: it is not initialized", self.target),
        }
    }

    /// Releases the buffer. Later calls are no-ops.
    pub fn delete<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) {
        if let State::Live(id) = self.state {
            ctx.delete_buffer(id);
            self.state = State::Deleted;
            self.size = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessContext;

    #[test]
    fn init_then_update_in_place() {
        let mut ctx = HeadlessContext::new();
        let mut buf = GpuBuffer::new(BufferTarget::Array, BufferUsage::Dynamic);
        buf.init(&mut ctx, &[0u8; 8]);

        buf.update(&mut ctx, 4, &[1, 2, 3, 4]);
        let id = buf.id().unwrap();
        assert_eq!(ctx.buffer_data(id).unwrap(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn oversized_update_is_ignored() {
        let mut ctx = HeadlessContext::new();
        let mut buf = GpuBuffer::new(BufferTarget::Element, BufferUsage::Static);
        buf.init(&mut ctx, &[0u8; 4]);

        buf.update(&mut ctx, 2, &[9, 9, 9]);
        buf.update(&mut ctx, 8, &[]);
        assert_eq!(ctx.buffer_data(buf.id().unwrap()).unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn reinit_replaces_previous_buffer() {
        let mut ctx = HeadlessContext::new();
        let mut buf = GpuBuffer::new(BufferTarget::Array, BufferUsage::Static);
        buf.init(&mut ctx, &[1, 2]);
        let first = buf.id().unwrap();

        buf.init(&mut ctx, &[3, 4, 5, 6]);
        assert_eq!(buf.size(), 4);
        assert!(ctx.buffer_data(first).is_none());
        assert_eq!(ctx.live_buffer_count(), 1);
    }

    #[test]
    fn failed_reinit_leaves_no_buffer() {
        let mut ctx = HeadlessContext::new();
        let mut buf = GpuBuffer::new(BufferTarget::Array, BufferUsage::Dynamic);
        buf.init(&mut ctx, &[1, 2, 3, 4]);

        ctx.set_buffer_limit(Some(0));
        buf.init(&mut ctx, &[5, 6]);
        assert!(!buf.is_created());
        assert_eq!(buf.size(), 0);
        assert_eq!(ctx.live_buffer_count(), 0);

        ctx.set_buffer_limit(None);
        buf.update(&mut ctx, 0, &[9]);
        assert_eq!(ctx.live_buffer_count(), 0);
    }

    #[test]
    fn deleted_buffer_ignores_updates() {
        let mut ctx = HeadlessContext::new();
        let mut buf = GpuBuffer::new(BufferTarget::Array, BufferUsage::Static);
        buf.init(&mut ctx, &[1, 2, 3, 4]);

        buf.delete(&mut ctx);
        buf.delete(&mut ctx);
        buf.update(&mut ctx, 0, &[0]);

        assert!(!buf.is_created());
        assert_eq!(ctx.live_buffer_count(), 0);
    }
}
