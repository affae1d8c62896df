//! Wrapper for a lazily-uploaded wgpu vertex buffer.

use crate::context::Context;
use bytemuck::{Pod, Zeroable};

/// A vector of vertex elements kept on the CPU and mirrored to the GPU on demand.
///
/// Upload is deferred until the first draw so that loading a model never
/// requires a live GPU context; `replace` marks the vector dirty and the next
/// [`ensure_on_gpu`](GPUVec::ensure_on_gpu) call brings the buffer back in
/// sync. Meshes are viewer-scale, so the CPU copy is kept around.
pub struct GPUVec<T: Pod + Zeroable> {
    dirty: bool,
    buffer: Option<wgpu::Buffer>,
    data: Vec<T>,
}

impl<T: Pod + Zeroable> GPUVec<T> {
    /// Creates a new `GPUVec` that is not yet uploaded to the GPU.
    pub fn new(data: Vec<T>) -> GPUVec<T> {
        GPUVec {
            dirty: !data.is_empty(),
            buffer: None,
            data,
        }
    }

    /// Creates a new empty `GPUVec`.
    pub fn new_empty() -> GPUVec<T> {
        GPUVec::new(Vec::new())
    }

    /// Is this vector empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Immutably accesses the CPU-side data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns `true` if this vector is currently uploaded to the GPU.
    #[inline]
    pub fn is_on_gpu(&self) -> bool {
        self.buffer.is_some()
    }

    /// Returns `true` if the CPU data and GPU data are out of sync.
    #[inline]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the contents wholesale and marks the vector dirty.
    pub fn replace(&mut self, data: Vec<T>) {
        self.data = data;
        self.dirty = true;
    }

    /// Loads the vector from the RAM to the GPU.
    ///
    /// Nothing happens if the data is empty or the buffer is already in sync.
    pub fn load_to_gpu(&mut self) {
        if self.data.is_empty() {
            self.dirty = false;
            return;
        }
        if !self.dirty && self.buffer.is_some() {
            return;
        }

        let ctxt = Context::get();
        let bytes: &[u8] = bytemuck::cast_slice(&self.data);

        match &self.buffer {
            Some(buffer) if bytes.len() as u64 <= buffer.size() => {
                ctxt.write_buffer(buffer, 0, bytes);
            }
            _ => {
                self.buffer = Some(ctxt.create_buffer_init(
                    Some("GPUVec buffer"),
                    bytes,
                    wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                ));
            }
        }

        self.dirty = false;
    }

    /// Ensures the buffer is on the GPU and returns a reference to it.
    ///
    /// Returns `None` if the data is empty.
    pub fn ensure_on_gpu(&mut self) -> Option<&wgpu::Buffer> {
        self.load_to_gpu();
        self.buffer.as_ref()
    }

    /// Frees the GPU buffer, keeping the CPU data.
    ///
    /// The next `ensure_on_gpu` call re-creates the buffer from scratch.
    pub fn unload_from_gpu(&mut self) {
        self.buffer = None;
        self.dirty = !self.data.is_empty();
    }
}

impl<T: Pod + Zeroable> Default for GPUVec<T> {
    fn default() -> Self {
        GPUVec::new_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_marks_dirty_without_touching_the_gpu() {
        let mut v: GPUVec<[f32; 3]> = GPUVec::new_empty();
        assert!(!v.dirty());

        v.replace(vec![[1.0, 2.0, 3.0]]);
        assert!(v.dirty());
        assert!(!v.is_on_gpu());
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn unload_requeues_nonempty_data_for_upload() {
        let mut v: GPUVec<[f32; 3]> = GPUVec::new(vec![[0.0; 3]]);
        v.unload_from_gpu();
        assert!(v.dirty());

        let mut empty: GPUVec<[f32; 3]> = GPUVec::new_empty();
        empty.unload_from_gpu();
        assert!(!empty.dirty());
    }
}
