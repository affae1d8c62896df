//! GPU buffers backing the currently displayed model.

use crate::mesh::{EdgeSegment, FaceArity, FillVertex, WireframeStreams};
use crate::resource::GPUVec;

/// Owns the interleaved fill buffer and the three per-arity wireframe buffers.
///
/// `upload` replaces all four streams wholesale; there is no partial update.
/// The previous GPU allocations are released first, so repeated loads never
/// leak GPU memory, and the swap happens before any draw can observe it.
#[derive(Default)]
pub struct MeshBuffers {
    fill: GPUVec<FillVertex>,
    wire_triangles: GPUVec<EdgeSegment>,
    wire_quads: GPUVec<EdgeSegment>,
    wire_ngons: GPUVec<EdgeSegment>,
}

impl MeshBuffers {
    /// Creates empty buffers. Drawing them is a silent no-op.
    pub fn new() -> MeshBuffers {
        MeshBuffers::default()
    }

    /// Replaces every stream with freshly tessellated data.
    pub fn upload(&mut self, fill: Vec<FillVertex>, wireframe: WireframeStreams) {
        self.release();
        self.fill.replace(fill);
        self.wire_triangles.replace(wireframe.triangles);
        self.wire_quads.replace(wireframe.quads);
        self.wire_ngons.replace(wireframe.ngons);
    }

    /// Frees every GPU allocation, keeping CPU data for re-upload.
    pub fn release(&mut self) {
        self.fill.unload_from_gpu();
        self.wire_triangles.unload_from_gpu();
        self.wire_quads.unload_from_gpu();
        self.wire_ngons.unload_from_gpu();
    }

    /// `true` when no fill geometry is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty()
    }

    /// Number of tessellated triangles in the fill stream.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.fill.len() / 3
    }

    /// Number of line segments in the given wireframe bucket.
    pub fn segment_count(&self, class: FaceArity) -> usize {
        self.wire_bucket(class).len()
    }

    /// The fill buffer and its vertex count, uploaded on demand.
    ///
    /// `None` when the mesh is empty; the caller skips the draw.
    pub fn fill_buffer(&mut self) -> Option<(&wgpu::Buffer, u32)> {
        let count = self.fill.len() as u32;
        self.fill.ensure_on_gpu().map(|buffer| (buffer, count))
    }

    /// A wireframe bucket buffer and its segment count, uploaded on demand.
    ///
    /// `None` for an empty bucket; the caller skips the draw.
    pub fn wireframe_buffer(&mut self, class: FaceArity) -> Option<(&wgpu::Buffer, u32)> {
        let bucket = self.wire_bucket_mut(class);
        let count = bucket.len() as u32;
        bucket.ensure_on_gpu().map(|buffer| (buffer, count))
    }

    fn wire_bucket(&self, class: FaceArity) -> &GPUVec<EdgeSegment> {
        match class {
            FaceArity::Triangle => &self.wire_triangles,
            FaceArity::Quad => &self.wire_quads,
            FaceArity::Ngon => &self.wire_ngons,
        }
    }

    fn wire_bucket_mut(&mut self, class: FaceArity) -> &mut GPUVec<EdgeSegment> {
        match class {
            FaceArity::Triangle => &mut self.wire_triangles,
            FaceArity::Quad => &mut self.wire_quads,
            FaceArity::Ngon => &mut self.wire_ngons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_obj;
    use crate::mesh::{fill_stream, wireframe_streams};

    #[test]
    fn upload_replaces_all_streams() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let mut buffers = MeshBuffers::new();
        buffers.upload(fill_stream(&mesh), wireframe_streams(&mesh));

        // One quad: 2 fan triangles, 4 quad-bucket segments.
        assert_eq!(buffers.triangle_count(), 2);
        assert_eq!(buffers.segment_count(FaceArity::Quad), 4);
        assert_eq!(buffers.segment_count(FaceArity::Triangle), 0);
        assert_eq!(buffers.segment_count(FaceArity::Ngon), 0);

        let tri = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n").unwrap();
        buffers.upload(fill_stream(&tri), wireframe_streams(&tri));
        assert_eq!(buffers.triangle_count(), 1);
        assert_eq!(buffers.segment_count(FaceArity::Quad), 0);
        assert_eq!(buffers.segment_count(FaceArity::Triangle), 3);
    }

    #[test]
    fn empty_buffers_report_no_geometry() {
        let buffers = MeshBuffers::new();
        assert!(buffers.is_empty());
        assert_eq!(buffers.triangle_count(), 0);
        for class in FaceArity::ALL {
            assert_eq!(buffers.segment_count(class), 0);
        }
    }
}
