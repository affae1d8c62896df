//! Fan tessellation into GPU-ready vertex streams.

use bytemuck::{Pod, Zeroable};

use crate::mesh::{FaceArity, ViewerMesh};

/// One corner of the interleaved fill stream: position followed by normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FillVertex {
    /// Vertex position.
    pub position: [f32; 3],
    /// Vertex normal resolved for this corner.
    pub normal: [f32; 3],
}

/// One wireframe line segment: start position followed by end position.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct EdgeSegment {
    /// Segment start.
    pub start: [f32; 3],
    /// Segment end.
    pub end: [f32; 3],
}

/// The three per-arity wireframe segment streams.
#[derive(Clone, Debug, Default)]
pub struct WireframeStreams {
    /// Segments of every triangle face.
    pub triangles: Vec<EdgeSegment>,
    /// Segments of every quad face.
    pub quads: Vec<EdgeSegment>,
    /// Segments of every n-gon face.
    pub ngons: Vec<EdgeSegment>,
}

impl WireframeStreams {
    /// The segment stream of the given bucket.
    pub fn bucket(&self, class: FaceArity) -> &[EdgeSegment] {
        match class {
            FaceArity::Triangle => &self.triangles,
            FaceArity::Quad => &self.quads,
            FaceArity::Ngon => &self.ngons,
        }
    }
}

/// Fan-triangulates every face into a flat interleaved triangle stream.
///
/// Each face of arity `n` becomes triangles `(0, i, i+1)` for `i` in
/// `1..n-1`, emitted corner by corner in triangle order. There is no index
/// buffer: vertices shared between triangles are duplicated, which is
/// acceptable at viewer scale.
pub fn fill_stream(mesh: &ViewerMesh) -> Vec<FillVertex> {
    let positions = mesh.positions();
    let normals = mesh.normals();
    let mut stream = Vec::new();

    for face in mesh.all_faces() {
        let corners = face.corners();
        for i in 1..corners.len() - 1 {
            for corner in [corners[0], corners[i], corners[i + 1]] {
                stream.push(FillVertex {
                    position: positions[corner.position as usize].into(),
                    normal: normals[corner.normal as usize].into(),
                });
            }
        }
    }

    stream
}

/// Builds one line-segment stream per arity bucket.
///
/// Every face contributes each of its perimeter edges `(i, (i+1) % arity)`,
/// without deduplication across faces; the renderer draws whole buckets so
/// no per-face branching happens at draw time.
pub fn wireframe_streams(mesh: &ViewerMesh) -> WireframeStreams {
    let positions = mesh.positions();
    let mut streams = WireframeStreams::default();

    for class in FaceArity::ALL {
        let bucket = match class {
            FaceArity::Triangle => &mut streams.triangles,
            FaceArity::Quad => &mut streams.quads,
            FaceArity::Ngon => &mut streams.ngons,
        };

        for face in mesh.faces(class) {
            let corners = face.corners();
            for i in 0..corners.len() {
                let a = corners[i].position as usize;
                let b = corners[(i + 1) % corners.len()].position as usize;
                bucket.push(EdgeSegment {
                    start: positions[a].into(),
                    end: positions[b].into(),
                });
            }
        }
    }

    streams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Corner, Face, ViewerMesh};
    use glamx::Vec3;

    fn ngon_mesh(arity: usize) -> ViewerMesh {
        let positions: Vec<Vec3> = (0..arity)
            .map(|i| {
                let a = i as f32 / arity as f32 * std::f32::consts::TAU;
                Vec3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let corners = (0..arity as u32)
            .map(|i| Corner {
                position: i,
                normal: i,
            })
            .collect();
        let mut mesh = ViewerMesh::new(positions, vec![Vec3::Z; arity]);
        mesh.push_face(Face::new(corners));
        mesh
    }

    #[test]
    fn fan_tessellation_emits_arity_minus_two_triangles() {
        for arity in [3usize, 4, 5, 8] {
            let stream = fill_stream(&ngon_mesh(arity));
            assert_eq!(stream.len(), (arity - 2) * 3, "arity {}", arity);
        }
    }

    #[test]
    fn fill_stream_interleaves_resolved_normals() {
        let stream = fill_stream(&ngon_mesh(3));
        assert_eq!(stream.len(), 3);
        for v in &stream {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
        // First corner of the fan is corner 0.
        assert_eq!(stream[0].position[0], 1.0);
    }

    #[test]
    fn wireframe_segments_close_the_perimeter() {
        let streams = wireframe_streams(&ngon_mesh(5));
        assert_eq!(streams.ngons.len(), 5);
        assert!(streams.triangles.is_empty());
        assert!(streams.quads.is_empty());

        // Last segment wraps back to corner 0.
        let last = streams.ngons.last().unwrap();
        assert_eq!(last.end, streams.ngons[0].start);
    }

    #[test]
    fn triangle_only_mesh_leaves_other_buckets_empty() {
        let streams = wireframe_streams(&ngon_mesh(3));
        assert_eq!(streams.triangles.len(), 3);
        assert!(streams.bucket(FaceArity::Quad).is_empty());
        assert!(streams.bucket(FaceArity::Ngon).is_empty());
    }
}
