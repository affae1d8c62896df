//! Data structure of a loaded model.

use glamx::Vec3;

/// The type used for vertex indices.
pub type VertexIndex = u32;

/// Magnitude vertex normals are scaled to after synthesis.
///
/// Carried over from the reference viewer's shading setup; the fill shader
/// renormalizes, so this is cosmetic but intentional.
pub const NORMAL_DISPLAY_SCALE: f32 = 0.3;

/// One corner of a face: a position index plus the normal index resolved for it.
///
/// Both indices are 0-based. When the source file gives a corner no explicit
/// normal, the normal index mirrors the position index, which is exactly where
/// synthesized normals land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    /// Index into the mesh position array.
    pub position: VertexIndex,
    /// Index into the mesh normal array.
    pub normal: VertexIndex,
}

/// An ordered sequence of at least three corners.
#[derive(Clone, Debug)]
pub struct Face {
    corners: Vec<Corner>,
}

impl Face {
    /// Creates a face from its corners. The parser guarantees `corners.len() >= 3`.
    pub(crate) fn new(corners: Vec<Corner>) -> Face {
        debug_assert!(corners.len() >= 3);
        Face { corners }
    }

    /// The corners of this face, in source order.
    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    /// Number of corners.
    #[inline]
    pub fn arity(&self) -> usize {
        self.corners.len()
    }

    /// The wireframe bucket this face belongs to.
    #[inline]
    pub fn class(&self) -> FaceArity {
        match self.corners.len() {
            3 => FaceArity::Triangle,
            4 => FaceArity::Quad,
            _ => FaceArity::Ngon,
        }
    }
}

/// Face category by corner count.
///
/// Only wireframe bucket selection looks at this; filled rendering always
/// consumes the fan-triangulated stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceArity {
    /// Exactly 3 corners.
    Triangle,
    /// Exactly 4 corners.
    Quad,
    /// 5 or more corners.
    Ngon,
}

impl FaceArity {
    /// All buckets, in drawing order.
    pub const ALL: [FaceArity; 3] = [FaceArity::Triangle, FaceArity::Quad, FaceArity::Ngon];
}

/// A loaded model: vertex data plus faces bucketed by arity.
///
/// Created wholesale by the loader on every successful load; never mutated
/// incrementally afterwards.
#[derive(Clone, Debug, Default)]
pub struct ViewerMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<Face>,
    quads: Vec<Face>,
    ngons: Vec<Face>,
    edge_count: usize,
}

impl ViewerMesh {
    /// Creates a mesh holding vertex data but no faces yet.
    pub(crate) fn new(positions: Vec<Vec3>, normals: Vec<Vec3>) -> ViewerMesh {
        ViewerMesh {
            positions,
            normals,
            triangles: Vec::new(),
            quads: Vec::new(),
            ngons: Vec::new(),
            edge_count: 0,
        }
    }

    /// Adds a face to the bucket matching its arity.
    pub(crate) fn push_face(&mut self, face: Face) {
        match face.class() {
            FaceArity::Triangle => self.triangles.push(face),
            FaceArity::Quad => self.quads.push(face),
            FaceArity::Ngon => self.ngons.push(face),
        }
    }

    pub(crate) fn set_edge_count(&mut self, count: usize) {
        self.edge_count = count;
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex normals. Synthesized when the source file had none.
    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Faces of the given bucket.
    pub fn faces(&self, class: FaceArity) -> &[Face] {
        match class {
            FaceArity::Triangle => &self.triangles,
            FaceArity::Quad => &self.quads,
            FaceArity::Ngon => &self.ngons,
        }
    }

    /// Iterates over every face, all buckets.
    pub fn all_faces(&self) -> impl Iterator<Item = &Face> {
        self.triangles
            .iter()
            .chain(self.quads.iter())
            .chain(self.ngons.iter())
    }

    /// Number of vertex positions.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of distinct edges induced by face corner adjacency.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of faces, all buckets.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.triangles.len() + self.quads.len() + self.ngons.len()
    }

    /// `true` if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The axis-aligned bounding box of the vertex positions, or `None` for
    /// an empty mesh.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some((min, max))
    }

    /// Canonical (min, max) form of an edge between two position indices.
    #[inline]
    pub(crate) fn canonical_edge(a: VertexIndex, b: VertexIndex) -> (VertexIndex, VertexIndex) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Computes per-vertex normals from face geometry.
    ///
    /// Runs only when the source file supplied no `vn` records. Every face
    /// contributes the normalized cross product of its first two edge vectors
    /// (first three corners, whatever the arity) to each of its vertices; the
    /// accumulated sums are then normalized and scaled to
    /// [`NORMAL_DISPLAY_SCALE`]. Degenerate faces with a zero-length cross
    /// product contribute nothing.
    pub(crate) fn synthesize_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in self
            .triangles
            .iter()
            .chain(self.quads.iter())
            .chain(self.ngons.iter())
        {
            let c = face.corners();
            let p0 = self.positions[c[0].position as usize];
            let p1 = self.positions[c[1].position as usize];
            let p2 = self.positions[c[2].position as usize];
            let cross = (p1 - p0).cross(p2 - p0);

            if cross == Vec3::ZERO {
                continue;
            }

            let normal = cross.normalize();
            for corner in c {
                normals[corner.position as usize] += normal;
            }
        }

        for n in &mut normals {
            if *n != Vec3::ZERO {
                *n = n.normalize() * NORMAL_DISPLAY_SCALE;
            }
        }

        self.normals = normals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(i: VertexIndex) -> Corner {
        Corner {
            position: i,
            normal: i,
        }
    }

    fn unit_quad() -> ViewerMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh = ViewerMesh::new(positions, Vec::new());
        mesh.push_face(Face::new(vec![corner(0), corner(1), corner(2), corner(3)]));
        mesh
    }

    #[test]
    fn faces_land_in_their_arity_bucket() {
        let mut mesh = ViewerMesh::new(vec![Vec3::ZERO; 6], Vec::new());
        mesh.push_face(Face::new(vec![corner(0), corner(1), corner(2)]));
        mesh.push_face(Face::new(vec![corner(0), corner(1), corner(2), corner(3)]));
        mesh.push_face(Face::new(vec![
            corner(0),
            corner(1),
            corner(2),
            corner(3),
            corner(4),
        ]));

        assert_eq!(mesh.faces(FaceArity::Triangle).len(), 1);
        assert_eq!(mesh.faces(FaceArity::Quad).len(), 1);
        assert_eq!(mesh.faces(FaceArity::Ngon).len(), 1);
        assert_eq!(mesh.face_count(), 3);
    }

    #[test]
    fn synthesized_normals_have_display_magnitude() {
        let mut mesh = unit_quad();
        mesh.synthesize_normals();

        assert_eq!(mesh.normals().len(), 4);
        for n in mesh.normals() {
            assert!((n.length() - NORMAL_DISPLAY_SCALE).abs() < 1e-6);
            // The quad lies in the z = 0 plane.
            assert!(n.x.abs() < 1e-6 && n.y.abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_face_contributes_nothing() {
        // All three corners collinear: zero cross product.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        let mut mesh = ViewerMesh::new(positions, Vec::new());
        mesh.push_face(Face::new(vec![corner(0), corner(1), corner(2)]));
        mesh.synthesize_normals();

        for n in mesh.normals() {
            assert_eq!(*n, Vec3::ZERO);
            assert!(n.x.is_finite() && n.y.is_finite() && n.z.is_finite());
        }
    }

    #[test]
    fn bounding_box_spans_all_vertices() {
        let mesh = unit_quad();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));

        assert!(ViewerMesh::default().bounding_box().is_none());
    }

    #[test]
    fn canonical_edge_orders_its_endpoints() {
        assert_eq!(ViewerMesh::canonical_edge(3, 1), (1, 3));
        assert_eq!(ViewerMesh::canonical_edge(1, 3), (1, 3));
        assert_eq!(ViewerMesh::canonical_edge(2, 2), (2, 2));
    }
}
