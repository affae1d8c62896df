//! CPU-side mesh data: parsed geometry, normal synthesis, tessellation.

pub use self::tessellate::{fill_stream, wireframe_streams, EdgeSegment, FillVertex, WireframeStreams};
pub use self::viewer_mesh::{Corner, Face, FaceArity, VertexIndex, ViewerMesh, NORMAL_DISPLAY_SCALE};

mod tessellate;
mod viewer_mesh;
