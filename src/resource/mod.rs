//! GPU-resident mesh data.

pub use self::gpu_vector::GPUVec;
pub use self::mesh_buffers::MeshBuffers;

mod gpu_vector;
mod mesh_buffers;
