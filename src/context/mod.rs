//! wgpu rendering context management.

pub use self::context::Context;

mod context;
