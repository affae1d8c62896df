//! Per-frame rendering: the frame state machine and its two passes.

pub use self::fill_renderer3d::FillRenderer3d;
pub use self::frame::{FrameStage, MeshRenderer};
pub use self::wireframe_renderer3d::WireframeRenderer3d;

mod fill_renderer3d;
mod frame;
mod wireframe_renderer3d;

use crate::color::{self, Color};

/// Viewport information for the frame being rendered.
///
/// The embedding window layer owns the surface and the render pass; it hands
/// the viewer the pixel size so projection and line thickness come out right.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext {
    /// The viewport width in pixels.
    pub viewport_width: u32,
    /// The viewport height in pixels.
    pub viewport_height: u32,
}

/// Render settings mutated by the UI layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Clear color of the frame.
    pub background: Color,
    /// Whether the wireframe overlay pass runs.
    pub wireframe_enabled: bool,
    /// Overlay line thickness in pixels, at least 1.
    pub wireframe_thickness: f32,
    /// Overlay line color.
    pub wireframe_color: Color,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            background: color::GRAY,
            wireframe_enabled: false,
            wireframe_thickness: 1.0,
            wireframe_color: color::BLACK,
        }
    }
}
