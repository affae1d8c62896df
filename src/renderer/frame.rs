//! The per-tick frame state machine.

use bytemuck::{Pod, Zeroable};
use glamx::Vec2;

use crate::camera::ViewerCamera3d;
use crate::context::Context;
use crate::mesh::FaceArity;
use crate::renderer::{FillRenderer3d, RenderContext, RenderState, WireframeRenderer3d};
use crate::resource::MeshBuffers;

/// The states a frame advances through on every repaint tick.
///
/// `Idle → Cleared → Projected → Viewed → FillDrawn → (WireframeDrawn | skip)
/// → Idle`. The machine terminates only at viewer shutdown; an empty mesh
/// still walks the full cycle with its draws skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    /// Between ticks.
    Idle,
    /// Color and depth buffers cleared with the background color.
    Cleared,
    /// Projection matrix written.
    Projected,
    /// View matrix written.
    Viewed,
    /// Fill pass recorded.
    FillDrawn,
    /// Wireframe overlay pass recorded.
    WireframeDrawn,
}

impl FrameStage {
    /// The state following this one.
    ///
    /// The overlay state is entered only when the wireframe is enabled;
    /// otherwise the fill pass is the last stop before `Idle`.
    pub fn next(self, wireframe_enabled: bool) -> FrameStage {
        match self {
            FrameStage::Idle => FrameStage::Cleared,
            FrameStage::Cleared => FrameStage::Projected,
            FrameStage::Projected => FrameStage::Viewed,
            FrameStage::Viewed => FrameStage::FillDrawn,
            FrameStage::FillDrawn => {
                if wireframe_enabled {
                    FrameStage::WireframeDrawn
                } else {
                    FrameStage::Idle
                }
            }
            FrameStage::WireframeDrawn => FrameStage::Idle,
        }
    }
}

/// Frame-level uniforms shared by both passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewUniforms {
    proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    viewport: [f32; 4], // width, height, unused, unused
}

const PROJ_OFFSET: u64 = std::mem::offset_of!(ViewUniforms, proj) as u64;
const VIEW_OFFSET: u64 = std::mem::offset_of!(ViewUniforms, view) as u64;
const VIEWPORT_OFFSET: u64 = std::mem::offset_of!(ViewUniforms, viewport) as u64;

/// Orchestrates the per-frame GPU state: clear, matrices, fill pass,
/// optional wireframe overlay pass.
pub struct MeshRenderer {
    view_uniform_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    fill: FillRenderer3d,
    wireframe: WireframeRenderer3d,
    stage: FrameStage,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRenderer {
    /// Creates the renderer and both pipelines.
    ///
    /// Requires an initialized [`Context`].
    pub fn new() -> MeshRenderer {
        let ctxt = Context::get();

        let view_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("view_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let view_uniform_buffer = ctxt.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view_uniform_buffer"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("view_bind_group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_uniform_buffer.as_entire_binding(),
            }],
        });

        let fill = FillRenderer3d::new(&view_bind_group_layout);
        let wireframe = WireframeRenderer3d::new(&view_bind_group_layout);

        MeshRenderer {
            view_uniform_buffer,
            view_bind_group,
            fill,
            wireframe,
            stage: FrameStage::Idle,
        }
    }

    /// The current frame stage.
    #[inline]
    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Starts a tick and returns the clear color for the render pass.
    ///
    /// The embedding layer uses the returned color as the load operation of
    /// its color attachment (with the depth attachment cleared alongside).
    pub fn begin_frame(&mut self, state: &RenderState) -> wgpu::Color {
        debug_assert_eq!(self.stage, FrameStage::Idle);
        self.stage = self.stage.next(state.wireframe_enabled);
        wgpu::Color {
            r: state.background.r as f64,
            g: state.background.g as f64,
            b: state.background.b as f64,
            a: state.background.a as f64,
        }
    }

    /// Records the rest of the tick into an open render pass.
    ///
    /// Missing or empty mesh buffers skip their draws silently; rendering
    /// zero geometry is a valid steady state.
    pub fn render(
        &mut self,
        camera: &mut ViewerCamera3d,
        buffers: &mut MeshBuffers,
        state: &RenderState,
        render_pass: &mut wgpu::RenderPass<'_>,
        context: &RenderContext,
    ) {
        debug_assert_eq!(self.stage, FrameStage::Cleared);
        let ctxt = Context::get();
        let viewport = Vec2::new(context.viewport_width as f32, context.viewport_height as f32);

        let proj = camera.projection(viewport);
        ctxt.write_buffer(
            &self.view_uniform_buffer,
            PROJ_OFFSET,
            bytemuck::bytes_of(&proj.to_cols_array_2d()),
        );
        ctxt.write_buffer(
            &self.view_uniform_buffer,
            VIEWPORT_OFFSET,
            bytemuck::bytes_of(&[viewport.x, viewport.y, 0.0, 0.0]),
        );
        self.stage = self.stage.next(state.wireframe_enabled);

        let view = camera.view();
        ctxt.write_buffer(
            &self.view_uniform_buffer,
            VIEW_OFFSET,
            bytemuck::bytes_of(&view.to_cols_array_2d()),
        );
        self.stage = self.stage.next(state.wireframe_enabled);

        render_pass.set_bind_group(0, &self.view_bind_group, &[]);

        if let Some((buffer, vertex_count)) = buffers.fill_buffer() {
            self.fill.draw(render_pass, buffer, vertex_count);
        }
        self.stage = self.stage.next(state.wireframe_enabled);

        if state.wireframe_enabled {
            self.wireframe
                .prepare(state.wireframe_color, state.wireframe_thickness.max(1.0));
            for class in FaceArity::ALL {
                if let Some((buffer, segment_count)) = buffers.wireframe_buffer(class) {
                    self.wireframe.draw(render_pass, buffer, segment_count);
                }
            }
            self.stage = self.stage.next(state.wireframe_enabled);
        }

        self.stage = self.stage.next(state.wireframe_enabled);
        debug_assert_eq!(self.stage, FrameStage::Idle);
    }
}
