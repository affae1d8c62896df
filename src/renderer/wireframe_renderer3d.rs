//! The wireframe overlay pass.
//!
//! Lines are drawn as instanced screen-space quads so the configurable
//! thickness works on backends without wide line support. Depth testing is
//! `LessEqual`, which lets the overlay sit flush on the fill pass surface
//! without z-fighting.

use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::context::Context;
use crate::mesh::EdgeSegment;

/// Per-pass uniforms of the overlay.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LineUniforms {
    color: [f32; 4],
    width: f32,
    _padding: [f32; 3],
}

/// Draws the per-arity wireframe segment buffers as constant-color,
/// unlit thick lines.
pub struct WireframeRenderer3d {
    pipeline: wgpu::RenderPipeline,
    line_uniform_buffer: wgpu::Buffer,
    line_bind_group: wgpu::BindGroup,
}

impl WireframeRenderer3d {
    /// Creates the overlay pipeline against the shared view bind group layout.
    pub fn new(view_bind_group_layout: &wgpu::BindGroupLayout) -> WireframeRenderer3d {
        let ctxt = Context::get();

        let line_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("wireframe_line_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("wireframe_pipeline_layout"),
            bind_group_layouts: &[view_bind_group_layout, &line_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader =
            ctxt.create_shader_module(Some("wireframe_shader"), include_str!("wireframe3d.wgsl"));

        // One instance per segment: start then end, stride 6 floats.
        let vertex_buffer_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EdgeSegment>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        };

        let pipeline = ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wireframe_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_buffer_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctxt.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Context::depth_format(),
                depth_write_enabled: true,
                // Overlay lines must win ties against the surface they trace.
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let line_uniform_buffer = ctxt.create_buffer(&wgpu::BufferDescriptor {
            label: Some("wireframe_line_uniform_buffer"),
            size: std::mem::size_of::<LineUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wireframe_line_bind_group"),
            layout: &line_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: line_uniform_buffer.as_entire_binding(),
            }],
        });

        WireframeRenderer3d {
            pipeline,
            line_uniform_buffer,
            line_bind_group,
        }
    }

    /// Writes the overlay color and thickness for this tick.
    pub fn prepare(&self, color: Color, width: f32) {
        let ctxt = Context::get();
        let uniforms = LineUniforms {
            color: [color.r, color.g, color.b, color.a],
            width,
            _padding: [0.0; 3],
        };
        ctxt.write_buffer(&self.line_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Records one instanced draw over a segment buffer.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        buffer: &wgpu::Buffer,
        segment_count: u32,
    ) {
        if segment_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.line_bind_group, &[]);
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(0..6, 0..segment_count);
    }
}
