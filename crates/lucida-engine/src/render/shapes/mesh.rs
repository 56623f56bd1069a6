use std::ops::Range;

use crate::coords::Rect;
use crate::render::tessellate::{tessellate, Mesh, MeshVertex};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawList;

use super::common::{
    ensure_buffer, load_pass, logical_clip_to_scissor, premul_alpha_blend,
    viewport_bind_group_layout, ViewportUniform,
};

/// Renders every vector command (`Line`, `Cubic`, `Polyline`, `Circle`,
/// `Polygon`) in paint order as one triangle list.
///
/// Clip rects split the index range into runs, one scissored draw each.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vbo: Option<(wgpu::Buffer, u64)>,
    ibo: Option<(wgpu::Buffer, u64)>,

    mesh: Mesh,
    runs: Vec<(Range<u32>, Option<Rect>)>,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.build_mesh(draw_list);
        if self.mesh.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.mesh.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&self.mesh.indices);

        let vbo = ensure_buffer(
            ctx.device,
            &mut self.vbo,
            vertex_bytes.len() as u64,
            wgpu::BufferUsages::VERTEX,
            "lucida mesh vbo",
        );
        ctx.queue.write_buffer(vbo, 0, vertex_bytes);

        let ibo = ensure_buffer(
            ctx.device,
            &mut self.ibo,
            index_bytes.len() as u64,
            wgpu::BufferUsages::INDEX,
            "lucida mesh ibo",
        );
        ctx.queue.write_buffer(ibo, 0, index_bytes);

        let (Some(pipeline), Some(bind_group), Some((vbo, _)), Some((ibo, _))) =
            (&self.pipeline, &self.bind_group, &self.vbo, &self.ibo)
        else {
            return;
        };

        let mut rpass = load_pass(target.encoder, target.color_view, "lucida mesh pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..vertex_bytes.len() as u64));
        rpass.set_index_buffer(ibo.slice(..index_bytes.len() as u64), wgpu::IndexFormat::Uint32);

        for (range, clip) in &self.runs {
            if let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(*clip, ctx.viewport, ctx.scale_factor) {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(range.clone(), 0, 0..1);
            }
        }
    }

    /// Tessellates the draw list and groups consecutive items sharing a clip.
    fn build_mesh(&mut self, draw_list: &mut DrawList) {
        self.mesh.clear();
        self.runs.clear();

        for item in draw_list.iter_in_paint_order() {
            let start = self.mesh.indices.len() as u32;
            if !tessellate(&item.cmd, &mut self.mesh) {
                continue;
            }
            let end = self.mesh.indices.len() as u32;
            if start == end {
                continue;
            }
            match self.runs.last_mut() {
                Some((range, clip)) if *clip == item.clip_rect && range.end == start => range.end = end,
                _ => self.runs.push((start..end, item.clip_rect)),
            }
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lucida mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bind_group_layout = viewport_bind_group_layout(ctx.device, "lucida mesh bgl");

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lucida mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lucida mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lucida mesh viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lucida mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // pos
    1 => Float32x4  // color (premultiplied)
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}
