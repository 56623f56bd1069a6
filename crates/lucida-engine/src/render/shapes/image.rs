use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{ImageStore, RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, ImageId};

use super::common::{
    ensure_buffer, load_pass, logical_clip_to_scissor, premul_alpha_blend,
    viewport_bind_group_layout, ViewportUniform,
};

/// Texture uploaded from an [`ImageStore`] entry.
struct GpuImage {
    generation: u64,
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Renderer for `DrawCmd::Image`.
///
/// Textures are uploaded on first use and re-uploaded when the stored image's
/// generation changes; entries removed from the store are evicted.
#[derive(Default)]
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    vbo: Option<(wgpu::Buffer, u64)>,
    textures: HashMap<ImageId, GpuImage>,

    vertices: Vec<ImageVertex>,
    draws: Vec<(ImageId, Option<Rect>)>,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        images: &ImageStore,
    ) {
        self.textures.retain(|id, _| images.get(*id).is_some());
        self.vertices.clear();
        self.draws.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Image(cmd) = &item.cmd else { continue };
            let dest = cmd.dest.normalized();
            if dest.is_empty() || cmd.opacity <= 0.0 || images.get(cmd.image).is_none() {
                continue;
            }
            self.vertices.extend_from_slice(&quad_vertices(dest, cmd.opacity));
            self.draws.push((cmd.image, item.clip_rect));
        }

        if self.draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        for i in 0..self.draws.len() {
            let id = self.draws[i].0;
            self.ensure_texture(ctx, id, images);
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));

        let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        let vbo = ensure_buffer(ctx.device, &mut self.vbo, bytes.len() as u64, wgpu::BufferUsages::VERTEX, "lucida image vbo");
        ctx.queue.write_buffer(vbo, 0, bytes);

        let (Some(pipeline), Some(viewport_bg), Some((vbo, _))) =
            (&self.pipeline, &self.viewport_bind_group, &self.vbo)
        else {
            return;
        };

        let mut rpass = load_pass(target.encoder, target.color_view, "lucida image pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..bytes.len() as u64));

        for (i, (id, clip)) in self.draws.iter().enumerate() {
            let Some(gpu_image) = self.textures.get(id) else { continue };
            let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(*clip, ctx.viewport, ctx.scale_factor) else {
                continue;
            };
            let first = (i * 6) as u32;
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.set_bind_group(1, &gpu_image.bind_group, &[]);
            rpass.draw(first..first + 6, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, id: ImageId, images: &ImageStore) {
        let Some(stored) = images.get(id) else { return };
        if self.textures.get(&id).is_some_and(|t| t.generation == stored.generation) {
            return;
        }
        let (Some(bgl), Some(sampler)) = (&self.texture_bgl, &self.sampler) else { return };

        let max = ctx.device.limits().max_texture_dimension_2d;
        let pixels = if stored.pixels.width() > max || stored.pixels.height() > max {
            let s = max as f32 / stored.pixels.width().max(stored.pixels.height()) as f32;
            let w = ((stored.pixels.width() as f32 * s) as u32).clamp(1, max);
            let h = ((stored.pixels.height() as f32 * s) as u32).clamp(1, max);
            log::debug!("downscaling image {id:?} to {w}x{h} for upload");
            std::borrow::Cow::Owned(image::imageops::thumbnail(&stored.pixels, w, h))
        } else {
            std::borrow::Cow::Borrowed(&stored.pixels)
        };
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lucida image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lucida image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        self.textures.insert(
            id,
            GpuImage { generation: stored.generation, _texture: texture, bind_group },
        );
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lucida image shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/image.wgsl").into()),
        });

        let viewport_bgl = viewport_bind_group_layout(ctx.device, "lucida image viewport bgl");
        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lucida image texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lucida image pipeline layout"),
            bind_group_layouts: &[&viewport_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lucida image pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ImageVertex::layout()],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        // Bind groups reference the old layout.
        self.textures.clear();
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("lucida image sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lucida image viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lucida image viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageVertex {
    pos: [f32; 2],
    uv: [f32; 2],
    opacity: f32,
}

impl ImageVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32    // opacity
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering `dest`.
fn quad_vertices(dest: Rect, opacity: f32) -> [ImageVertex; 6] {
    let (min, max) = (dest.min(), dest.max());
    let v = |x: f32, y: f32, u: f32, w: f32| ImageVertex { pos: [x, y], uv: [u, w], opacity };
    let tl = v(min.x, min.y, 0.0, 0.0);
    let tr = v(max.x, min.y, 1.0, 0.0);
    let br = v(max.x, max.y, 1.0, 1.0);
    let bl = v(min.x, max.y, 0.0, 1.0);
    [tl, tr, br, tl, br, bl]
}
