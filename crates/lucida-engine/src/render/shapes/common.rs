//! GPU types and helpers shared by the renderers.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

pub(super) const VIEWPORT_UBO_SIZE: NonZeroU64 =
    match NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64) {
        Some(size) => size,
        None => panic!("ViewportUniform is zero-sized"),
    };

pub(super) fn viewport_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(VIEWPORT_UBO_SIZE),
            },
            count: None,
        }],
    })
}

// ── buffers ───────────────────────────────────────────────────────────────

/// Grows `slot` to hold at least `required_bytes`; returns the buffer.
pub(super) fn ensure_buffer<'b>(
    device: &wgpu::Device,
    slot: &'b mut Option<(wgpu::Buffer, u64)>,
    required_bytes: u64,
    usage: wgpu::BufferUsages,
    label: &str,
) -> &'b wgpu::Buffer {
    let too_small = slot.as_ref().is_none_or(|(_, cap)| *cap < required_bytes);
    if too_small {
        let cap = required_bytes.next_power_of_two().max(4096);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: cap,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        *slot = Some((buffer, cap));
    }
    match slot {
        Some((buffer, _)) => buffer,
        None => unreachable!("buffer slot filled above"),
    }
}

// ── pass ──────────────────────────────────────────────────────────────────

/// Render pass that loads and keeps the existing color contents.
pub(super) fn load_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &'e wgpu::TextureView,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical-pixel clip rect to a physical scissor rect `(x, y, w, h)`.
///
/// `None` clip means the full viewport. Returns `None` for a zero-area result
/// (the renderer skips the draw).
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = (viewport.width * scale).max(1.0) as u32;
    let phys_vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_vw, phys_vh),
        Some(r) => {
            let x = ((r.origin.x * scale).max(0.0) as u32).min(phys_vw);
            let y = ((r.origin.y * scale).max(0.0) as u32).min(phys_vh);
            let x2 = ((r.max().x * scale).max(0.0) as u32).min(phys_vw);
            let y2 = ((r.max().y * scale).max(0.0) as u32).min(phys_vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clip_is_full_physical_viewport() {
        let s = logical_clip_to_scissor(None, Viewport::new(100.0, 50.0), 2.0);
        assert_eq!(s, Some((0, 0, 200, 100)));
    }

    #[test]
    fn clip_is_scaled_and_clamped() {
        let s = logical_clip_to_scissor(Some(Rect::new(90.0, -10.0, 50.0, 20.0)), Viewport::new(100.0, 50.0), 1.0);
        assert_eq!(s, Some((90, 0, 10, 10)));
    }

    #[test]
    fn empty_clip_skips_draw() {
        let s = logical_clip_to_scissor(Some(Rect::new(0.0, 0.0, 0.0, 10.0)), Viewport::new(100.0, 50.0), 1.0);
        assert_eq!(s, None);
    }
}
