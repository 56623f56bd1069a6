//! Tunables for the grid core.
//!
//! `GridConfig` holds interaction and model constants; `GridStyle` holds the
//! colors and widths used by [`crate::render_frame`]. Both are plain values with
//! `Default`, overridable by the host.

use lucida_engine::paint::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Camera scale bounds.
    pub min_scale: f32,
    pub max_scale: f32,
    /// Multiplicative step applied per wheel notch.
    pub wheel_zoom_step: f32,
    /// Hit radius in screen pixels.
    pub mouse_hit_radius: f32,
    pub touch_hit_radius: f32,
    /// Horizon pair offsets are `∓ fraction * viewport width`.
    pub horizon_pair_fraction: f32,
    pub perpendicular_pair_offset: f32,
    pub default_curvature: f32,
    pub max_curvature: f32,
    pub default_line_count: u32,
    pub max_line_count: u32,
    /// Seed for point colors. `None` seeds from entropy.
    pub color_seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 20.0,
            wheel_zoom_step: 1.1,
            mouse_hit_radius: 10.0,
            touch_hit_radius: 20.0,
            horizon_pair_fraction: 0.25,
            perpendicular_pair_offset: 200.0,
            default_curvature: 0.5,
            max_curvature: 2.0,
            default_line_count: 10,
            max_line_count: 100,
            color_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridStyle {
    pub horizon: Color,
    pub horizon_width: f32,
    /// Extent of the horizon line, in viewport widths either side of its center.
    pub horizon_span: f32,
    pub line_width: f32,
    pub dimmed: Color,
    pub marker_radius: f32,
    pub selection_outline: Color,
    pub selection_width: f32,
    pub axis_guide: Color,
    pub reference_grid: Color,
    pub frame_outline: Color,
    pub frame_width: f32,
    pub frame_handle_radius: f32,
    pub outside_frame: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            horizon: Color::rgb(255, 255, 0),
            horizon_width: 2.0,
            horizon_span: 4.0,
            line_width: 1.0,
            dimmed: Color::rgb(128, 128, 128),
            marker_radius: 10.0,
            selection_outline: Color::WHITE,
            selection_width: 2.0,
            axis_guide: Color::rgb(255, 0, 255).with_alpha(0.5),
            reference_grid: Color::WHITE.with_alpha(0.25),
            frame_outline: Color::WHITE.with_alpha(0.8),
            frame_width: 2.0,
            frame_handle_radius: 6.0,
            outside_frame: Color::BLACK.with_alpha(0.5),
        }
    }
}
