//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands in logical pixels
//! - map recorded geometry through the active transform (world → screen)
//! - provide deterministic ordering (z-index + insertion order)
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod key;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use shapes::{
    Border, CircleCmd, CubicCmd, FillRule, ImageCmd, ImageId, LineCmd, PolygonCmd, PolylineCmd,
};
pub use z_index::ZIndex;
