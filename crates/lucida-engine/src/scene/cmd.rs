use crate::scene::shapes::{CircleCmd, CubicCmd, ImageCmd, LineCmd, PolygonCmd, PolylineCmd};

/// Renderer-agnostic draw command stream.
///
/// All coordinates are logical pixels; world-space geometry has already been
/// mapped by the list's transform stack when the command was recorded.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - teach `render::tessellate` (or a dedicated renderer) to draw it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Line(LineCmd),
    Cubic(CubicCmd),
    Polyline(PolylineCmd),
    Circle(CircleCmd),
    Polygon(PolygonCmd),
    Image(ImageCmd),
}
