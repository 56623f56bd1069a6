//! Lucida engine crate.
//!
//! Platform + GPU runtime used by the perspective grid and the studio host:
//! geometry, paint, the draw stream, input, the wgpu device, renderers and the
//! winit event loop.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
