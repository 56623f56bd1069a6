//! Perspective grid core.
//!
//! Holds everything between raw pointer input and a recorded draw stream:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`camera`] | `Camera` pan/zoom transform, hit radii |
//! | [`geometry`] | quad tests, projection fans, geodesic curves |
//! | [`model`] | `GridModel`, vanishing points, horizon, frame quad |
//! | [`render`] | `render_frame` entry point |
//! | [`controller`] | gesture state machine driving model + camera |
//! | [`events`] | `PointerEvent`, `EventHub`, input translation |
//! | [`image_source`] | background image boundary |
//! | [`export`] | clipping a rendered surface to the frame quad |
//!
//! Nothing here touches wgpu or winit; the host owns the window and the GPU.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod image_source;
pub mod model;
pub mod render;

pub use camera::{Camera, PointerKind};
pub use config::{GridConfig, GridStyle};
pub use controller::{Controller, Gesture};
pub use error::GridError;
pub use events::{EventHub, PointerEvent, PointerTranslator, Subscription};
pub use image_source::{ImageSource, StaticImage};
pub use model::{
    Anchor, AnchorMode, AspectRatio, FrameQuad, GridModel, GridSettings, GridSnapshot, Horizon,
    PairId, PointId, VanishingPoint,
};
pub use render::render_frame;
