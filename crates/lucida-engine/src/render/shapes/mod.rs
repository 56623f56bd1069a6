//! GPU renderers.
//!
//! - `mesh`: every vector command, tessellated into one colored triangle list
//! - `image`: textured quads for `DrawCmd::Image`
//!
//! Images are drawn in their own pass before vector content, so they belong
//! on the lowest layers (backgrounds).

mod common;

pub mod image;
pub mod mesh;
