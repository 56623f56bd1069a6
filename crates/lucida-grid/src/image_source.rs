//! Background image boundary.
//!
//! The grid never decodes or waits on images: it asks a source whether it is
//! ready and, if so, lets it record itself into the draw list.

use image::RgbaImage;
use lucida_engine::coords::Rect;
use lucida_engine::render::ImageStore;
use lucida_engine::scene::{DrawList, ImageId, ZIndex};

pub trait ImageSource {
    /// Pixel size of the source frame, once known.
    fn natural_size(&self) -> Option<(u32, u32)>;

    /// Whether a frame can be drawn right now.
    fn is_ready(&self) -> bool;

    /// Records the current frame stretched into `dest` (logical pixels).
    fn draw_into(&self, list: &mut DrawList, z: ZIndex, dest: Rect);
}

/// A still image registered in an [`ImageStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StaticImage {
    id: ImageId,
    size: (u32, u32),
}

impl StaticImage {
    pub fn register(store: &mut ImageStore, pixels: RgbaImage) -> Self {
        let size = pixels.dimensions();
        let id = store.insert(pixels);
        Self { id, size }
    }

    /// Swaps in new pixels under the same id. Registers afresh if the old
    /// entry has gone.
    pub fn reload(&mut self, store: &mut ImageStore, pixels: RgbaImage) {
        if store.get(self.id).is_none() {
            *self = Self::register(store, pixels);
            return;
        }
        self.size = pixels.dimensions();
        store.replace(self.id, pixels);
    }

    pub fn id(&self) -> ImageId {
        self.id
    }
}

impl ImageSource for StaticImage {
    fn natural_size(&self) -> Option<(u32, u32)> {
        Some(self.size)
    }

    fn is_ready(&self) -> bool {
        self.size.0 > 0 && self.size.1 > 0
    }

    fn draw_into(&self, list: &mut DrawList, z: ZIndex, dest: Rect) {
        list.push_image(z, self.id, dest, 1.0);
    }
}
