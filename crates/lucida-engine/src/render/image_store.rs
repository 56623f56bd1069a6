use std::collections::HashMap;

use image::RgbaImage;

use crate::scene::ImageId;

/// CPU copy of an image plus a generation that changes whenever the pixels do.
#[derive(Debug)]
pub struct StoredImage {
    /// Straight-alpha RGBA8.
    pub pixels: RgbaImage,
    pub generation: u64,
}

/// Images referenced by `DrawCmd::Image`.
///
/// Renderers upload lazily and re-upload when `generation` changes.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<ImageId, StoredImage>,
    next_id: u32,
    next_generation: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pixels: RgbaImage) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        let generation = self.bump();
        self.images.insert(id, StoredImage { pixels, generation });
        id
    }

    /// Swaps the pixels of an existing image. Returns `false` for unknown ids.
    pub fn replace(&mut self, id: ImageId, pixels: RgbaImage) -> bool {
        let generation = self.bump();
        match self.images.get_mut(&id) {
            Some(slot) => {
                *slot = StoredImage { pixels, generation };
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ImageId) -> Option<&StoredImage> {
        self.images.get(&id)
    }

    pub fn remove(&mut self, id: ImageId) -> Option<StoredImage> {
        self.images.remove(&id)
    }

    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_lookups_work() {
        let mut store = ImageStore::new();
        let a = store.insert(RgbaImage::new(1, 1));
        let b = store.insert(RgbaImage::new(2, 2));
        assert_ne!(a, b);
        assert_eq!(store.get(b).map(|i| i.pixels.width()), Some(2));
    }

    #[test]
    fn replace_bumps_generation() {
        let mut store = ImageStore::new();
        let id = store.insert(RgbaImage::new(1, 1));
        let before = store.get(id).map(|i| i.generation);
        assert!(store.replace(id, RgbaImage::new(3, 3)));
        let after = store.get(id).map(|i| i.generation);
        assert_ne!(before, after);
    }

    #[test]
    fn replace_unknown_id_is_rejected() {
        let mut store = ImageStore::new();
        assert!(!store.replace(ImageId(9), RgbaImage::new(1, 1)));
        assert!(store.get(ImageId(9)).is_none());
    }
}
