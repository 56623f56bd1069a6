//! Writing exports to disk and the clipboard.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::RgbaImage;

pub fn export_filename(now: DateTime<Local>) -> String {
    format!("lucida_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Saves `image` as PNG under `dir`, creating the folder if needed.
pub fn save_png(image: &RgbaImage, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create export folder {}", dir.display()))?;
    let path = dir.join(export_filename(now));
    image
        .save(&path)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn copy_to_clipboard(image: &RgbaImage) -> Result<()> {
    let (w, h) = image.dimensions();
    let mut cb = arboard::Clipboard::new().context("open clipboard")?;
    cb.set_image(arboard::ImageData {
        width: w as usize,
        height: h as usize,
        bytes: Cow::Borrowed(image.as_raw()),
    })
    .context("copy image to clipboard")?;
    Ok(())
}
