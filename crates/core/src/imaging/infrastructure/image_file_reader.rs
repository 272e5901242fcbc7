use std::path::Path;

use image::DynamicImage;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::raster::Raster;

/// Decodes image files with the `image` crate.
///
/// 8-bit gray, gray+alpha, RGB and RGBA images keep their channel layout;
/// every other pixel format is converted to RGBA8.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Raster, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?;
        let raster = to_raster(img)?;
        log::debug!(
            "Decoded {} ({}x{}, {} channels)",
            path.display(),
            raster.width(),
            raster.height(),
            raster.channels()
        );
        Ok(raster)
    }
}

fn to_raster(img: DynamicImage) -> Result<Raster, Box<dyn std::error::Error>> {
    let (width, height) = (img.width(), img.height());
    let (data, channels) = match img {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
        DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
        other => (other.to_rgba8().into_raw(), 4),
    };
    Ok(Raster::try_new(data, width, height, channels)?)
}
