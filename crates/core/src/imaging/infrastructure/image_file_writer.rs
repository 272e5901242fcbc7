use std::path::Path;

use image::ExtendedColorType;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::raster::Raster;

/// Writes a raster to an image file using the `image` crate.
///
/// The format follows the file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, raster: &Raster) -> Result<(), Box<dyn std::error::Error>> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let color = match raster.channels() {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            4 => ExtendedColorType::Rgba8,
            n => return Err(format!("Cannot encode a {n}-channel image").into()),
        };

        image::save_buffer(path, raster.data(), raster.width(), raster.height(), color)?;
        Ok(())
    }
}
