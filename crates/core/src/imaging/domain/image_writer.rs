use std::path::Path;

use crate::shared::raster::Raster;

/// Encodes a [`Raster`] to an image file.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, raster: &Raster) -> Result<(), Box<dyn std::error::Error>>;
}
