use std::path::Path;

use crate::shared::raster::Raster;

/// Decodes an image file into a [`Raster`].
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Raster, Box<dyn std::error::Error>>;
}
