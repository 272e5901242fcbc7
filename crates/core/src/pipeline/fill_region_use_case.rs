use std::path::Path;

use crate::blurring::domain::pixel_store::PixelSink;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::imaging::infrastructure::memory_image_store::MemoryImageStore;
use crate::shared::color::FillColor;
use crate::shared::error::BlurError;
use crate::shared::region::Region;

/// Paints `region` (the whole `extent` when `None`) with a solid color
/// through one stage/commit. Staged writes are discarded on failure.
pub fn fill_region(
    sink: &mut dyn PixelSink,
    extent: Region,
    region: Option<Region>,
    color: FillColor,
) -> Result<(), BlurError> {
    let channels = sink.channels();
    if !(1..=4).contains(&channels) {
        return Err(BlurError::config(format!(
            "fill supports 1 to 4 channels, got {channels}"
        )));
    }
    let region = region.unwrap_or(extent);
    if !extent.contains(&region) {
        return Err(BlurError::config(format!(
            "fill region {region} is not inside the image extent {extent}"
        )));
    }

    let pixel = color.to_pixel(channels);
    let buf: Vec<u8> = pixel
        .iter()
        .copied()
        .cycle()
        .take(region.byte_len(channels as usize))
        .collect();

    let result = sink.stage(&region, &buf).and_then(|()| sink.commit());
    if let Err(e) = &result {
        sink.discard();
        log::warn!("Fill of {region} aborted: {e}");
    } else {
        log::debug!("Filled {region} with {:?}", color.rgba);
    }
    result
}

/// Reads an image, fills a region with a solid color and writes it out.
pub struct FillRegionUseCase {
    reader: Box<dyn ImageReader>,
    image_writer: Box<dyn ImageWriter>,
    color: FillColor,
    region: Option<Region>,
}

impl FillRegionUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        image_writer: Box<dyn ImageWriter>,
        color: FillColor,
        region: Option<Region>,
    ) -> Self {
        Self {
            reader,
            image_writer,
            color,
            region,
        }
    }

    pub fn execute(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let raster = self.reader.read(input_path)?;
        let extent = raster.extent();
        let store = MemoryImageStore::new(raster);

        fill_region(&mut store.shadow(), extent, self.region, self.color)?;

        self.image_writer.write(output_path, &store.snapshot()?)?;
        log::info!("Wrote {}", output_path.display());
        Ok(())
    }
}
