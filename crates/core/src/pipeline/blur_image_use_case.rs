use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::imaging::infrastructure::memory_image_store::MemoryImageStore;
use crate::pipeline::blur_region_use_case::BlurRegionUseCase;
use crate::shared::region::Region;
use crate::shared::settings::BlurSettings;

/// Single-image blurring pipeline: read → blur region → write.
pub struct BlurImageUseCase {
    reader: Box<dyn ImageReader>,
    image_writer: Box<dyn ImageWriter>,
    settings: BlurSettings,
    region: Option<Region>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl BlurImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        image_writer: Box<dyn ImageWriter>,
        settings: BlurSettings,
        region: Option<Region>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader,
            image_writer,
            settings,
            region,
            cancelled,
        }
    }

    /// Reads the input image, blurs the configured region (the whole
    /// image when unset) and writes the result. Nothing is written when
    /// the blur fails.
    pub fn execute(
        &self,
        input_path: &Path,
        output_path: &Path,
        on_progress: impl FnMut(f64),
    ) -> Result<(), Box<dyn std::error::Error>> {
        let raster = self.reader.read(input_path)?;
        log::info!(
            "Read {}: {}x{} with {} channels",
            input_path.display(),
            raster.width(),
            raster.height(),
            raster.channels()
        );

        let store = MemoryImageStore::new(raster);
        let mut shadow = store.shadow();
        BlurRegionUseCase::new(self.settings.clone(), self.cancelled.clone()).execute(
            &store,
            &mut shadow,
            self.region,
            on_progress,
        )?;

        self.image_writer.write(output_path, &store.snapshot()?)?;
        log::info!("Wrote {}", output_path.display());
        Ok(())
    }
}
