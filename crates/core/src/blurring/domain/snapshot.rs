use crate::blurring::domain::pixel_store::PixelSource;
use crate::shared::error::BlurError;
use crate::shared::raster::Raster;
use crate::shared::region::Region;

/// Private, immutable copy of one region of a store, addressed in the
/// store's coordinates.
///
/// The engine reads the region once through the live source and serves
/// every row-window refresh from here, so no row is ever read after it
/// has been blurred, and rows can be computed from any thread.
#[derive(Debug)]
pub struct RegionSnapshot {
    region: Region,
    pixels: Raster,
}

impl RegionSnapshot {
    pub fn capture(source: &dyn PixelSource, region: Region) -> Result<Self, BlurError> {
        let channels = source.channels();
        let data = source.read(&region)?;
        let pixels = Raster::try_new(data, region.width as u32, region.height as u32, channels)?;
        Ok(Self { region, pixels })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn data(&self) -> &[u8] {
        self.pixels.data()
    }
}

impl PixelSource for RegionSnapshot {
    fn extent(&self) -> Region {
        self.region
    }

    fn channels(&self) -> u8 {
        self.pixels.channels()
    }

    fn read_into(&self, region: &Region, out: &mut [u8]) -> Result<(), BlurError> {
        let local = Region::new(
            region.x - self.region.x,
            region.y - self.region.y,
            region.width,
            region.height,
        );
        self.pixels.read_rect(&local, out)
    }
}
