use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::error::BlurError;
use crate::shared::region::Region;

/// An owned image: contiguous channel-interleaved bytes in row-major order.
///
/// Used as the backing store of the in-memory host and as the decoded form
/// of image files. The blur engine itself never sees a `Raster`, only the
/// pixel-store traits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Raster {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Checked constructor for data coming from outside the crate.
    pub fn try_new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self, BlurError> {
        if channels == 0 {
            return Err(BlurError::config("raster must have at least one channel"));
        }
        let expected = (width as usize) * (height as usize) * (channels as usize);
        BlurError::check_len(expected, data.len())?;
        Ok(Self::new(data, width, height, channels))
    }

    /// A raster with every byte set to `value`.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Self {
        let len = (width as usize) * (height as usize) * (channels as usize);
        Self::new(vec![value; len], width, height, channels)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn extent(&self) -> Region {
        Region::full(self.width, self.height)
    }

    /// Bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        &self.data[offset..offset + c]
    }

    /// Copies `region` into `out`, row by row.
    pub fn read_rect(&self, region: &Region, out: &mut [u8]) -> Result<(), BlurError> {
        self.check_inside(region)?;
        let c = self.channels as usize;
        BlurError::check_len(region.byte_len(c), out.len())?;

        let row_len = region.row_len(c);
        for (i, dst) in out.chunks_exact_mut(row_len).enumerate() {
            let src = self.offset(region.x, region.y + i as i32);
            dst.copy_from_slice(&self.data[src..src + row_len]);
        }
        Ok(())
    }

    /// Overwrites `region` with the rows in `buf`.
    pub fn write_rect(&mut self, region: &Region, buf: &[u8]) -> Result<(), BlurError> {
        self.check_inside(region)?;
        let c = self.channels as usize;
        BlurError::check_len(region.byte_len(c), buf.len())?;

        let row_len = region.row_len(c);
        for (i, src) in buf.chunks_exact(row_len).enumerate() {
            let dst = self.offset(region.x, region.y + i as i32);
            self.data[dst..dst + row_len].copy_from_slice(src);
        }
        Ok(())
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Raster data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Raster data length must match dimensions")
    }

    fn check_inside(&self, region: &Region) -> Result<(), BlurError> {
        if self.extent().contains(region) {
            Ok(())
        } else {
            Err(BlurError::io(format!(
                "region {region} lies outside the {}x{} image",
                self.width, self.height
            )))
        }
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
