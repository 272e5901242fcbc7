use crate::blurring::domain::boundary::clamp;
use crate::blurring::domain::pixel_store::PixelSource;
use crate::shared::error::BlurError;
use crate::shared::region::Region;

/// The `2r+1` source rows around one output row.
///
/// Slot `i` holds the row at offset `i - r` from the current center, with
/// the row index clamped into the region. Buffers are allocated once and
/// overwritten in place on every refresh.
pub struct RowWindow<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    region: Region,
    radius: usize,
    rows: Vec<Vec<u8>>,
    center: Option<i32>,
}

impl<'a, S: PixelSource + ?Sized> RowWindow<'a, S> {
    pub fn new(source: &'a S, region: Region, radius: u32) -> Self {
        let radius = radius as usize;
        let row_len = region.row_len(source.channels() as usize);
        Self {
            source,
            region,
            radius,
            rows: vec![vec![0u8; row_len]; 2 * radius + 1],
            center: None,
        }
    }

    /// Re-reads every slot for the output row `center`.
    pub fn refresh(&mut self, center: i32) -> Result<(), BlurError> {
        for (i, slot) in self.rows.iter_mut().enumerate() {
            let y = clamp_row(&self.region, center as i64 + i as i64 - self.radius as i64);
            self.source.read_into(&self.region.row(y), slot)?;
        }
        self.center = Some(center);
        Ok(())
    }

    /// Moves the window down one row, reading only the row that enters.
    ///
    /// Equivalent to `refresh(center + 1)`: clamping is monotone, so slot
    /// `i + 1` of the old center is slot `i` of the new one.
    pub fn advance(&mut self) -> Result<(), BlurError> {
        let Some(center) = self.center else {
            return self.refresh(self.region.y);
        };
        let next = center + 1;
        self.rows.rotate_left(1);
        let y = clamp_row(&self.region, next as i64 + self.radius as i64);
        let last = self.rows.len() - 1;
        self.source.read_into(&self.region.row(y), &mut self.rows[last])?;
        self.center = Some(next);
        Ok(())
    }

    /// The row at `offset` (`-r..=r`) from the center.
    pub fn row(&self, offset: i32) -> &[u8] {
        &self.rows[(offset + self.radius as i32) as usize]
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn center(&self) -> Option<i32> {
        self.center
    }

    pub fn radius(&self) -> usize {
        self.radius
    }
}

fn clamp_row(region: &Region, y: i64) -> i32 {
    clamp(y, region.y as i64, region.bottom() - 1) as i32
}
