use crate::blurring::domain::boundary::clamp_to_len;
use crate::blurring::domain::pixel_store::PixelSource;
use crate::blurring::domain::row_window::RowWindow;

/// Averages each channel over the `(2r+1) × (2r+1)` neighborhood of a pixel.
///
/// Columns are clamped to the region's width; rows were already clamped by
/// the [`RowWindow`]. The average truncates toward zero, matching unsigned
/// byte division.
pub struct KernelAccumulator {
    radius: i64,
    width: usize,
    channels: usize,
    divisor: u64,
    column_sums: Vec<u64>,
}

impl KernelAccumulator {
    pub fn new(radius: u32, width: usize, channels: usize) -> Self {
        let side = 2 * radius as u64 + 1;
        Self {
            radius: radius as i64,
            width,
            channels,
            divisor: side * side,
            column_sums: vec![0; width * channels],
        }
    }

    /// Averaged pixel at `col`, summing the full neighborhood directly.
    pub fn compute<S: PixelSource + ?Sized>(
        &self,
        window: &RowWindow<'_, S>,
        col: usize,
        out: &mut [u8],
    ) {
        let c = self.channels;
        for (ch, value) in out.iter_mut().enumerate().take(c) {
            let mut sum = 0u64;
            for row in window.rows() {
                for dc in -self.radius..=self.radius {
                    let x = clamp_to_len(col as i64 + dc, self.width);
                    sum += row[x * c + ch] as u64;
                }
            }
            *value = (sum / self.divisor) as u8;
        }
    }

    /// Averages a whole output row.
    ///
    /// Sums each column vertically once, then slides a horizontal running
    /// sum along the row: the entering column is added and the leaving one
    /// subtracted. Sums and truncation are identical to [`Self::compute`].
    pub fn compute_row<S: PixelSource + ?Sized>(
        &mut self,
        window: &RowWindow<'_, S>,
        out: &mut [u8],
    ) {
        self.column_sums.fill(0);
        for row in window.rows() {
            for (sum, &v) in self.column_sums.iter_mut().zip(row.iter()) {
                *sum += v as u64;
            }
        }

        let c = self.channels;
        let r = self.radius;
        let width = self.width;
        let sums = &self.column_sums;
        let column = |x: i64, ch: usize| sums[clamp_to_len(x, width) * c + ch];

        for ch in 0..c {
            let mut sum: u64 = (-r..=r).map(|dc| column(dc, ch)).sum();
            for col in 0..width {
                out[col * c + ch] = (sum / self.divisor) as u8;
                let col = col as i64;
                sum = sum + column(col + r + 1, ch) - column(col - r, ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::infrastructure::memory_image_store::MemoryImageStore;
    use crate::shared::raster::Raster;
    use crate::shared::region::Region;

    fn three_by_three() -> MemoryImageStore {
        MemoryImageStore::new(Raster::new(
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90],
            3,
            3,
            1,
        ))
    }

    #[test]
    fn test_center_pixel_is_mean_of_all_nine() {
        let store = three_by_three();
        let mut window = RowWindow::new(&store, Region::full(3, 3), 1);
        window.refresh(1).unwrap();
        let acc = KernelAccumulator::new(1, 3, 1);
        let mut out = [0u8; 1];
        acc.compute(&window, 1, &mut out);
        assert_eq!(out, [50]); // 450 / 9
    }

    #[test]
    fn test_corner_pixel_double_clamps() {
        // {10,10,20,10,10,20,40,40,50} = 220 → 220 / 9 = 24 (truncated)
        let store = three_by_three();
        let mut window = RowWindow::new(&store, Region::full(3, 3), 1);
        window.refresh(0).unwrap();
        let acc = KernelAccumulator::new(1, 3, 1);
        let mut out = [0u8; 1];
        acc.compute(&window, 0, &mut out);
        assert_eq!(out, [24]);
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // 3x1 row [0, 0, 8], radius 1, column 2: rows are clamped copies.
        // Neighborhood sum = 3 * (0 + 8 + 8) = 48 → 48 / 9 = 5 (5.33)
        let store = MemoryImageStore::new(Raster::new(vec![0, 0, 8], 3, 1, 1));
        let mut window = RowWindow::new(&store, Region::full(3, 1), 1);
        window.refresh(0).unwrap();
        let acc = KernelAccumulator::new(1, 3, 1);
        let mut out = [0u8; 1];
        acc.compute(&window, 2, &mut out);
        assert_eq!(out, [5]);
    }

    #[test]
    fn test_channels_are_independent() {
        // 2x1 RGB: red pixel then blue pixel
        let store = MemoryImageStore::new(Raster::new(vec![255, 0, 0, 0, 0, 255], 2, 1, 3));
        let mut window = RowWindow::new(&store, Region::full(2, 1), 0);
        window.refresh(0).unwrap();
        let acc = KernelAccumulator::new(0, 2, 3);
        let mut out = [0u8; 3];
        acc.compute(&window, 1, &mut out);
        assert_eq!(out, [0, 0, 255]);
    }

    #[test]
    fn test_compute_row_matches_compute() {
        let data: Vec<u8> = (0..7 * 5 * 2).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let store = MemoryImageStore::new(Raster::new(data, 7, 5, 2));
        let region = Region::full(7, 5);
        for radius in 0..4 {
            let mut window = RowWindow::new(&store, region, radius);
            let mut acc = KernelAccumulator::new(radius, 7, 2);
            for y in 0..5 {
                window.refresh(y).unwrap();
                let mut row = vec![0u8; 14];
                acc.compute_row(&window, &mut row);
                for col in 0..7 {
                    let mut px = [0u8; 2];
                    acc.compute(&window, col, &mut px);
                    assert_eq!(&row[col * 2..col * 2 + 2], &px, "r={radius} y={y} col={col}");
                }
            }
        }
    }

    #[test]
    fn test_full_white_neighborhood_does_not_overflow() {
        let store = MemoryImageStore::new(Raster::filled(4, 4, 1, 255));
        let mut window = RowWindow::new(&store, Region::full(4, 4), 200);
        window.refresh(2).unwrap();
        let mut acc = KernelAccumulator::new(200, 4, 1);
        let mut row = vec![0u8; 4];
        acc.compute_row(&window, &mut row);
        assert_eq!(row, vec![255; 4]);
    }
}
