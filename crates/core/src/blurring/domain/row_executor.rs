use std::sync::atomic::AtomicBool;

use crate::blurring::domain::kernel::KernelAccumulator;
use crate::blurring::domain::pixel_store::PixelSource;
use crate::blurring::domain::progress::ProgressReporter;
use crate::blurring::domain::row_window::RowWindow;
use crate::blurring::domain::snapshot::RegionSnapshot;
use crate::shared::error::BlurError;

/// Decides how the rows of one blur run are scheduled.
///
/// Every implementation must produce byte-identical output; they differ
/// only in threading and in how progress is derived.
pub trait RowExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Blurs every row of `snapshot` into `output`, which holds exactly
    /// `snapshot.region().byte_len(channels)` bytes.
    ///
    /// Must check `cancelled` before each row and return
    /// [`BlurError::Cancelled`] as soon as it is set.
    fn execute(
        &self,
        snapshot: &RegionSnapshot,
        radius: u32,
        output: &mut [u8],
        progress: &mut ProgressReporter<'_>,
        cancelled: &AtomicBool,
    ) -> Result<(), BlurError>;
}

/// Blurs a contiguous band of rows starting at image row `first_row`.
///
/// `output` holds whole rows; its length decides how many rows are
/// produced. `on_row` runs after each finished row.
pub fn blur_rows(
    snapshot: &RegionSnapshot,
    radius: u32,
    first_row: i32,
    output: &mut [u8],
    should_stop: &dyn Fn() -> bool,
    on_row: &mut dyn FnMut(i32),
) -> Result<(), BlurError> {
    let region = snapshot.region();
    let channels = snapshot.channels() as usize;
    let row_len = region.row_len(channels);
    if row_len == 0 {
        return Ok(());
    }

    let mut window = RowWindow::new(snapshot, region, radius);
    let mut accumulator = KernelAccumulator::new(radius, region.width as usize, channels);

    for (i, out_row) in output.chunks_exact_mut(row_len).enumerate() {
        if should_stop() {
            return Err(BlurError::Cancelled);
        }
        let row = first_row + i as i32;
        if i == 0 {
            window.refresh(row)?;
        } else {
            window.advance()?;
        }
        accumulator.compute_row(&window, out_row);
        on_row(row);
    }
    Ok(())
}
