use std::sync::atomic::{AtomicBool, Ordering};

use crate::blurring::domain::progress::ProgressReporter;
use crate::blurring::domain::row_executor::{blur_rows, RowExecutor};
use crate::blurring::domain::snapshot::RegionSnapshot;
use crate::shared::error::BlurError;

/// Blurs rows one after another, top to bottom, on the calling thread.
///
/// Progress is reported per image row: `(row - region.y) / region.height`
/// on every row that is a multiple of the reporter's interval.
pub struct SequentialRowExecutor;

impl SequentialRowExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialRowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowExecutor for SequentialRowExecutor {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(
        &self,
        snapshot: &RegionSnapshot,
        radius: u32,
        output: &mut [u8],
        progress: &mut ProgressReporter<'_>,
        cancelled: &AtomicBool,
    ) -> Result<(), BlurError> {
        let region = snapshot.region();
        blur_rows(
            snapshot,
            radius,
            region.y,
            output,
            &|| cancelled.load(Ordering::Relaxed),
            &mut |row: i32| progress.on_row(row, &region),
        )
    }
}
