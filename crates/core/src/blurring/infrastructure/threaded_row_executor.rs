use std::sync::atomic::{AtomicBool, Ordering};

use crate::blurring::domain::pixel_store::PixelSource;
use crate::blurring::domain::progress::ProgressReporter;
use crate::blurring::domain::row_executor::{blur_rows, RowExecutor};
use crate::blurring::domain::snapshot::RegionSnapshot;
use crate::shared::error::BlurError;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Blurs contiguous bands of rows on scoped worker threads.
///
/// Layout: `workers [band → output slice] → main [progress]`
///
/// Every worker reads from the shared immutable snapshot and writes into
/// its own disjoint slice of the output, so no locking is needed. Workers
/// signal each finished row over a bounded channel; the calling thread
/// turns the running count into progress fractions.
pub struct ThreadedRowExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedRowExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedRowExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl RowExecutor for ThreadedRowExecutor {
    fn name(&self) -> &'static str {
        "threaded"
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
        let total_rows = region.height.max(0) as usize;
        let row_len = region.row_len(snapshot.channels() as usize);
        if total_rows == 0 || row_len == 0 {
            return Ok(());
        }

        let workers = self.workers.min(total_rows);
        let band_rows = total_rows.div_ceil(workers);
        log::debug!(
            "Splitting {total_rows} rows into bands of {band_rows} across {workers} workers"
        );

        let failed = AtomicBool::new(false);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(self.channel_capacity);

        let results = std::thread::scope(|scope| {
            let handles: Vec<_> = output
                .chunks_mut(band_rows * row_len)
                .enumerate()
                .map(|(i, band)| {
                    let done_tx = done_tx.clone();
                    let failed = &failed;
                    let first_row = region.y + (i * band_rows) as i32;
                    scope.spawn(move || {
                        let stop =
                            || cancelled.load(Ordering::Relaxed) || failed.load(Ordering::Relaxed);
                        let result = blur_rows(
                            snapshot,
                            radius,
                            first_row,
                            band,
                            &stop,
                            &mut |_row: i32| {
                                let _ = done_tx.send(());
                            },
                        );
                        if result.is_err() {
                            failed.store(true, Ordering::Relaxed);
                        }
                        result
                    })
                })
                .collect();
            drop(done_tx);

            let mut completed = 0;
            for () in done_rx.iter() {
                completed += 1;
                progress.on_rows_completed(completed, total_rows);
            }

            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(BlurError::io("row worker panicked")))
                })
                .collect::<Vec<_>>()
        });

        first_error(results)
    }
}

/// Prefers a real failure over the cancellations it caused in sibling workers.
fn first_error(results: Vec<Result<(), BlurError>>) -> Result<(), BlurError> {
    let mut cancelled = false;
    for result in results {
        match result {
            Ok(()) => {}
            Err(BlurError::Cancelled) => cancelled = true,
            Err(e) => return Err(e),
        }
    }
    if cancelled {
        Err(BlurError::Cancelled)
    } else {
        Ok(())
    }
}
