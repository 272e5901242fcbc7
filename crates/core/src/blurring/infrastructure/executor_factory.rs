use crate::blurring::domain::row_executor::RowExecutor;

use super::sequential_row_executor::SequentialRowExecutor;
use super::threaded_row_executor::ThreadedRowExecutor;

/// Creates the row executor for the requested worker count.
///
/// One worker means the plain top-to-bottom scan; anything larger splits
/// the region into bands. Logs which executor is selected.
pub fn create_executor(threads: usize) -> Box<dyn RowExecutor> {
    if threads > 1 {
        log::info!("Using threaded row executor ({threads} workers)");
        Box::new(ThreadedRowExecutor::new(threads))
    } else {
        log::info!("Using sequential row executor");
        Box::new(SequentialRowExecutor::new())
    }
}
