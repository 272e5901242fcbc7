use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::blurring::domain::pixel_store::{PixelSink, PixelSource};
use crate::blurring::domain::progress::ProgressReporter;
use crate::blurring::domain::row_executor::RowExecutor;
use crate::blurring::domain::snapshot::RegionSnapshot;
use crate::shared::constants::MAX_RADIUS;
use crate::shared::error::BlurError;
use crate::shared::region::Region;

/// Lifecycle of one [`BlurEngine`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Committed,
    Failed,
}

/// Box-blurs one region of a store and commits the result atomically.
///
/// The region is read once into a private snapshot, every output row is
/// computed from that snapshot into a staging buffer, and the buffer is
/// handed to the sink in a single stage/commit. Any failure or
/// cancellation discards staged writes, so the store is either fully
/// updated or untouched.
pub struct BlurEngine {
    executor: Box<dyn RowExecutor>,
    cancelled: Arc<AtomicBool>,
    state: EngineState,
}

impl BlurEngine {
    pub fn new(executor: Box<dyn RowExecutor>) -> Self {
        Self {
            executor,
            cancelled: Arc::new(AtomicBool::new(false)),
            state: EngineState::Idle,
        }
    }

    /// Shares an externally owned cancellation flag.
    pub fn with_cancellation(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Setting the returned flag aborts a run at the next row boundary.
    pub fn cancellation(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns a finished engine to `Idle` so it can run again.
    ///
    /// Also clears the cancellation flag, including a shared one passed to
    /// [`Self::with_cancellation`].
    pub fn reset(&mut self) {
        self.state = EngineState::Idle;
        self.cancelled.store(false, Ordering::Relaxed);
    }

    pub fn run(
        &mut self,
        source: &dyn PixelSource,
        sink: &mut dyn PixelSink,
        region: Region,
        radius: u32,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<(), BlurError> {
        if self.state != EngineState::Idle {
            return Err(BlurError::config(format!(
                "engine is {:?}; reset it before running again",
                self.state
            )));
        }
        validate(source, sink, &region, radius)?;

        self.state = EngineState::Running;
        log::info!(
            "Blurring {region} (radius={radius}, channels={}, executor={})",
            source.channels(),
            self.executor.name()
        );

        match self.scan_and_commit(source, sink, region, radius, progress) {
            Ok(()) => {
                self.state = EngineState::Committed;
                progress.finish();
                log::info!("Committed blurred region {region}");
                Ok(())
            }
            Err(e) => {
                sink.discard();
                self.state = EngineState::Failed;
                log::warn!("Blur of {region} aborted, store left unchanged: {e}");
                Err(e)
            }
        }
    }

    fn scan_and_commit(
        &self,
        source: &dyn PixelSource,
        sink: &mut dyn PixelSink,
        region: Region,
        radius: u32,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<(), BlurError> {
        let snapshot = RegionSnapshot::capture(source, region)?;
        log::debug!(
            "Captured {} byte snapshot of {region}",
            snapshot.data().len()
        );

        let mut output = vec![0u8; snapshot.data().len()];
        self.executor
            .execute(&snapshot, radius, &mut output, progress, &self.cancelled)?;
        drop(snapshot);

        if self.cancelled.load(Ordering::Relaxed) {
            return Err(BlurError::Cancelled);
        }
        sink.stage(&region, &output)?;
        sink.commit()
    }
}

/// Rejects a run before any I/O happens.
pub fn validate(
    source: &dyn PixelSource,
    sink: &dyn PixelSink,
    region: &Region,
    radius: u32,
) -> Result<(), BlurError> {
    if radius > MAX_RADIUS {
        return Err(BlurError::config(format!(
            "radius must be at most {MAX_RADIUS}, got {radius}"
        )));
    }
    if region.is_empty() {
        return Err(BlurError::config(format!("region {region} is empty")));
    }
    let extent = source.extent();
    if !extent.contains(region) {
        return Err(BlurError::config(format!(
            "region {region} is not inside the image extent {extent}"
        )));
    }
    if source.channels() == 0 {
        return Err(BlurError::config("source has no channels"));
    }
    if source.channels() != sink.channels() {
        return Err(BlurError::config(format!(
            "source has {} channels but sink has {}",
            source.channels(),
            sink.channels()
        )));
    }
    Ok(())
}
