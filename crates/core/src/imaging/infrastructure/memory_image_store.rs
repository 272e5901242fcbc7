use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::blurring::domain::pixel_store::{PixelSink, PixelSource};
use crate::shared::error::BlurError;
use crate::shared::raster::Raster;
use crate::shared::region::Region;

struct StoreState {
    raster: Raster,
    generation: u64,
    closed: bool,
}

/// In-memory image host.
///
/// Cloning yields another handle to the same pixels. Reads go straight to
/// the raster; writes go through a [`ShadowBuffer`] and only land on
/// commit. Every committed mutation bumps the store's generation, which is
/// how a shadow detects that the store changed underneath it.
#[derive(Clone)]
pub struct MemoryImageStore {
    state: Arc<RwLock<StoreState>>,
    extent: Region,
    channels: u8,
}

impl MemoryImageStore {
    pub fn new(raster: Raster) -> Self {
        let extent = raster.extent();
        let channels = raster.channels();
        Self {
            state: Arc::new(RwLock::new(StoreState {
                raster,
                generation: 0,
                closed: false,
            })),
            extent,
            channels,
        }
    }

    /// Opens a write surface bound to the current generation.
    pub fn shadow(&self) -> ShadowBuffer {
        ShadowBuffer {
            state: self.state.clone(),
            extent: self.extent,
            channels: self.channels,
            base_generation: self.generation(),
            staged: Vec::new(),
        }
    }

    /// Number of mutations committed so far.
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Copy of the current pixels; available even after [`Self::close`].
    pub fn snapshot(&self) -> Result<Raster, BlurError> {
        Ok(self.read_state()?.raster.clone())
    }

    /// Writes directly, bypassing any shadow; open shadows become stale.
    pub fn write_pixels(&self, region: &Region, buf: &[u8]) -> Result<(), BlurError> {
        let mut state = self.write_state()?;
        if state.closed {
            return Err(BlurError::io("store is closed"));
        }
        state.raster.write_rect(region, buf)?;
        state.generation += 1;
        Ok(())
    }

    pub fn close(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>, BlurError> {
        self.state
            .read()
            .map_err(|_| BlurError::io("store lock poisoned"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>, BlurError> {
        self.state
            .write()
            .map_err(|_| BlurError::io("store lock poisoned"))
    }
}

impl PixelSource for MemoryImageStore {
    fn extent(&self) -> Region {
        self.extent
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn read_into(&self, region: &Region, out: &mut [u8]) -> Result<(), BlurError> {
        let state = self.read_state()?;
        if state.closed {
            return Err(BlurError::io("store is closed"));
        }
        state.raster.read_rect(region, out)
    }
}

/// Staged writes against a [`MemoryImageStore`].
///
/// Bound to the store generation seen when it was opened; rebinds after
/// every commit or discard.
pub struct ShadowBuffer {
    state: Arc<RwLock<StoreState>>,
    extent: Region,
    channels: u8,
    base_generation: u64,
    staged: Vec<(Region, Vec<u8>)>,
}

impl ShadowBuffer {
    #[cfg(test)]
    pub(crate) fn staged_regions(&self) -> Vec<Region> {
        self.staged.iter().map(|(r, _)| *r).collect()
    }

    fn rebase(&mut self) {
        self.base_generation = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation;
    }
}

impl PixelSink for ShadowBuffer {
    fn channels(&self) -> u8 {
        self.channels
    }

    fn stage(&mut self, region: &Region, buf: &[u8]) -> Result<(), BlurError> {
        if !self.extent.contains(region) {
            return Err(BlurError::io(format!(
                "cannot stage {region} outside the image extent {}",
                self.extent
            )));
        }
        BlurError::check_len(region.byte_len(self.channels as usize), buf.len())?;
        self.staged.push((*region, buf.to_vec()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), BlurError> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let staged = std::mem::take(&mut self.staged);

        let mut state = self
            .state
            .write()
            .map_err(|_| BlurError::io("store lock poisoned"))?;
        if state.closed {
            return Err(BlurError::io("store was closed before commit"));
        }
        if state.generation != self.base_generation {
            return Err(BlurError::io(format!(
                "store was modified concurrently (generation {} != {})",
                state.generation, self.base_generation
            )));
        }

        for (region, buf) in &staged {
            state.raster.write_rect(region, buf)?;
        }
        state.generation += 1;
        self.base_generation = state.generation;
        log::debug!(
            "Committed {} staged region(s), store generation {}",
            staged.len(),
            state.generation
        );
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
        self.rebase();
    }
}
