use crate::shared::error::BlurError;
use crate::shared::region::Region;

/// Read access to an image-like backing store.
///
/// Buffers are row-major and channel-interleaved, one byte per channel.
pub trait PixelSource: Send {
    /// Addressable extent of the store.
    fn extent(&self) -> Region;

    fn channels(&self) -> u8;

    /// Fills `out` with exactly `region.width * region.height * channels` bytes.
    ///
    /// Fails with `Io` when `region` lies outside [`Self::extent`] and with
    /// `Shape` when `out` has the wrong length.
    fn read_into(&self, region: &Region, out: &mut [u8]) -> Result<(), BlurError>;

    fn read(&self, region: &Region) -> Result<Vec<u8>, BlurError> {
        let mut out = vec![0u8; region.byte_len(self.channels() as usize)];
        self.read_into(region, &mut out)?;
        Ok(out)
    }
}

/// Two-phase write access to a backing store.
///
/// Staged writes stay invisible until [`PixelSink::commit`] applies all of
/// them in one step. A failed commit leaves the store untouched.
pub trait PixelSink: Send {
    fn channels(&self) -> u8;

    /// Buffers `buf` as the new content of `region`.
    fn stage(&mut self, region: &Region, buf: &[u8]) -> Result<(), BlurError>;

    /// Makes every staged write visible at once.
    ///
    /// Fails with `Io` when the store was closed or mutated since staging began.
    fn commit(&mut self) -> Result<(), BlurError>;

    /// Drops staged writes without applying them.
    fn discard(&mut self);
}
