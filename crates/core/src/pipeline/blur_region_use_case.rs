use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::blurring::domain::blur_engine::BlurEngine;
use crate::blurring::domain::pixel_store::{PixelSink, PixelSource};
use crate::blurring::domain::progress::ProgressReporter;
use crate::blurring::infrastructure::executor_factory::create_executor;
use crate::shared::error::BlurError;
use crate::shared::region::Region;
use crate::shared::settings::BlurSettings;

/// Blurs one region of a store: validate → snapshot → scan → stage → commit.
///
/// A fresh engine and progress reporter are built for every call; nothing
/// survives between invocations except the caller's cancellation flag.
pub struct BlurRegionUseCase {
    settings: BlurSettings,
    cancelled: Arc<AtomicBool>,
}

impl BlurRegionUseCase {
    pub fn new(settings: BlurSettings, cancelled: Option<Arc<AtomicBool>>) -> Self {
        Self {
            settings,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// `region = None` blurs the full extent of `source`.
    pub fn execute(
        &self,
        source: &dyn PixelSource,
        sink: &mut dyn PixelSink,
        region: Option<Region>,
        on_progress: impl FnMut(f64),
    ) -> Result<(), BlurError> {
        self.settings.validate()?;
        let region = region.unwrap_or_else(|| source.extent());

        let mut engine = BlurEngine::new(create_executor(self.settings.threads))
            .with_cancellation(self.cancelled.clone());
        let mut progress = ProgressReporter::new(self.settings.progress_interval, on_progress);
        engine.run(source, sink, region, self.settings.radius, &mut progress)
    }
}

/// Host entry point: box-blurs `region` (or the whole image) with the
/// given radius and commits the result atomically through `sink`.
///
/// `channels` must match the source's channel count.
pub fn invoke(
    source: &dyn PixelSource,
    sink: &mut dyn PixelSink,
    region: Option<Region>,
    radius: u32,
    channels: u8,
    on_progress: impl FnMut(f64),
) -> Result<(), BlurError> {
    if channels != source.channels() {
        return Err(BlurError::config(format!(
            "caller declared {channels} channels but the source has {}",
            source.channels()
        )));
    }
    let settings = BlurSettings {
        radius,
        ..BlurSettings::default()
    };
    BlurRegionUseCase::new(settings, None).execute(source, sink, region, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::infrastructure::memory_image_store::MemoryImageStore;
    use crate::shared::constants::MAX_RADIUS;
    use crate::shared::raster::Raster;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    // --- Helpers ---

    fn noisy_raster(width: u32, height: u32, channels: u8) -> Raster {
        let len = (width * height * channels as u32) as usize;
        let data = (0..len).map(|i| ((i * 97 + 13) % 256) as u8).collect();
        Raster::new(data, width, height, channels)
    }

    fn blur(raster: Raster, region: Option<Region>, radius: u32) -> Raster {
        let store = MemoryImageStore::new(raster);
        let channels = store.channels();
        let mut shadow = store.shadow();
        invoke(&store, &mut shadow, region, radius, channels, |_| {}).unwrap();
        store.snapshot().unwrap()
    }

    fn three_by_three() -> Raster {
        Raster::new(vec![10, 20, 30, 40, 50, 60, 70, 80, 90], 3, 3, 1)
    }

    // --- Known values ---

    #[test]
    fn test_three_by_three_radius_one() {
        let out = blur(three_by_three(), None, 1);
        assert_eq!(out.pixel(1, 1), &[50]); // 450 / 9
        assert_eq!(out.pixel(0, 0), &[24]); // 220 / 9
        assert_eq!(out.data(), &[24, 30, 36, 43, 50, 56, 63, 70, 76]);
    }

    #[rstest]
    #[case::gray(1)]
    #[case::rgb(3)]
    #[case::rgba(4)]
    fn test_radius_zero_is_identity(#[case] channels: u8) {
        let input = noisy_raster(9, 7, channels);
        assert_eq!(blur(input.clone(), None, 0), input);
    }

    #[test]
    fn test_radius_beyond_image_weights_by_clamping() {
        // 2x2, r=5: each axis sees its own row/column 6 times and the other 5 times.
        // (0,0) = (36*10 + 30*20 + 30*30 + 25*40) / 121 = 2860 / 121 = 23
        let input = Raster::new(vec![10, 20, 30, 40], 2, 2, 1);
        let out = blur(input, None, 5);
        assert_eq!(out.data(), &[23, 24, 25, 26]);
    }

    #[test]
    fn test_radius_beyond_image_on_uniform_image_is_that_value() {
        let out = blur(Raster::filled(2, 2, 3, 77), None, 5);
        assert_eq!(out, Raster::filled(2, 2, 3, 77));
    }

    #[test]
    fn test_commit_failure_leaves_store_unchanged() {
        let store = MemoryImageStore::new(noisy_raster(6, 6, 3));
        let before = store.snapshot().unwrap();
        let mut shadow = store.shadow();

        // Rewrite one pixel with its own bytes mid-scan: the content is
        // unchanged but the store generation moves, so commit must fail.
        let meddler = store.clone();
        let pixel = before.pixel(0, 0).to_vec();
        let result = invoke(&store, &mut shadow, None, 1, 3, move |_| {
            meddler
                .write_pixels(&Region::new(0, 0, 1, 1), &pixel)
                .unwrap();
        });

        assert!(matches!(result, Err(BlurError::Io(_))));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    // --- Properties ---

    #[rstest]
    #[case::radius_two(2, 5)]
    #[case::radius_three(3, 8)]
    #[case::radius_one(1, 3)]
    fn test_corner_pixel_counted_r_plus_one_squared_times(#[case] radius: u32, #[case] size: u32) {
        let mut input = Raster::filled(size, size, 1, 0);
        input.data_mut()[0] = 255;
        let out = blur(input, None, radius);
        let side = 2 * radius + 1;
        let expected = 255 * (radius + 1) * (radius + 1) / (side * side);
        assert_eq!(out.pixel(0, 0), &[expected as u8]);
    }

    #[test]
    fn test_output_within_neighborhood_min_max() {
        let radius = 2i64;
        let input = noisy_raster(11, 9, 3);
        let out = blur(input.clone(), None, radius as u32);

        let src = input.as_ndarray();
        let dst = out.as_ndarray();
        let (h, w, c) = src.dim();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                for ch in 0..c {
                    let mut lo = u8::MAX;
                    let mut hi = u8::MIN;
                    for dy in -radius..=radius {
                        for dx in -radius..=radius {
                            let sy = (y + dy).clamp(0, h as i64 - 1) as usize;
                            let sx = (x + dx).clamp(0, w as i64 - 1) as usize;
                            lo = lo.min(src[[sy, sx, ch]]);
                            hi = hi.max(src[[sy, sx, ch]]);
                        }
                    }
                    let v = dst[[y as usize, x as usize, ch]];
                    assert!(lo <= v && v <= hi, "({x},{y},{ch}) = {v} not in [{lo},{hi}]");
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let input = noisy_raster(13, 10, 4);
        let a = blur(input.clone(), None, 3);
        let b = blur(input, None, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sub_region_clamps_to_region_and_leaves_outside_untouched() {
        // 6x6 white image with a black 2x2 square at (2,2)
        let mut input = Raster::filled(6, 6, 1, 255);
        let region = Region::new(2, 2, 2, 2);
        input.write_rect(&region, &[0; 4]).unwrap();

        let out = blur(input.clone(), Some(region), 2);

        // Neighborhoods clamp to the region, so no white bleeds in.
        for y in 2..4 {
            for x in 2..4 {
                assert_eq!(out.pixel(x, y), &[0]);
            }
        }
        for y in 0..6 {
            for x in 0..6 {
                if !(2..4).contains(&x) || !(2..4).contains(&y) {
                    assert_eq!(out.pixel(x, y), input.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_progress_non_decreasing_and_ends_at_one() {
        let store = MemoryImageStore::new(noisy_raster(4, 250, 1));
        let mut shadow = store.shadow();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        invoke(&store, &mut shadow, None, 1, 1, move |f| {
            sink.lock().unwrap().push(f)
        })
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4); // rows 0, 100, 200, then commit
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_relative_eq!(seen[1], 0.4);
        assert_relative_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn test_progress_callback_may_use_rc_state() {
        let store = MemoryImageStore::new(noisy_raster(3, 3, 1));
        let mut shadow = store.shadow();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        invoke(&store, &mut shadow, None, 1, 1, move |_| {
            counter.set(counter.get() + 1)
        })
        .unwrap();
        assert_eq!(calls.get(), 2); // row 0, then commit
    }

    #[test]
    fn test_threaded_settings_match_sequential() {
        let input = noisy_raster(31, 23, 3);
        let expected = blur(input.clone(), None, 4);

        let store = MemoryImageStore::new(input);
        let mut shadow = store.shadow();
        let settings = BlurSettings {
            radius: 4,
            threads: 4,
            ..BlurSettings::default()
        };
        BlurRegionUseCase::new(settings, None)
            .execute(&store, &mut shadow, None, |_| {})
            .unwrap();
        assert_eq!(store.snapshot().unwrap(), expected);
    }

    // --- Configuration errors ---

    #[test]
    fn test_channel_mismatch_rejected_before_io() {
        let store = MemoryImageStore::new(noisy_raster(4, 4, 3));
        let mut shadow = store.shadow();
        let result = invoke(&store, &mut shadow, None, 1, 4, |_| {});
        assert!(matches!(result, Err(BlurError::Config(_))));
        assert_eq!(store.generation(), 0);
    }

    #[rstest]
    #[case::empty_region(Some(Region::new(0, 0, 0, 3)), 1)]
    #[case::outside_image(Some(Region::new(2, 2, 4, 4)), 1)]
    #[case::radius_too_large(None, MAX_RADIUS + 1)]
    fn test_invalid_input_is_config_error(#[case] region: Option<Region>, #[case] radius: u32) {
        let store = MemoryImageStore::new(noisy_raster(4, 4, 1));
        let before = store.snapshot().unwrap();
        let mut shadow = store.shadow();
        let result = invoke(&store, &mut shadow, region, radius, 1, |_| {});
        assert!(matches!(result, Err(BlurError::Config(_))));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_shared_cancellation_flag() {
        let store = MemoryImageStore::new(noisy_raster(4, 4, 1));
        let before = store.snapshot().unwrap();
        let mut shadow = store.shadow();
        let cancelled = Arc::new(AtomicBool::new(true));
        let result = BlurRegionUseCase::new(BlurSettings::default(), Some(cancelled.clone()))
            .execute(&store, &mut shadow, None, |_| {});
        assert_eq!(result, Err(BlurError::Cancelled));
        assert!(cancelled.load(Ordering::Relaxed));
        assert_eq!(store.snapshot().unwrap(), before);
    }
}
