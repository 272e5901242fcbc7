use crate::shared::constants::DEFAULT_PROGRESS_INTERVAL;
use crate::shared::region::Region;

type ProgressFn<'a> = Box<dyn FnMut(f64) + 'a>;

/// Throttled progress callback for one blur run.
///
/// Fractions are clamped to `[0, 1]` and never go backwards: a fraction
/// lower than the last one reported is dropped.
pub struct ProgressReporter<'a> {
    callback: ProgressFn<'a>,
    interval: usize,
    last: Option<f64>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(interval: usize, callback: impl FnMut(f64) + 'a) -> Self {
        Self {
            callback: Box::new(callback),
            interval: interval.max(1),
            last: None,
        }
    }

    /// Discards every event.
    pub fn silent() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL, |_| {})
    }

    /// Emits progress through `log::info!`.
    pub fn logging(interval: usize) -> Self {
        Self::new(interval, |fraction| {
            log::info!("Blurring: {:.1}%", fraction * 100.0);
        })
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn last_reported(&self) -> Option<f64> {
        self.last
    }

    /// Called before image row `row` of `region` is blurred; reports
    /// `(row - region.y) / region.height` on rows that are a multiple of
    /// the interval.
    pub fn on_row(&mut self, row: i32, region: &Region) {
        if (row as i64).rem_euclid(self.interval as i64) == 0 && region.height > 0 {
            let done = (row - region.y) as f64;
            self.report(done / region.height as f64);
        }
    }

    /// Reports `completed / total` every `interval` completed rows.
    pub fn on_rows_completed(&mut self, completed: usize, total: usize) {
        if total > 0 && completed % self.interval == 0 {
            self.report(completed as f64 / total as f64);
        }
    }

    /// Reports completion after a successful commit.
    pub fn finish(&mut self) {
        self.report(1.0);
    }

    fn report(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        if self.last.is_some_and(|last| fraction < last) {
            return;
        }
        self.last = Some(fraction);
        (self.callback)(fraction);
    }
}

impl Default for ProgressReporter<'_> {
    fn default() -> Self {
        Self::silent()
    }
}
