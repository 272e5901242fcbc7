/// Neighborhood half-width used when neither settings nor flags provide one.
pub const DEFAULT_RADIUS: u32 = 3;

/// Upper bound on the blur radius.
///
/// The row window holds `2r+1` rows of the region in memory, so the cap
/// bounds allocation; `u64` sums would not overflow until far larger radii.
pub const MAX_RADIUS: u32 = 4096;

/// Report progress every N rows.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

pub const DEFAULT_THREADS: usize = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const SETTINGS_DIR_NAME: &str = "boxblur";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
