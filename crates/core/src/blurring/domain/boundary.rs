/// Replicate-edge clamping: pulls `index` into `[low, high_inclusive]`.
///
/// Total for any input, including `low > high_inclusive` (returns `low`).
/// Rows and columns are clamped independently, so a corner neighborhood
/// repeats the corner pixel along both axes.
pub fn clamp(index: i64, low: i64, high_inclusive: i64) -> i64 {
    index.min(high_inclusive).max(low)
}

/// Clamps a possibly-negative offset into `0..len`. `len` must be non-zero.
pub fn clamp_to_len(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    clamp(index, 0, len as i64 - 1) as usize
}
