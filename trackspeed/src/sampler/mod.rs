//! Track sampling.
//!
//! Selects a representative subset of track indices to query so that the
//! number of provider lookups grows with track length divided by the stride
//! rather than with every GPS sample.

use crate::track::TrackPoint;

/// Default distance in indices between sampled points.
pub const DEFAULT_SAMPLE_STRIDE: usize = 10;

/// Sample a track using [`DEFAULT_SAMPLE_STRIDE`].
///
/// See [`sample_with_stride`].
pub fn sample(points: &[TrackPoint]) -> Vec<usize> {
    sample_with_stride(points, DEFAULT_SAMPLE_STRIDE)
}

/// Select the indices of `points` to send to the provider.
///
/// Always includes the first and last index plus every index divisible by
/// `stride`, in strictly increasing order. Points without a GPS fix are
/// skipped. A stride of zero behaves like one.
pub fn sample_with_stride(points: &[TrackPoint], stride: usize) -> Vec<usize> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let stride = stride.max(1);
    let last = n - 1;

    (0..n)
        .filter(|&i| i == 0 || i == last || i % stride == 0)
        .filter(|&i| points[i].has_fix())
        .collect()
}
