//! Distance-bounded request batching.
//!
//! The provider rejects requests whose path is longer than 100 km. Sampled
//! indices are grouped greedily so that each batch stays under a configured
//! cumulative distance, while never emitting a single-point batch in the
//! middle of a track.

use crate::geo::distance_km;
use crate::track::TrackPoint;

/// Default cumulative path length per batch in kilometres.
///
/// Keeps headroom below the provider's 100 km per-request limit.
pub const DEFAULT_MAX_BATCH_KM: f64 = 90.0;

/// Split sampled indices into batches bounded by cumulative distance.
///
/// Walks `indices` in order, summing the leg distance from the previous
/// index in the current batch. When the next leg would push the sum over
/// `max_km` and the current batch already holds two or more indices, the
/// batch is closed and the index starts a new one. Otherwise the index is
/// appended, even if that exceeds `max_km`, so every batch makes progress.
///
/// Concatenating the returned batches yields `indices` unchanged.
///
/// # Arguments
///
/// * `indices` - Sampled indices into `points`, in track order
/// * `points` - The full track
/// * `max_km` - Maximum cumulative leg distance per batch
pub fn split_by_distance(indices: &[usize], points: &[TrackPoint], max_km: f64) -> Vec<Vec<usize>> {
    let mut batches = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut running_km = 0.0;

    for &index in indices {
        let Some(&previous) = current.last() else {
            current.push(index);
            continue;
        };

        let leg_km = distance_km(points[previous].position(), points[index].position());

        if running_km + leg_km > max_km && current.len() >= 2 {
            batches.push(std::mem::take(&mut current));
            current.push(index);
            running_km = 0.0;
        } else {
            current.push(index);
            running_km += leg_km;
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Points spaced `step_deg` degrees of latitude apart along a meridian.
    fn meridian(n: usize, step_deg: f64) -> Vec<TrackPoint> {
        (0..n)
            .map(|i| TrackPoint::new(10.0 + i as f64 * step_deg, 20.0))
            .collect()
    }

    #[test]
    fn test_empty_indices() {
        let points = meridian(3, 0.1);
        assert!(split_by_distance(&[], &points, 90.0).is_empty());
    }

    #[test]
    fn test_single_index_single_batch() {
        let points = meridian(3, 0.1);
        assert_eq!(split_by_distance(&[1], &points, 90.0), vec![vec![1]]);
    }

    #[test]
    fn test_short_track_one_batch() {
        // 0.1° ≈ 11 km per leg, 4 legs ≈ 44 km
        let points = meridian(5, 0.1);
        let batches = split_by_distance(&[0, 1, 2, 3, 4], &points, 90.0);
        assert_eq!(batches, vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_two_points_over_limit_stay_together() {
        // 2° ≈ 222 km, well over the limit
        let points = meridian(2, 2.0);
        let batches = split_by_distance(&[0, 1], &points, 90.0);
        assert_eq!(batches, vec![vec![0, 1]]);
    }

    #[test]
    fn test_splits_when_limit_exceeded() {
        // 0.5° ≈ 55.6 km per leg: [0,1] = 55.6, adding 2 → 111 > 90
        let points = meridian(5, 0.5);
        let batches = split_by_distance(&[0, 1, 2, 3, 4], &points, 90.0);
        assert_eq!(batches, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_new_batch_resets_running_distance() {
        // Second batch starts fresh at index 2, so [2,3] fits again
        let points = meridian(4, 0.5);
        let batches = split_by_distance(&[0, 1, 2, 3], &points, 90.0);
        assert_eq!(batches, vec![vec![0, 1], vec![2, 3]]);
    }

    proptest! {
        #[test]
        fn prop_concatenation_reproduces_input(
            n in 1usize..60,
            step in 0.01f64..1.5,
            max_km in 1.0f64..200.0,
        ) {
            let points = meridian(n, step);
            let indices: Vec<usize> = (0..n).collect();
            let batches = split_by_distance(&indices, &points, max_km);

            let flattened: Vec<usize> = batches.iter().flatten().copied().collect();
            prop_assert_eq!(flattened, indices);
            prop_assert!(batches.iter().all(|b| !b.is_empty()));

            // Only the final batch may be a singleton
            if batches.len() > 1 {
                for batch in &batches[..batches.len() - 1] {
                    prop_assert!(batch.len() >= 2);
                }
            }
        }
    }
}
