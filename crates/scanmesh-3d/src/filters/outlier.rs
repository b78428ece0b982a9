use rayon::prelude::*;

use crate::neighbors::k_nearest;
use crate::pointcloud::ColoredPoint;

/// Compute, for every point, the mean distance to its `k` nearest neighbors.
///
/// A point without any eligible neighbor gets a mean distance of zero.
pub fn mean_neighbor_distances(points: &[ColoredPoint], k: usize) -> Vec<f64> {
    points
        .par_iter()
        .map(|point| {
            let neighbors = k_nearest(points, point.position, k);
            if neighbors.is_empty() {
                return 0.0;
            }
            neighbors.iter().map(|n| n.distance).sum::<f64>() / neighbors.len() as f64
        })
        .collect()
}

/// Remove points whose neighborhood is statistically sparser than the rest.
///
/// The mean distance of every point to its `mean_k` nearest neighbors is
/// computed, then the mean and population standard deviation of those values
/// over the whole cloud. Points whose mean distance is at most
/// `mean + std_ratio * stddev` are kept, in their original order.
///
/// Clouds with fewer than `mean_k` points are returned unchanged.
///
/// # Arguments
///
/// * `points` - The input point cloud.
/// * `mean_k` - The number of neighbors used for the mean distance.
/// * `std_ratio` - The standard deviation multiplier of the threshold.
pub fn remove_statistical_outliers(
    points: &[ColoredPoint],
    mean_k: usize,
    std_ratio: f64,
) -> Vec<ColoredPoint> {
    if points.len() < mean_k || points.is_empty() {
        return points.to_vec();
    }

    let distances = mean_neighbor_distances(points, mean_k);
    let threshold = outlier_threshold(&distances, std_ratio);

    let kept = points
        .iter()
        .zip(distances.iter())
        .filter(|(_, &d)| d <= threshold)
        .map(|(p, _)| *p)
        .collect::<Vec<_>>();

    log::debug!(
        "outlier removal (k = {mean_k}, ratio = {std_ratio}): threshold {threshold:.6}, {} -> {} points",
        points.len(),
        kept.len()
    );

    kept
}

/// Compute `mean + std_ratio * stddev` of a set of distances, using the
/// population standard deviation.
pub fn outlier_threshold(distances: &[f64], std_ratio: f64) -> f64 {
    let n = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    mean + std_ratio * variance.sqrt()
}
