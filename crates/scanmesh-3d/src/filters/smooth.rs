use glam::DVec3;
use rayon::prelude::*;

use crate::neighbors::k_nearest;
use crate::pointcloud::ColoredPoint;

/// Number of neighbors averaged by [`smooth_laplacian`].
pub const SMOOTHING_NEIGHBORS: usize = 20;

/// Smooth a point cloud by pulling every point towards its neighbors.
///
/// On each iteration every point is moved to
/// `lerp(position, neighbor_mean, lambda)`, where `neighbor_mean` is the mean
/// position of its [`SMOOTHING_NEIGHBORS`] nearest neighbors in the output of
/// the previous iteration. Points without neighbors stay in place. Colors and
/// normals pass through.
///
/// # Arguments
///
/// * `points` - The input point cloud.
/// * `iterations` - The number of smoothing passes.
/// * `lambda` - The interpolation factor, `0` keeps the points, `1` snaps them to the mean.
pub fn smooth_laplacian(points: &[ColoredPoint], iterations: usize, lambda: f64) -> Vec<ColoredPoint> {
    let mut current = points.to_vec();

    for i in 0..iterations {
        log::debug!("laplacian smoothing iteration: {i}");
        current = current
            .par_iter()
            .map(|point| {
                let neighbors = k_nearest(&current, point.position, SMOOTHING_NEIGHBORS);
                if neighbors.is_empty() {
                    return *point;
                }
                let mean = neighbors
                    .iter()
                    .fold(DVec3::ZERO, |acc, n| acc + current[n.index].position)
                    / neighbors.len() as f64;
                point.with_position(point.position.lerp(mean, lambda))
            })
            .collect();
    }

    current
}
