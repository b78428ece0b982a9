use glam::{DMat3, DVec3};
use rayon::prelude::*;

use crate::neighbors::k_nearest;
use crate::pointcloud::ColoredPoint;

/// Number of power iteration steps used to approximate the normal direction.
pub const POWER_ITERATIONS: usize = 10;

/// Estimate per-point normals from the covariance of each point's neighborhood.
///
/// For every point the `neighborhood_size` nearest neighbors are gathered and
/// their covariance around the neighbor centroid is built. The normal is then
/// approximated with [`POWER_ITERATIONS`] steps of power iteration seeded at
/// `(1, 1, 1)`. Note that power iteration converges towards the dominant
/// eigenvector, so on flat patches the result lies in the tangent plane.
///
/// Points with fewer than 3 neighbors keep their normal. Clouds with fewer than
/// 3 points are returned unchanged.
///
/// # Arguments
///
/// * `points` - The input point cloud.
/// * `neighborhood_size` - The number of neighbors per point.
///
/// # Returns
///
/// A new point cloud with the estimated normals.
pub fn estimate_normals(points: &[ColoredPoint], neighborhood_size: usize) -> Vec<ColoredPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let now = std::time::Instant::now();

    let estimated = points
        .par_iter()
        .map(|point| {
            let neighbors = k_nearest(points, point.position, neighborhood_size);
            if neighbors.len() < 3 {
                return *point;
            }
            let positions = neighbors
                .iter()
                .map(|n| points[n.index].position)
                .collect::<Vec<_>>();
            point.with_normal(covariance_normal(&positions))
        })
        .collect::<Vec<_>>();

    log::debug!(
        "estimated normals for {} points (k = {neighborhood_size}) in {:?}",
        points.len(),
        now.elapsed()
    );

    estimated
}

/// Compute the covariance matrix of a set of positions around their centroid.
pub fn covariance_matrix(positions: &[DVec3]) -> DMat3 {
    if positions.is_empty() {
        return DMat3::ZERO;
    }
    let n = positions.len() as f64;
    let centroid = positions.iter().fold(DVec3::ZERO, |acc, &p| acc + p) / n;

    let mut cov = DMat3::ZERO;
    for &p in positions {
        let d = p - centroid;
        cov += DMat3::from_cols(d * d.x, d * d.y, d * d.z);
    }
    cov * (1.0 / n)
}

/// Run power iteration on the neighborhood covariance and return the
/// normalized direction.
fn covariance_normal(positions: &[DVec3]) -> DVec3 {
    let cov = covariance_matrix(positions);

    let mut v = DVec3::ONE;
    for _ in 0..POWER_ITERATIONS {
        v = cov * v;
        let norm = v.length();
        if norm > 0.0 {
            v /= norm;
        }
    }

    let norm = v.length();
    if norm > 0.0 {
        v / norm
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_covariance_matrix() {
        let positions = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(0.0, -2.0, 0.0),
        ];
        let cov = covariance_matrix(&positions);
        assert_relative_eq!(cov.x_axis.x, 0.5);
        assert_relative_eq!(cov.y_axis.y, 2.0);
        assert_relative_eq!(cov.z_axis.z, 0.0);
        assert_relative_eq!(cov.x_axis.y, 0.0);
    }

    #[test]
    fn test_estimate_normals_symmetric_patch() {
        // the center sees a symmetric cross, cov = diag(a, a, 0)
        let points = vec![
            ColoredPoint::new(DVec3::ZERO, DVec3::ONE),
            ColoredPoint::new(DVec3::X, DVec3::ONE),
            ColoredPoint::new(-DVec3::X, DVec3::ONE),
            ColoredPoint::new(DVec3::Y, DVec3::ONE),
            ColoredPoint::new(-DVec3::Y, DVec3::ONE),
        ];
        let estimated = estimate_normals(&points, 4);
        assert_eq!(estimated.len(), points.len());

        let n = estimated[0].normal;
        assert_relative_eq!(n.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(n.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(n.z, 0.0);

        // positions and colors pass through
        for (a, b) in estimated.iter().zip(points.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.color, b.color);
        }
    }

    #[test]
    fn test_estimate_normals_line() {
        let points = (0..6)
            .map(|i| ColoredPoint::new(DVec3::new(i as f64, 0.0, 0.0), DVec3::ONE))
            .collect::<Vec<_>>();
        let estimated = estimate_normals(&points, 4);
        for p in &estimated {
            assert!(p.normal.abs_diff_eq(DVec3::X, 1e-12));
        }
    }

    #[test]
    fn test_estimate_normals_too_few_neighbors() {
        let points = vec![
            ColoredPoint::new(DVec3::ZERO, DVec3::ONE).with_normal(DVec3::Z),
            ColoredPoint::new(DVec3::X, DVec3::ONE),
            ColoredPoint::new(DVec3::Y, DVec3::ONE),
            ColoredPoint::new(DVec3::ONE, DVec3::ONE),
        ];
        // k = 2 never yields 3 neighbors
        let estimated = estimate_normals(&points, 2);
        assert_eq!(estimated, points);

        // fewer than 3 points
        let estimated = estimate_normals(&points[..2], 10);
        assert_eq!(estimated, points[..2].to_vec());
    }

    #[test]
    fn test_estimate_normals_input_untouched() {
        let points = (0..10)
            .map(|i| {
                let t = i as f64;
                ColoredPoint::new(DVec3::new(t.cos(), t.sin(), 0.1 * t), DVec3::ONE)
            })
            .collect::<Vec<_>>();
        let copy = points.clone();
        let estimated = estimate_normals(&points, 5);
        assert_eq!(points, copy);
        for p in &estimated {
            assert_relative_eq!(p.normal.length(), 1.0, epsilon = 1e-9);
        }
    }
}
