use glam::DVec3;

use crate::pointcloud::ColoredPoint;

/// Utility function to compute the Euclidean distance between two points.
///
/// # Arguments
///
/// * `a` - A point in 3D space.
/// * `b` - Another point in 3D space.
///
/// # Returns
///
/// The Euclidean distance between the two points.
///
/// Example:
/// ```
/// use glam::DVec3;
/// use scanmesh_3d::ops::euclidean_distance;
///
/// let a = DVec3::new(1.0, 2.0, 3.0);
/// let b = DVec3::new(4.0, 5.0, 6.0);
/// let dst = euclidean_distance(a, b);
/// ```
pub fn euclidean_distance(a: DVec3, b: DVec3) -> f64 {
    (a - b).length()
}

/// Compute the mean position of a set of points.
///
/// Returns `None` when `points` is empty.
pub fn centroid(points: &[ColoredPoint]) -> Option<DVec3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(DVec3::ZERO, |acc, p| acc + p.position);
    Some(sum / points.len() as f64)
}

/// Normalize a vector, leaving it untouched when its length is zero.
#[inline]
pub fn normalize_or_keep(v: DVec3) -> DVec3 {
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
    fn test_euclidean_distance() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);
        assert_relative_eq!(euclidean_distance(a, b), 5.196152, epsilon = 1e-6);
    }

    #[test]
    fn test_centroid() {
        let points = vec![
            ColoredPoint::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ONE),
            ColoredPoint::new(DVec3::new(4.0, 5.0, 6.0), DVec3::ONE),
        ];
        assert_eq!(centroid(&points), Some(DVec3::new(2.5, 3.5, 4.5)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_normalize_or_keep() {
        assert_eq!(normalize_or_keep(DVec3::new(0.0, 3.0, 4.0)), DVec3::new(0.0, 0.6, 0.8));
        assert_eq!(normalize_or_keep(DVec3::ZERO), DVec3::ZERO);
    }
}
