use glam::DMat4;

use crate::ops::normalize_or_keep;
use crate::pointcloud::ColoredPoint;

/// Transform a set of points with an affine transform.
///
/// Positions are transformed as points and normals as directions; colors are
/// left untouched.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_from_src` - The transform taking points from the source frame to the destination frame.
///
/// Example:
///
/// ```
/// use glam::{DMat4, DVec3};
/// use scanmesh_3d::linalg::transform_points;
/// use scanmesh_3d::ColoredPoint;
///
/// let src_points = vec![ColoredPoint::new(DVec3::new(2.0, 2.0, 2.0), DVec3::ONE)];
/// let transform = DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0));
/// let dst_points = transform_points(&src_points, &transform);
/// assert_eq!(dst_points[0].position, DVec3::new(3.0, 2.0, 2.0));
/// ```
pub fn transform_points(src_points: &[ColoredPoint], dst_from_src: &DMat4) -> Vec<ColoredPoint> {
    src_points
        .iter()
        .map(|p| ColoredPoint {
            position: dst_from_src.transform_point3(p.position),
            color: p.color,
            normal: normalize_or_keep(dst_from_src.transform_vector3(p.normal)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DQuat, DVec3};

    #[test]
    fn test_transform_points_identity() {
        let src_points = vec![
            ColoredPoint::new(DVec3::new(2.0, 2.0, 2.0), DVec3::ONE),
            ColoredPoint::new(DVec3::new(3.0, 4.0, 5.0), DVec3::ONE).with_normal(DVec3::Z),
        ];
        let dst_points = transform_points(&src_points, &DMat4::IDENTITY);
        assert_eq!(dst_points, src_points);
    }

    #[test]
    fn test_transform_points_roundtrip() {
        let src_points = vec![
            ColoredPoint::new(DVec3::new(2.0, 2.0, 2.0), DVec3::ONE),
            ColoredPoint::new(DVec3::new(3.0, 4.0, 5.0), DVec3::ONE).with_normal(DVec3::X),
        ];
        let transform = DMat4::from_rotation_translation(
            DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2),
            DVec3::new(1.0, 2.0, 3.0),
        );

        let dst_points = transform_points(&src_points, &transform);
        let back = transform_points(&dst_points, &transform.inverse());

        for (a, b) in back.iter().zip(src_points.iter()) {
            assert!(a.position.abs_diff_eq(b.position, 1e-12));
            assert!(a.normal.abs_diff_eq(b.normal, 1e-12));
        }
    }
}
