use scanmesh_3d::{linalg::transform_points, ColoredPoint};

use crate::icp_translation::{icp_translation, IcpConvergenceCriteria};

/// Merge several point clouds into one, optionally registering each onto the
/// points merged so far.
///
/// Clouds are accumulated in order. When `use_icp` is set and both the running
/// merged set and the incoming cloud are non-empty, the incoming cloud is
/// aligned onto the running set with [`icp_translation`] before being
/// appended.
///
/// # Arguments
///
/// * `clouds` - The clouds to merge, in acquisition order.
/// * `use_icp` - Whether to register every cloud before appending it.
/// * `criteria` - Convergence criteria of the registration.
pub fn merge_clouds<C: AsRef<[ColoredPoint]>>(
    clouds: &[C],
    use_icp: bool,
    criteria: &IcpConvergenceCriteria,
) -> Vec<ColoredPoint> {
    let Some((first, rest)) = clouds.split_first() else {
        return Vec::new();
    };

    let mut merged = first.as_ref().to_vec();

    for (i, cloud) in rest.iter().enumerate() {
        let cloud = cloud.as_ref();
        if use_icp && !merged.is_empty() && !cloud.is_empty() {
            match icp_translation(cloud, &merged, criteria) {
                Ok(result) => {
                    log::debug!(
                        "cloud {}: registered in {} iterations, mean distance {}",
                        i + 1,
                        result.num_iterations,
                        result.mean_distance
                    );
                    merged.extend(transform_points(cloud, &result.transform));
                }
                Err(err) => {
                    log::warn!("cloud {}: registration failed ({err}), appending as is", i + 1);
                    merged.extend_from_slice(cloud);
                }
            }
        } else {
            merged.extend_from_slice(cloud);
        }
    }

    log::debug!("merged {} clouds into {} points", clouds.len(), merged.len());

    merged
}
