use glam::DMat4;
use scanmesh_3d::{linalg::transform_points, ColoredPoint};

use crate::ops::{find_correspondences, fit_translation, mean_correspondence_distance};

/// An error type for the ICP registration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum IcpError {
    /// Error when the source point cloud is empty.
    #[error("Source point cloud is empty")]
    EmptySource,

    /// Error when the target point cloud is empty.
    #[error("Target point cloud is empty")]
    EmptyTarget,
}

/// Result of the ICP algorithm.
///
/// The transformation is from the source to the target frame.
#[derive(Debug, Clone)]
pub struct IcpResult {
    /// Accumulated transform aligning the source onto the target.
    pub transform: DMat4,
    /// The total number of iterations performed.
    pub num_iterations: usize,
    /// Mean correspondence distance after the last update.
    pub mean_distance: f64,
    /// Whether the mean distance dropped below the tolerance.
    pub converged: bool,
}

/// Structure to define the ICP parameters.
#[derive(Debug, Clone)]
pub struct IcpConvergenceCriteria {
    /// Maximum number of iterations to perform.
    pub max_iterations: usize,
    /// Stop once the mean correspondence distance after an update is below this value.
    pub tolerance: f64,
}

impl Default for IcpConvergenceCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 1e-3,
        }
    }
}

/// Iterative Closest Point registration estimating a translation only.
///
/// Each iteration pairs every source point with its nearest target point,
/// moves the source by the difference of the paired centroids and multiplies
/// that increment into the accumulated transform (on the right). No rotation is
/// estimated.
///
/// # Arguments
///
/// * `source` - Source point cloud.
/// * `target` - Target point cloud.
/// * `criteria` - Convergence criteria.
///
/// # Returns
///
/// * `result` - Result of the ICP algorithm containing the accumulated transform and number of iterations.
///
/// # Errors
///
/// Returns an error if either cloud is empty.
pub fn icp_translation(
    source: &[ColoredPoint],
    target: &[ColoredPoint],
    criteria: &IcpConvergenceCriteria,
) -> Result<IcpResult, IcpError> {
    if source.is_empty() {
        return Err(IcpError::EmptySource);
    }
    if target.is_empty() {
        return Err(IcpError::EmptyTarget);
    }

    let mut result = IcpResult {
        transform: DMat4::IDENTITY,
        num_iterations: 0,
        mean_distance: f64::INFINITY,
        converged: false,
    };

    // working copy of the source that is moved every iteration
    let mut current_source = source.to_vec();

    for i in 0..criteria.max_iterations {
        log::debug!("Iteration: {}", i);

        let correspondences = find_correspondences(&current_source, target);
        let delta = fit_translation(&current_source, target, &correspondences);

        current_source = transform_points(&current_source, &delta);
        result.transform *= delta;
        result.num_iterations += 1;

        result.mean_distance =
            mean_correspondence_distance(&current_source, target, &correspondences);
        log::debug!("mean correspondence distance: {}", result.mean_distance);

        if result.mean_distance < criteria.tolerance {
            log::debug!(
                "ICP converged in {} iterations with error {}",
                result.num_iterations,
                result.mean_distance
            );
            result.converged = true;
            break;
        }
    }

    Ok(result)
}
