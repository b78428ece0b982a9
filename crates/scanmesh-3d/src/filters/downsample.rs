use std::collections::HashMap;

use glam::DVec3;

use crate::error::PointCloudError;
use crate::ops::normalize_or_keep;
use crate::pointcloud::ColoredPoint;

/// Accumulated sums of the points falling in one voxel.
#[derive(Default)]
struct VoxelData {
    position: DVec3,
    color: DVec3,
    normal: DVec3,
    count: usize,
}

/// Compute the voxel index for a given position.
///
/// # Arguments
/// * `position` - The input position.
/// * `voxel_size` - The voxel edge length.
///
/// # Returns
/// The voxel index as `(i64, i64, i64)`.
pub fn voxel_index(position: DVec3, voxel_size: f64) -> (i64, i64, i64) {
    let cell = (position / voxel_size).floor();
    (cell.x as i64, cell.y as i64, cell.z as i64)
}

/// Downsample a point cloud by averaging the points that fall in each voxel.
///
/// Each point goes to the cell `floor(coordinate / voxel_size)` on every axis.
/// One point is emitted per occupied cell, holding the mean position, color and
/// normal of its members; the mean normal is re-normalized unless it is zero.
/// Cells are emitted in the order they are first hit.
///
/// # Arguments
/// * `points` - The input point cloud.
/// * `voxel_size` - The voxel edge length.
///
/// # Errors
/// Returns [`PointCloudError::InvalidVoxelSize`] if `voxel_size` is not
/// finite and positive. An empty cloud is returned as is.
pub fn downsample_voxel_grid(
    points: &[ColoredPoint],
    voxel_size: f64,
) -> Result<Vec<ColoredPoint>, PointCloudError> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    if !voxel_size.is_finite() || voxel_size <= 0.0 {
        return Err(PointCloudError::InvalidVoxelSize(voxel_size));
    }

    // group points into voxels, remembering the first-hit order of the cells
    let mut slots: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut voxels: Vec<VoxelData> = Vec::new();
    for point in points {
        let key = voxel_index(point.position, voxel_size);
        let slot = *slots.entry(key).or_insert_with(|| {
            voxels.push(VoxelData::default());
            voxels.len() - 1
        });
        let voxel = &mut voxels[slot];
        voxel.position += point.position;
        voxel.color += point.color;
        voxel.normal += point.normal;
        voxel.count += 1;
    }

    let downsampled = voxels
        .into_iter()
        .map(|voxel| {
            let inv_count = 1.0 / voxel.count as f64;
            ColoredPoint {
                position: voxel.position * inv_count,
                color: voxel.color * inv_count,
                normal: normalize_or_keep(voxel.normal * inv_count),
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "voxel downsampling ({voxel_size}): {} -> {} points",
        points.len(),
        downsampled.len()
    );

    Ok(downsampled)
}
