use glam::DVec3;
use scanmesh_3d::{pointcloud::bounding_box, ColoredPoint, Mesh, Vertex, VoxelGrid};

use crate::error::ReconstructionError;
use crate::normals::recompute_normals;

/// Upper bound on the number of cells of the occupancy grid.
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Corners of the unit cube.
const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Two outward-facing triangles per cube face.
const CUBE_TRIANGLES: [[u32; 3]; 12] = [
    // -z
    [0, 2, 1],
    [0, 3, 2],
    // +z
    [4, 5, 6],
    [4, 6, 7],
    // -y
    [0, 1, 5],
    [0, 5, 4],
    // +y
    [3, 7, 6],
    [3, 6, 2],
    // -x
    [0, 4, 7],
    [0, 7, 3],
    // +x
    [1, 2, 6],
    [1, 6, 5],
];

/// Build an occupancy grid covering the points, padded by one voxel on every
/// side. Cells holding at least one point are set to `1.0`.
pub fn occupancy_grid(
    points: &[ColoredPoint],
    voxel_size: f64,
) -> Result<Option<VoxelGrid>, ReconstructionError> {
    if !voxel_size.is_finite() || voxel_size <= 0.0 {
        return Err(ReconstructionError::InvalidVoxelSize(voxel_size));
    }
    let Some(bounds) = bounding_box(points) else {
        return Ok(None);
    };

    let padded = bounds.padded(voxel_size);
    let extent = (padded.size() / voxel_size).ceil() + DVec3::ONE;
    let dims = [extent.x as usize, extent.y as usize, extent.z as usize];
    let num_cells = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&n| n <= MAX_GRID_CELLS);
    if num_cells.is_none() {
        return Err(ReconstructionError::GridTooLarge(dims));
    }

    let mut grid = VoxelGrid::new(dims, padded.min, voxel_size);
    for point in points {
        // offset from the unpadded minimum so the lowest point lands exactly in cell 1
        let local = ((point.position - bounds.min) / voxel_size).floor();
        let cell = [
            local.x as usize + 1,
            local.y as usize + 1,
            local.z as usize + 1,
        ];
        grid.set(cell, 1.0);
    }

    Ok(Some(grid))
}

/// Reconstruct a blocky surface by emitting one cube per occupied voxel.
///
/// The points are binned into a padded occupancy grid. Every cell off the
/// outer layer of the grid whose value exceeds `iso_value` produces an
/// independent cube of 8 vertices and 12 triangles anchored at the cell's
/// minimum corner. Cubes never share vertices, so faces between neighboring
/// cells are emitted twice.
///
/// # Arguments
///
/// * `points` - The input point cloud.
/// * `voxel_size` - The edge length of a voxel and of every emitted cube.
/// * `iso_value` - The occupancy threshold.
///
/// # Errors
///
/// Returns an error if the voxel size is not finite and positive or if the
/// grid would be unreasonably large.
pub fn voxel_cube_surface(
    points: &[ColoredPoint],
    voxel_size: f64,
    iso_value: f32,
) -> Result<Mesh, ReconstructionError> {
    let Some(grid) = occupancy_grid(points, voxel_size)? else {
        return Ok(Mesh::default());
    };

    let [nx, ny, nz] = grid.dims();
    let mut mesh = Mesh::default();

    for i in 1..nx.saturating_sub(1) {
        for j in 1..ny.saturating_sub(1) {
            for k in 1..nz.saturating_sub(1) {
                let occupancy = grid.get([i, j, k]).unwrap_or(0.0);
                if occupancy <= iso_value {
                    continue;
                }
                push_cube(&mut mesh, grid.cell_origin([i, j, k]), voxel_size);
            }
        }
    }

    recompute_normals(&mut mesh);

    log::debug!(
        "voxel cubes ({voxel_size}): grid {:?}, {} occupied cells, {} triangles",
        grid.dims(),
        grid.occupied_count(),
        mesh.num_triangles()
    );

    Ok(mesh)
}

fn push_cube(mesh: &mut Mesh, origin: DVec3, size: f64) {
    let base = mesh.num_vertices() as u32;
    for corner in CUBE_CORNERS {
        mesh.push_vertex(Vertex::new(
            origin + DVec3::from_array(corner) * size,
            DVec3::ONE,
        ));
    }
    for [a, b, c] in CUBE_TRIANGLES {
        mesh.push_triangle([base + a, base + b, base + c]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normals::face_normal;
    use approx::assert_relative_eq;

    fn cloud(positions: &[[f64; 3]]) -> Vec<ColoredPoint> {
        positions
            .iter()
            .map(|p| ColoredPoint::new(DVec3::from_array(*p), DVec3::ONE))
            .collect()
    }

    #[test]
    fn test_single_point_single_cube() -> Result<(), ReconstructionError> {
        let points = cloud(&[[0.25, 0.25, 0.25]]);
        let mesh = voxel_cube_surface(&points, 1.0, 0.5)?;

        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);

        let bounds = mesh.bounding_box().unwrap();
        assert!(bounds.min.abs_diff_eq(DVec3::splat(0.25), 1e-12));
        assert!(bounds.max.abs_diff_eq(DVec3::splat(1.25), 1e-12));
        Ok(())
    }

    #[test]
    fn test_cube_faces_point_outwards() -> Result<(), ReconstructionError> {
        let points = cloud(&[[0.0, 0.0, 0.0]]);
        let mesh = voxel_cube_surface(&points, 0.5, 0.0)?;
        let center = mesh.bounding_box().unwrap().center();

        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (mesh.position(a), mesh.position(b), mesh.position(c));
            let n = face_normal(pa, pb, pc);
            let face_center = (pa + pb + pc) / 3.0;
            assert!(n.dot(face_center - center) > 0.0);
        }
        for v in mesh.vertices() {
            assert_relative_eq!(v.normal.length(), 1.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_adjacent_cubes_do_not_share_vertices() -> Result<(), ReconstructionError> {
        let points = cloud(&[[0.1, 0.1, 0.1], [1.5, 0.1, 0.1], [1.6, 0.2, 0.2]]);
        let mesh = voxel_cube_surface(&points, 1.0, 0.5)?;
        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_triangles(), 24);
        Ok(())
    }

    #[test]
    fn test_iso_value_filters_everything() -> Result<(), ReconstructionError> {
        let points = cloud(&[[0.1, 0.1, 0.1]]);
        let mesh = voxel_cube_surface(&points, 1.0, 1.0)?;
        assert!(mesh.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(voxel_cube_surface(&[], 0.1, 0.5).unwrap().is_empty());
        let points = cloud(&[[0.0, 0.0, 0.0]]);
        assert_eq!(
            voxel_cube_surface(&points, -1.0, 0.5).unwrap_err(),
            ReconstructionError::InvalidVoxelSize(-1.0)
        );
    }

    #[test]
    fn test_occupancy_grid_padding() -> Result<(), ReconstructionError> {
        let points = cloud(&[[0.0, 0.0, 0.0], [2.0, 1.0, 0.0]]);
        let grid = occupancy_grid(&points, 1.0)?.unwrap();
        // extent 2 + 2 * padding, plus one cell for the upper boundary
        assert_eq!(grid.dims(), [5, 4, 3]);
        assert_eq!(grid.origin(), DVec3::new(-1.0, -1.0, -1.0));
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.get([1, 1, 1]), Some(1.0));
        assert_eq!(grid.get([3, 2, 1]), Some(1.0));
        Ok(())
    }
}
