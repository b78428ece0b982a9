use std::time::Instant;

use scanmesh_3d::{filters, ColoredPoint, Mesh};
use scanmesh_icp::merge_clouds;
use scanmesh_mesh as recon;

use crate::config::{ReconstructionConfig, SurfaceMethod};
use crate::error::PipelineError;

/// Merge the scans and clean the resulting point cloud.
///
/// Runs, in order: merging (with ICP when enabled), voxel downsampling,
/// statistical outlier removal, normal estimation and optional smoothing.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn prepare_points<C: AsRef<[ColoredPoint]>>(
    clouds: &[C],
    config: &ReconstructionConfig,
) -> Result<Vec<ColoredPoint>, PipelineError> {
    config.validate()?;

    let merged = merge_clouds(clouds, config.use_icp, &config.icp_criteria());

    let downsampled = filters::downsample_voxel_grid(&merged, config.voxel_size)?;
    let cleaned = filters::remove_statistical_outliers(
        &downsampled,
        config.outlier_mean_k,
        config.outlier_std_ratio,
    );

    let mut points = filters::estimate_normals(&cleaned, config.normal_neighbors);

    if config.point_smoothing_iterations > 0 {
        points = filters::smooth_laplacian(
            &points,
            config.point_smoothing_iterations,
            config.point_smoothing_lambda,
        );
        log::debug!(
            "point smoothing: {} iterations",
            config.point_smoothing_iterations
        );
    }

    Ok(points)
}

/// Build and post-process a mesh from a cleaned point cloud.
///
/// Runs the configured surface method, then mesh smoothing, simplification
/// and hole filling when enabled.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the surface cannot be
/// built.
pub fn build_surface(
    points: &[ColoredPoint],
    config: &ReconstructionConfig,
) -> Result<Mesh, PipelineError> {
    config.validate()?;

    let mut mesh = match config.surface {
        SurfaceMethod::Greedy { max_edge_length } => {
            recon::greedy_triangulation(points, max_edge_length)
        }
        SurfaceMethod::VoxelCubes {
            voxel_size,
            iso_value,
        } => recon::voxel_cube_surface(points, voxel_size, iso_value)?,
    };
    log::debug!(
        "surface: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    if config.mesh_smoothing_iterations > 0 {
        recon::smooth_mesh_laplacian(
            &mut mesh,
            config.mesh_smoothing_iterations,
            config.mesh_smoothing_lambda,
        );
    }

    if config.target_reduction > 0.0 {
        let collapses = recon::simplify_edge_collapse(&mut mesh, config.target_reduction);
        log::debug!(
            "simplification: {collapses} collapses, {} triangles left",
            mesh.num_triangles()
        );
    }

    if let Some(max_loop_len) = config.fill_holes {
        let filled = recon::fill_holes(&mut mesh, max_loop_len);
        log::debug!("hole filling: {filled} holes closed");
    }

    Ok(mesh)
}

/// Reconstruct a mesh from one or more scans.
///
/// Chains [`prepare_points`] and [`build_surface`].
///
/// # Arguments
///
/// * `clouds` - The scans, in acquisition order.
/// * `config` - The parameters of every stage.
///
/// # Returns
///
/// The reconstructed mesh, owned by the caller.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a stage fails.
pub fn reconstruct<C: AsRef<[ColoredPoint]>>(
    clouds: &[C],
    config: &ReconstructionConfig,
) -> Result<Mesh, PipelineError> {
    let start = Instant::now();

    let points = prepare_points(clouds, config)?;
    let mesh = build_surface(&points, config)?;

    log::info!(
        "reconstructed {} triangles from {} points in {:?}",
        mesh.num_triangles(),
        points.len(),
        start.elapsed()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn grid(n: usize, spacing: f64, offset: DVec3) -> Vec<ColoredPoint> {
        let mut points = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let position = DVec3::new(i as f64 * spacing, j as f64 * spacing, 0.0) + offset;
                points.push(ColoredPoint::new(position, DVec3::new(0.2, 0.4, 0.6)));
            }
        }
        points
    }

    #[test]
    fn test_prepare_points_flat_grid() -> Result<(), PipelineError> {
        let config = ReconstructionConfig {
            use_icp: false,
            voxel_size: 0.01,
            normal_neighbors: 8,
            outlier_mean_k: 8,
            outlier_std_ratio: 5.0,
            ..Default::default()
        };
        let points = prepare_points(&[grid(12, 0.02, DVec3::splat(0.005))], &config)?;

        assert_eq!(points.len(), 144);
        for p in &points {
            // power iteration settles in the plane of a flat patch
            assert_eq!(p.normal.z, 0.0);
            assert_relative_eq!(p.normal.length(), 1.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_build_surface_voxel_cubes() -> Result<(), PipelineError> {
        let config = ReconstructionConfig {
            surface: SurfaceMethod::VoxelCubes {
                voxel_size: 0.05,
                iso_value: 0.5,
            },
            ..Default::default()
        };
        let points = grid(4, 0.1, DVec3::splat(0.01));
        let mesh = build_surface(&points, &config)?;

        assert_eq!(mesh.num_vertices(), 16 * 8);
        assert_eq!(mesh.num_triangles(), 16 * 12);
        Ok(())
    }

    #[test]
    fn test_build_surface_post_processing() -> Result<(), PipelineError> {
        let config = ReconstructionConfig {
            surface: SurfaceMethod::Greedy {
                max_edge_length: 0.15,
            },
            mesh_smoothing_iterations: 2,
            target_reduction: 0.5,
            fill_holes: Some(6),
            ..Default::default()
        };
        let points = grid(6, 0.1, DVec3::ZERO);
        let greedy = recon::greedy_triangulation(&points, 0.15);
        let mesh = build_surface(&points, &config)?;

        assert!(mesh
            .indices()
            .iter()
            .all(|&i| (i as usize) < mesh.num_vertices()));

        // isolated triangles are not holes: nothing is added on top of them
        assert!(mesh.num_triangles() > 0);
        assert!(mesh.num_triangles() <= greedy.num_triangles() / 2);
        for [a, b, c] in mesh.triangles() {
            for v in [a, b, c] {
                let normal = mesh.vertices()[v as usize].normal;
                assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ReconstructionConfig {
            voxel_size: -1.0,
            ..Default::default()
        };
        let clouds: [Vec<ColoredPoint>; 0] = [];
        assert!(matches!(
            reconstruct(&clouds, &config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_no_clouds_gives_empty_mesh() -> Result<(), PipelineError> {
        let clouds: [Vec<ColoredPoint>; 0] = [];
        let mesh = reconstruct(&clouds, &ReconstructionConfig::default())?;
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 0);
        Ok(())
    }
}
