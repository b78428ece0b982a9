use std::path::Path;

use scanmesh_icp::IcpConvergenceCriteria;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// The algorithm turning the cleaned point cloud into a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SurfaceMethod {
    /// Greedy triangulation of nearby points.
    Greedy {
        /// The maximum length of a triangle edge.
        max_edge_length: f64,
    },
    /// One cube per occupied voxel.
    VoxelCubes {
        /// The voxel edge length.
        voxel_size: f64,
        /// Cells with an occupancy above this value are surfaced.
        iso_value: f32,
    },
}

impl Default for SurfaceMethod {
    fn default() -> Self {
        Self::Greedy {
            max_edge_length: 0.1,
        }
    }
}

/// Parameters of every stage of [`crate::reconstruct`].
///
/// Missing fields take their default value when deserializing, so a
/// configuration file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Register every cloud onto the previous ones before merging.
    pub use_icp: bool,
    /// Maximum number of ICP iterations.
    pub icp_max_iterations: usize,
    /// ICP stops once the mean correspondence distance is below this value.
    pub icp_tolerance: f64,
    /// Voxel size of the downsampling filter.
    pub voxel_size: f64,
    /// Neighborhood size of the normal estimation.
    pub normal_neighbors: usize,
    /// Neighborhood size of the statistical outlier removal.
    pub outlier_mean_k: usize,
    /// Standard deviation multiplier of the outlier threshold.
    pub outlier_std_ratio: f64,
    /// Point cloud smoothing passes, 0 to skip.
    pub point_smoothing_iterations: usize,
    /// Point cloud smoothing factor.
    pub point_smoothing_lambda: f64,
    /// Surface reconstruction method.
    pub surface: SurfaceMethod,
    /// Mesh smoothing passes, 0 to skip.
    pub mesh_smoothing_iterations: usize,
    /// Mesh smoothing factor.
    pub mesh_smoothing_lambda: f64,
    /// Fraction of triangles removed by simplification, 0 to skip.
    pub target_reduction: f64,
    /// Fill boundary loops of at most this many vertices.
    pub fill_holes: Option<usize>,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            use_icp: true,
            icp_max_iterations: 20,
            icp_tolerance: 1e-3,
            voxel_size: 0.01,
            normal_neighbors: 20,
            outlier_mean_k: 20,
            outlier_std_ratio: 1.0,
            point_smoothing_iterations: 0,
            point_smoothing_lambda: 0.5,
            surface: SurfaceMethod::default(),
            mesh_smoothing_iterations: 0,
            mesh_smoothing_lambda: 0.5,
            target_reduction: 0.0,
            fill_holes: None,
        }
    }
}

impl ReconstructionConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value is
    /// out of range.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the ICP convergence criteria.
    pub fn icp_criteria(&self) -> IcpConvergenceCriteria {
        IcpConvergenceCriteria {
            max_iterations: self.icp_max_iterations,
            tolerance: self.icp_tolerance,
        }
    }

    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        positive("voxel_size", self.voxel_size)?;
        non_negative("icp_tolerance", self.icp_tolerance)?;
        non_negative("outlier_std_ratio", self.outlier_std_ratio)?;
        unit_interval("point_smoothing_lambda", self.point_smoothing_lambda)?;
        unit_interval("mesh_smoothing_lambda", self.mesh_smoothing_lambda)?;

        if !(0.0..1.0).contains(&self.target_reduction) {
            return Err(PipelineError::InvalidConfig(format!(
                "target_reduction must be in [0, 1), got {}",
                self.target_reduction
            )));
        }
        if self.use_icp && self.icp_max_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "icp_max_iterations must be at least 1".to_string(),
            ));
        }
        if self.outlier_mean_k == 0 {
            return Err(PipelineError::InvalidConfig(
                "outlier_mean_k must be at least 1".to_string(),
            ));
        }
        if matches!(self.fill_holes, Some(n) if n < 3) {
            return Err(PipelineError::InvalidConfig(
                "fill_holes needs loops of at least 3 vertices".to_string(),
            ));
        }

        match self.surface {
            SurfaceMethod::Greedy { max_edge_length } => {
                positive("max_edge_length", max_edge_length)?;
            }
            SurfaceMethod::VoxelCubes {
                voxel_size,
                iso_value,
            } => {
                positive("surface voxel_size", voxel_size)?;
                non_negative("iso_value", iso_value as f64)?;
            }
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), PipelineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), PipelineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), PipelineError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}
