use scanmesh_3d::PointCloudError;
use scanmesh_mesh::ReconstructionError;

/// An error type for the reconstruction pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Error when a configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when reading a configuration file.
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),

    /// Error when parsing a configuration file.
    #[error("Failed to parse configuration")]
    Json(#[from] serde_json::Error),

    /// Error raised by a point cloud filter.
    #[error(transparent)]
    PointCloud(#[from] PointCloudError),

    /// Error raised while building the surface.
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}
