/// An error type for surface reconstruction.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReconstructionError {
    /// Error when the voxel size is not a finite positive number.
    #[error("Voxel size must be finite and positive, got {0}")]
    InvalidVoxelSize(f64),

    /// Error when the occupancy grid would not fit in memory.
    #[error("Voxel grid of {0:?} cells is too large")]
    GridTooLarge([usize; 3]),

    /// Error when a mesh invariant is broken.
    #[error(transparent)]
    Mesh(#[from] scanmesh_3d::MeshError),
}
