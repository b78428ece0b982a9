/// An error type for the point cloud filters.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PointCloudError {
    /// Error when the voxel size is not a finite positive number.
    #[error("Voxel size must be finite and positive, got {0}")]
    InvalidVoxelSize(f64),
}

/// An error type for mesh construction.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MeshError {
    /// Error when the index buffer does not describe whole triangles.
    #[error("Index count ({0}) is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// Error when a triangle references a vertex that does not exist.
    #[error("Index {index} is out of bounds for {num_vertices} vertices")]
    IndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// The number of vertices in the mesh.
        num_vertices: usize,
    },
}
