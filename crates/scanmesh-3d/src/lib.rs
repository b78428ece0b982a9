#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for point cloud and mesh primitives.
pub mod error;

/// Point cloud filters: downsampling, normals, outliers and smoothing.
pub mod filters;

/// Linear algebra utilities.
pub mod linalg;

/// Triangle mesh container.
pub mod mesh;

/// Brute-force nearest neighbor queries.
pub mod neighbors;

/// Operations on 3D data processing.
pub mod ops;

/// Colored point samples and bounding boxes.
pub mod pointcloud;

/// Dense occupancy voxel grid.
pub mod voxelgrid;

pub use error::{MeshError, PointCloudError};
pub use mesh::{Mesh, Vertex};
pub use pointcloud::{Aabb, ColoredPoint};
pub use voxelgrid::VoxelGrid;
