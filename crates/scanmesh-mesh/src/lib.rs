#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for surface reconstruction.
pub mod error;

/// Boundary detection and hole filling.
pub mod holes;

/// Per-vertex normal computation.
pub mod normals;

/// Edge-collapse simplification.
pub mod simplify;

/// Laplacian mesh smoothing.
pub mod smooth;

/// Greedy triangulation of point clouds.
pub mod triangulate;

/// Voxel-cube surfacing of point clouds.
pub mod voxelize;

pub use error::ReconstructionError;
pub use holes::{boundary_edges, boundary_loops, fill_holes, triangulate_loop};
pub use normals::recompute_normals;
pub use simplify::simplify_edge_collapse;
pub use smooth::smooth_mesh_laplacian;
pub use triangulate::greedy_triangulation;
pub use voxelize::voxel_cube_surface;
