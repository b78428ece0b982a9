#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use scanmesh_3d as geometry;

#[doc(inline)]
pub use scanmesh_icp as icp;

#[doc(inline)]
pub use scanmesh_mesh as mesh;

/// Reconstruction parameters.
pub mod config;

/// Error type of the reconstruction pipeline.
pub mod error;

/// End-to-end point cloud to mesh pipeline.
pub mod pipeline;

pub use config::{ReconstructionConfig, SurfaceMethod};
pub use error::PipelineError;
pub use pipeline::{build_surface, prepare_points, reconstruct};
