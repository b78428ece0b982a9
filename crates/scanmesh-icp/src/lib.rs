#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod icp_translation;
pub use icp_translation::*;

mod merge;
pub use merge::merge_clouds;

mod ops;
pub use ops::{compute_centroids, fit_translation, Correspondence};
