mod downsample;
pub use downsample::*;

mod normals;
pub use normals::*;

mod outlier;
pub use outlier::*;

mod smooth;
pub use smooth::*;
