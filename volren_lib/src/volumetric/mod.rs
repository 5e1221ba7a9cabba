mod binary_shell;
mod interpolation;
mod linear_volume;
mod rgb_volume;
mod volume;
mod voxel;

pub use binary_shell::{BinaryShell, ShellWalk};
pub use interpolation::{AnyInterpolator, Interpolator, NearestNeighbor, Trilinear};
pub use linear_volume::LinearVolume;
pub use rgb_volume::RgbVolume;
pub use volume::{Volume, VoxelKind};
pub use voxel::{Gradient, VoxelValue};
