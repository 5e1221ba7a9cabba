use thiserror::Error;

/// Errors reported by a rendering pass before it enters the traversal loop,
/// or by the host side when a worker cannot be started.
///
/// Numerical trouble inside the loop is never reported; the affected sample
/// is skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("transform is singular and cannot be inverted")]
    SingularTransform,

    #[error("capability mismatch: {0}")]
    CapabilityMismatch(String),

    #[error("volume has no voxels")]
    EmptyVolume,

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot spawn render thread: {0}")]
    ThreadSpawn(String),

    #[error("render worker panicked")]
    WorkerPanicked,
}
