use crate::codec::CodecError;
use crate::gpu::device::GpuError;
use crate::gpu::kernel::KernelError;

/// Top-level error for the load → run → save pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SobelError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("no image loaded; call load_image first")]
    NoImageLoaded,

    #[error("filter has not been run; call run first")]
    NotRun,
}

pub type Result<T, E = SobelError> = std::result::Result<T, E>;
