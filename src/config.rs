// config.rs — Run configuration.
//
// Plain structs with defaults that reproduce the stock behaviour: embedded
// kernel, `sobel_filter` entry point, GPU first with CPU-adapter fallback,
// output into the working directory. The binary fills them from its flags;
// library users build them directly.

use std::fmt;
use std::path::PathBuf;

use crate::gpu::device::DeviceConfig;
use crate::gpu::kernel::KernelConfig;

/// Where the filter executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Dispatch the kernel through wgpu.
    #[default]
    Gpu,
    /// Run the host reference implementation; no adapter needed.
    Cpu,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Gpu => write!(f, "gpu"),
            Backend::Cpu => write!(f, "cpu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub backend: Backend,
    pub device: DeviceConfig,
    pub kernel: KernelConfig,
    /// Directory the `sobel_<name>.bmp` output is written to.
    pub output_dir: PathBuf,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            backend: Backend::Gpu,
            device: DeviceConfig::default(),
            kernel: KernelConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}
