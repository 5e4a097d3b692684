// gpu/mod.rs — wgpu compute layer.
//
// Maps the classic compute-API setup sequence onto wgpu:
//
//   platforms / devices  → device::GpuDevice (adapter enumeration + selection)
//   context / queue      → device::GpuDevice (request_device)
//   program / kernel     → kernel::CompiledKernel (WGSL → compute pipeline)
//   image buffers        → image::GpuImage (Rgba8Uint textures)
//   set args / enqueue   → sobel::GpuSobelFilter::run
//   read back            → image::GpuImage::readback
//
// Everything here is owned Rust values; handles are released by Drop.

pub mod device;
pub mod image;
pub mod kernel;
pub mod sobel;

pub use device::{DeviceConfig, DeviceKind, GpuDevice, GpuError, WorkgroupSize};
pub use image::GpuImage;
pub use kernel::{KernelConfig, KernelError, KernelSource};
pub use sobel::GpuSobelFilter;

/// Run one `#[ignore]`d inner GPU test in a child `cargo test` process and
/// return its combined output.
///
/// The exit status is deliberately not checked: some Vulkan layers crash
/// during process teardown after a device was created. Inner tests print
/// "GPU_TEST_OK" once their assertions pass, and callers look for that.
#[cfg(test)]
pub(crate) fn run_gpu_test_in_subprocess(test_name: &str) -> String {
    let output = std::process::Command::new("cargo")
        .args([
            "test", "--lib", "--",
            test_name, "--exact", "--ignored", "--nocapture",
        ])
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn subprocess for {test_name}: {e}"));
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    print!("{stdout}");
    eprint!("{stderr}");
    stdout + &stderr
}
