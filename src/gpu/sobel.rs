// gpu/sobel.rs — Binding and dispatching the edge kernel.
//
// One dispatch per image:
//   1. allocate the output texture (same size as the input)
//   2. bind input, output and {width, height} to group 0
//   3. dispatch ceil(w / WG_X) × ceil(h / WG_Y) workgroups
//   4. submit
//
// The returned `GpuImage` is valid to read back immediately; readback waits
// on the queue. All four steps run in one `GpuDevice::scoped` block, so a
// rejected allocation, binding or dispatch is reported as a `GpuError`.

use log::debug;
use wgpu::util::DeviceExt;

use crate::gpu::device::{GpuDevice, GpuError};
use crate::gpu::image::GpuImage;
use crate::gpu::kernel::{CompiledKernel, KernelConfig, KernelError};

/// Uniform params (must match WGSL struct `Params` exactly).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
struct SobelParams {
    width: u32,
    height: u32,
    // Pads the uniform to 16 bytes.
    _pad: [u32; 2],
}

impl SobelParams {
    fn new(width: u32, height: u32) -> Self {
        SobelParams { width, height, _pad: [0; 2] }
    }
}

/// The compiled edge kernel, ready to dispatch.
///
/// Create once per device; `run` may be called for any number of images.
pub struct GpuSobelFilter {
    kernel: CompiledKernel,
}

impl GpuSobelFilter {
    pub fn new(gpu: &GpuDevice, config: &KernelConfig) -> Result<Self, KernelError> {
        Ok(GpuSobelFilter { kernel: CompiledKernel::build(gpu, config)? })
    }

    pub fn entry_point(&self) -> &str {
        &self.kernel.entry_point
    }

    /// Enqueue the kernel over `input` and return the output image.
    pub fn run(&self, gpu: &GpuDevice, input: &GpuImage) -> Result<GpuImage, GpuError> {
        gpu.scoped("kernel dispatch", || self.dispatch(gpu, input))
    }

    fn dispatch(&self, gpu: &GpuDevice, input: &GpuImage) -> GpuImage {
        let (w, h) = (input.width, input.height);
        let output = GpuImage::output(gpu, w, h);

        let params = SobelParams::new(w, h);
        let params_buf = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sobel params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sobel BG"),
            layout: &self.kernel.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&input.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&output.view) },
                wgpu::BindGroupEntry { binding: 2, resource: params_buf.as_entire_binding() },
            ],
        });

        let (wg_x, wg_y) = gpu.dispatch_size(w, h);
        debug!(
            "dispatching `{}` over {w}×{h}: {wg_x}×{wg_y} workgroups of {}",
            self.kernel.entry_point, gpu.workgroup_size
        );

        let mut encoder = gpu.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("sobel dispatch") },
        );
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("sobel"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.kernel.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(wg_x, wg_y, 1);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));

        output
    }
}
