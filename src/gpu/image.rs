// gpu/image.rs — Device-resident images: upload, output allocation, readback.
//
// Both kernel images use `Rgba8Uint`: four unsigned 8-bit channels that the
// shader sees as `vec4<u32>` in [0, 255], with no normalisation or sRGB
// conversion on the way in or out.
//
//   GpuImage::upload  — input image, TEXTURE_BINDING | COPY_DST | COPY_SRC.
//                       Filled from host memory at creation.
//   GpuImage::output  — output image, STORAGE_BINDING | COPY_SRC.
//                       Written only by the kernel.
//   GpuImage::readback — blocking copy back into an Image<Rgba8>.
//
//
// ROW ALIGNMENT
// ─────────────
// Buffer↔texture copies need `bytes_per_row` to be a multiple of
// `wgpu::COPY_BYTES_PER_ROW_ALIGNMENT` (256). A row of RGBA8 pixels is
// `width * 4` bytes, so both directions go through a staging buffer whose
// rows are padded up to the alignment:
//
//   staging row:  [ p0 p1 ... p(w-1) | zero padding up to 256·k bytes ]
//
// Upload writes the padding; readback strips it. The padded size is what
// `check_image_fits` holds against `max_buffer_size`.
//
// Resource creation and submission run under `GpuDevice::scoped`, so a
// rejected allocation or copy comes back as `GpuError::Operation`.

use wgpu::util::DeviceExt;

use crate::gpu::device::{GpuDevice, GpuError};
use crate::image::{Image, Rgba8};

const COPY_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
const BYTES_PER_PIXEL: u32 = 4;

pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Uint;

/// An RGBA8 image resident on the device as a 2D texture.
///
/// Owns its wgpu resources; dropping it releases the texture memory.
pub struct GpuImage {
    pub texture: wgpu::Texture,
    /// Full-texture view, bound as either `texture_2d<u32>` or
    /// `texture_storage_2d<rgba8uint, write>` depending on usage.
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuImage {
    fn allocate(gpu: &GpuDevice, width: u32, height: u32, usage: wgpu::TextureUsages, label: &str) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GpuImage { texture, view, width, height }
    }

    /// Upload a host image as the kernel's read-only input.
    ///
    /// The copy is recorded and submitted immediately; later submissions on
    /// the same queue observe it, so no explicit wait is needed before
    /// dispatching the kernel.
    pub fn upload(gpu: &GpuDevice, src: &Image<Rgba8>) -> Result<Self, GpuError> {
        let width = src.width() as u32;
        let height = src.height() as u32;
        gpu.check_image_size(width, height)?;
        gpu.scoped("image upload", || Self::upload_unchecked(gpu, src, width, height))
    }

    fn upload_unchecked(gpu: &GpuDevice, src: &Image<Rgba8>, width: u32, height: u32) -> Self {
        let img = Self::allocate(
            gpu,
            width,
            height,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            "GpuImage::input",
        );

        let padded_row = padded_bytes_per_row(width);
        let staging = pad_rows(src, padded_row as usize);

        let staging_buf = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("GpuImage::staging"),
            contents: &staging,
            usage: wgpu::BufferUsages::COPY_SRC,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuImage::upload"),
            });

        encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &staging_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            img.texture.as_image_copy(),
            extent(width, height),
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        img
    }

    /// Allocate an uninitialised write-only output image for the kernel.
    pub fn output(gpu: &GpuDevice, width: u32, height: u32) -> Self {
        Self::allocate(
            gpu,
            width,
            height,
            wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
            "GpuImage::output",
        )
    }

    /// Copy the texture back into host memory, blocking until done.
    ///
    /// Waits for all previously submitted work on the queue, so calling this
    /// right after a dispatch returns the kernel's result.
    pub fn readback(&self, gpu: &GpuDevice) -> Result<Image<Rgba8>, GpuError> {
        let padded_row = padded_bytes_per_row(self.width);
        let readback_buf = gpu.scoped("image readback", || self.copy_out(gpu, padded_row))?;

        let slice = readback_buf.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver outlives the poll below; a failed send only means
            // nobody is waiting any more.
            let _ = sender.send(result);
        });

        gpu.device.poll(wgpu::Maintain::Wait);
        receiver.recv().map_err(|_| GpuError::ReadbackLost)??;

        let mapped = slice.get_mapped_range();
        let out = unpad_rows(&mapped, self.width as usize, self.height as usize, padded_row as usize);
        drop(mapped);
        readback_buf.unmap();

        Ok(out)
    }

    /// Record and submit the texture → staging buffer copy.
    fn copy_out(&self, gpu: &GpuDevice, padded_row: u32) -> wgpu::Buffer {
        let readback_size = padded_row as u64 * self.height as u64;
        let readback_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GpuImage::readback"),
            size: readback_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuImage::readback"),
            });

        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &readback_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            extent(self.width, self.height),
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        readback_buf
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d { width, height, depth_or_array_layers: 1 }
}

/// Bytes per staging row for an RGBA8 image of `width` pixels.
#[inline]
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    align_to(width * BYTES_PER_PIXEL, COPY_ALIGNMENT)
}

/// Round `value` up to the next multiple of `alignment`.
///
///   align_to(100, 256) = 256
///   align_to(256, 256) = 256
///   align_to(257, 256) = 512
#[inline]
pub(crate) fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

/// Lay out the active pixels of `src` in rows of `padded_row` bytes.
fn pad_rows(src: &Image<Rgba8>, padded_row: usize) -> Vec<u8> {
    let row_bytes = src.width() * BYTES_PER_PIXEL as usize;
    let mut staging = vec![0u8; padded_row * src.height()];
    for y in 0..src.height() {
        let dst = y * padded_row;
        staging[dst..dst + row_bytes].copy_from_slice(bytemuck::cast_slice(src.row(y)));
    }
    staging
}

/// Inverse of `pad_rows`: drop the per-row padding.
fn unpad_rows(padded: &[u8], width: usize, height: usize, padded_row: usize) -> Image<Rgba8> {
    let row_bytes = width * BYTES_PER_PIXEL as usize;
    let mut packed = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let start = y * padded_row;
        packed.extend_from_slice(&padded[start..start + row_bytes]);
    }
    Image::from_rgba_bytes(width, height, &packed)
}
