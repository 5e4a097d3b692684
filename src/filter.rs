// filter.rs — The edge-detection pipeline object.
//
// `SobelFilter` walks the fixed sequence
//
//   new()        discover adapter → create device + queue → compile kernel
//   load_image() decode → 32-bit RGBA → upload
//   run()        bind arguments → dispatch
//   save_image() read back → encode BMP
//
// Each step returns early on the first failure. Nothing is retried and a
// failed step leaves earlier state intact, so e.g. a failed `load_image`
// can be followed by another `load_image`.
//
// With `Backend::Cpu` the device steps are skipped and `run()` uses the
// host reference filter in gradient.rs instead.

use std::path::{Path, PathBuf};

use log::info;

use crate::codec;
use crate::config::{Backend, FilterConfig};
use crate::error::{Result, SobelError};
use crate::gpu::device::GpuDevice;
use crate::gpu::image::GpuImage;
use crate::gpu::sobel::GpuSobelFilter;
use crate::gradient::sobel_magnitude;
use crate::image::{Image, Rgba8};
use crate::output::output_path;

/// An image held wherever the active backend keeps it.
enum Frame {
    Device(GpuImage),
    Host(Image<Rgba8>),
}

impl Frame {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Device(img) => (img.width, img.height),
            Frame::Host(img) => (img.width() as u32, img.height() as u32),
        }
    }
}

enum Engine {
    Gpu {
        filter: GpuSobelFilter,
        device: GpuDevice,
    },
    Cpu,
}

/// Load → run → save edge detector.
pub struct SobelFilter {
    // Declared before `engine` so device images drop before the device.
    input: Option<Frame>,
    output: Option<Frame>,
    engine: Engine,
}

impl SobelFilter {
    /// Set up the backend named in `config`. For the GPU backend this
    /// selects an adapter, creates the device and compiles the kernel.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let engine = match config.backend {
            Backend::Gpu => {
                let device = GpuDevice::with_config(&config.device)?;
                info!("{device}");
                let filter = GpuSobelFilter::new(&device, &config.kernel)?;
                info!("kernel `{}` ready", filter.entry_point());
                Engine::Gpu { filter, device }
            }
            Backend::Cpu => {
                info!("using host reference filter");
                Engine::Cpu
            }
        };
        Ok(SobelFilter { input: None, output: None, engine })
    }

    pub fn backend(&self) -> Backend {
        match self.engine {
            Engine::Gpu { .. } => Backend::Gpu,
            Engine::Cpu => Backend::Cpu,
        }
    }

    /// Decode the bitmap at `path` and make it the filter input.
    ///
    /// Returns the image dimensions.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<(u32, u32)> {
        let image = codec::load_rgba(path.as_ref())?;
        self.set_input(&image)?;
        Ok((image.width() as u32, image.height() as u32))
    }

    /// Make an in-memory image the filter input. Clears any previous output.
    pub fn set_input(&mut self, image: &Image<Rgba8>) -> Result<()> {
        let (w, h) = (image.width() as u32, image.height() as u32);
        let frame = match &self.engine {
            Engine::Gpu { device, .. } => Frame::Device(GpuImage::upload(device, image)?),
            Engine::Cpu => Frame::Host(image.clone()),
        };
        info!("input image {w}×{h}");
        self.input = Some(frame);
        self.output = None;
        Ok(())
    }

    /// Run the edge filter over the loaded image.
    pub fn run(&mut self) -> Result<()> {
        let input = self.input.as_ref().ok_or(SobelError::NoImageLoaded)?;
        let output = match (&self.engine, input) {
            (Engine::Gpu { filter, device }, Frame::Device(img)) => {
                Frame::Device(filter.run(device, img)?)
            }
            (Engine::Cpu, Frame::Host(img)) => Frame::Host(sobel_magnitude(img)),
            // `set_input` always stores the frame kind matching the engine.
            _ => unreachable!("input frame does not match the active backend"),
        };
        let (w, h) = output.dimensions();
        info!("filter dispatched over {w}×{h}");
        self.output = Some(output);
        Ok(())
    }

    /// Fetch the filtered image into host memory.
    pub fn output_image(&self) -> Result<Image<Rgba8>> {
        match (&self.engine, self.output.as_ref().ok_or(SobelError::NotRun)?) {
            (Engine::Gpu { device, .. }, Frame::Device(img)) => Ok(img.readback(device)?),
            (_, Frame::Host(img)) => Ok(img.clone()),
            (Engine::Cpu, Frame::Device(_)) => {
                unreachable!("device frame without a device engine")
            }
        }
    }

    /// Read back the filtered image and write it as BMP to `path`.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<()> {
        let image = self.output_image()?;
        codec::save_bmp(path, &image)?;
        Ok(())
    }
}

/// Run the whole pipeline for one input file and return the output path.
///
/// The output lands in `config.output_dir` as `sobel_<name>.bmp`.
pub fn process_file(config: &FilterConfig, input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    info!("creating edge detector ({} backend)", config.backend);
    let mut filter = SobelFilter::new(config)?;

    info!("loading image {}", input.display());
    filter.load_image(input)?;

    info!("running edge detection");
    filter.run()?;

    let out = output_path(&input.to_string_lossy(), &config.output_dir);
    info!("saving output to {}", out.display());
    filter.save_image(&out)?;
    Ok(out)
}
