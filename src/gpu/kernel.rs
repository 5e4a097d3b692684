// gpu/kernel.rs — Kernel program loading and compilation.
//
// A kernel program is WGSL source plus the name of its entry point. The
// source either comes compiled into the binary (`shaders/sobel.wgsl`) or is
// read from a file at startup, so a different edge kernel can be dropped in
// without rebuilding.
//
// BINDING CONTRACT
// ────────────────
// Any kernel run by `GpuSobelFilter` must declare, in group 0:
//
//   @binding(0) var input_image:  texture_2d<u32>;                      // RGBA8
//   @binding(1) var output_image: texture_storage_2d<rgba8uint, write>;
//   @binding(2) var<uniform> params: Params;   // { width: u32, height: u32, pad, pad }
//
// and a `@compute` entry point taking `@builtin(global_invocation_id)`.
// The literal placeholders `{{WG_X}}` and `{{WG_Y}}` are replaced with the
// active workgroup size before compilation; a kernel may hard-code its own
// size instead, as long as it matches `--workgroup`.
//
// BUILD ERRORS
// ────────────
// wgpu reports shader and pipeline errors asynchronously through the
// device's error handler, which panics by default. Compilation therefore
// runs inside a validation error scope; whatever the scope catches becomes
// `KernelError::Build`, carrying the compiler's diagnostic text.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::gpu::device::GpuDevice;
use crate::gpu::image::TEXTURE_FORMAT;

/// The Sobel kernel shipped with the binary.
pub const EMBEDDED_SOBEL: &str = include_str!("../shaders/sobel.wgsl");

pub const DEFAULT_ENTRY_POINT: &str = "sobel_filter";

/// Where the kernel source comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KernelSource {
    #[default]
    Embedded,
    File(PathBuf),
}

/// Kernel program selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    pub source: KernelSource,
    pub entry_point: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            source: KernelSource::Embedded,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("failed to open {} for reading: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error building kernel `{entry_point}`:\n{log}")]
    Build { entry_point: String, log: String },
}

impl KernelSource {
    /// Return the raw WGSL text, before placeholder substitution.
    pub fn load(&self) -> Result<Cow<'static, str>, KernelError> {
        match self {
            KernelSource::Embedded => Ok(Cow::Borrowed(EMBEDDED_SOBEL)),
            KernelSource::File(path) => read_kernel_file(path).map(Cow::Owned),
        }
    }

    fn label(&self) -> String {
        match self {
            KernelSource::Embedded => "sobel.wgsl (embedded)".to_string(),
            KernelSource::File(path) => path.display().to_string(),
        }
    }
}

fn read_kernel_file(path: &Path) -> Result<String, KernelError> {
    std::fs::read_to_string(path).map_err(|source| KernelError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Substitute the workgroup placeholders in `template`.
pub fn specialize(template: &str, wg_x: u32, wg_y: u32) -> String {
    template
        .replace("{{WG_X}}", &wg_x.to_string())
        .replace("{{WG_Y}}", &wg_y.to_string())
}

/// A compiled kernel: compute pipeline plus the layout its bind groups use.
pub struct CompiledKernel {
    pub pipeline: wgpu::ComputePipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub entry_point: String,
}

impl CompiledKernel {
    /// Load, specialise and compile the kernel described by `config`.
    pub fn build(gpu: &GpuDevice, config: &KernelConfig) -> Result<Self, KernelError> {
        let template = config.source.load()?;
        let source = specialize(&template, gpu.workgroup_size.x, gpu.workgroup_size.y);
        let label = config.source.label();
        info!("compiling kernel `{}` from {label}", config.entry_point);

        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_str()),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = gpu.device.create_bind_group_layout(&bind_group_layout_desc());

        let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sobel pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = gpu.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(config.entry_point.as_str()),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: &config.entry_point,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        let scope_error = pollster::block_on(gpu.device.pop_error_scope());
        log_compilation_messages(&module);

        if let Some(err) = scope_error {
            return Err(KernelError::Build {
                entry_point: config.entry_point.clone(),
                log: err.to_string(),
            });
        }
        debug!("kernel `{}` ready", config.entry_point);

        Ok(CompiledKernel {
            pipeline,
            bind_group_layout,
            entry_point: config.entry_point.clone(),
        })
    }
}

fn log_compilation_messages(module: &wgpu::ShaderModule) {
    let info = pollster::block_on(module.get_compilation_info());
    for msg in &info.messages {
        match msg.message_type {
            wgpu::CompilationMessageType::Error => debug!("kernel error: {}", msg.message),
            wgpu::CompilationMessageType::Warning => warn!("kernel warning: {}", msg.message),
            wgpu::CompilationMessageType::Info => debug!("kernel info: {}", msg.message),
        }
    }
}

fn bind_group_layout_desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
    const ENTRIES: &[wgpu::BindGroupLayoutEntry] = &[
        // 0 — input image
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Uint,
            },
            count: None,
        },
        // 1 — output image
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: TEXTURE_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        },
        // 2 — width / height
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        },
    ];
    wgpu::BindGroupLayoutDescriptor {
        label: Some("sobel BGL"),
        entries: ENTRIES,
    }
}
