//! sobel-filter CLI — run Sobel edge detection on one image.
//!
//! ```text
//! sobel-filter photos/cat.png            # writes ./sobel_cat.bmp
//! sobel-filter --backend cpu cat.png     # host reference filter, no GPU
//! sobel-filter --kernel edges.wgsl --entry-point main cat.png
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, warn, LevelFilter};

use sobel_filter::gpu::{DeviceConfig, DeviceKind, KernelConfig, KernelSource, WorkgroupSize};
use sobel_filter::{process_file, Backend, FilterConfig};

#[derive(Debug, Parser)]
#[command(name = "sobel-filter")]
#[command(about = "Sobel edge detection on the GPU; writes sobel_<name>.bmp")]
#[command(version)]
struct Cli {
    /// Path to the input image file.
    image: PathBuf,

    /// Anything after the image path is accepted and ignored.
    #[arg(hide = true)]
    extra: Vec<OsString>,

    /// WGSL kernel file to compile instead of the built-in Sobel kernel.
    #[arg(long)]
    kernel: Option<PathBuf>,

    /// Kernel entry point name.
    #[arg(long, default_value = sobel_filter::gpu::kernel::DEFAULT_ENTRY_POINT)]
    entry_point: String,

    /// Adapter preference: a hardware GPU, a software adapter, or GPU with CPU fallback.
    #[arg(long, value_enum, default_value_t = DeviceArg::Auto)]
    device: DeviceArg,

    /// Where the filter runs: a compute adapter, or the host reference implementation.
    #[arg(long, value_enum, default_value_t = BackendArg::Gpu)]
    backend: BackendArg,

    /// Workgroup size as <X>x<Y>.
    #[arg(long, default_value = "16x8")]
    workgroup: WorkgroupSize,

    /// Directory to write the output image into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceArg {
    Auto,
    Gpu,
    Cpu,
}

impl From<DeviceArg> for DeviceKind {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => DeviceKind::Auto,
            DeviceArg::Gpu => DeviceKind::Gpu,
            DeviceArg::Cpu => DeviceKind::Cpu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Gpu,
    Cpu,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Gpu => Backend::Gpu,
            BackendArg::Cpu => Backend::Cpu,
        }
    }
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn to_config(&self) -> FilterConfig {
        let source = match &self.kernel {
            Some(path) => KernelSource::File(path.clone()),
            None => KernelSource::Embedded,
        };
        FilterConfig {
            backend: self.backend.into(),
            device: DeviceConfig {
                kind: self.device.into(),
                workgroup_size: self.workgroup,
                ..DeviceConfig::default()
            },
            kernel: KernelConfig {
                source,
                entry_point: self.entry_point.clone(),
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

fn init_logging(level: LevelFilter) {
    // RUST_LOG, when set, overrides the flag-derived level.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn report(err: &dyn std::error::Error) {
    error!("{err}");
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {cause}");
        source = cause.source();
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version print to stdout and succeed; every usage
            // error, including a missing image path, exits with 1.
            let code = if e.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
            let _ = e.print();
            return code;
        }
    };

    init_logging(cli.log_level());
    info!("beginning program");
    if !cli.extra.is_empty() {
        warn!("ignoring {} argument(s) after the image path", cli.extra.len());
    }

    match process_file(&cli.to_config(), &cli.image) {
        Ok(out) => {
            println!("Filter successfully ran and image saved to: {}", out.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::from(1)
        }
    }
}
