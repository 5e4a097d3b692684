// sobel-filter: Sobel edge detection as a wgpu compute kernel.
//
// Loads a bitmap, runs an edge kernel on a compute adapter, and writes the
// result as `sobel_<name>.bmp`. A host reference implementation of the same
// filter backs the `cpu` backend and validates the GPU output in tests.

pub mod image;
pub mod convolution;
pub mod gradient;
pub mod codec;
pub mod output;
pub mod gpu;
pub mod config;
pub mod error;
pub mod filter;

pub use config::{Backend, FilterConfig};
pub use error::SobelError;
pub use filter::{process_file, SobelFilter};
