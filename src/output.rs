// output.rs — Output file naming.
//
// The result is always a BMP named after the input's file name:
//
//   photos/cat.png   → sobel_cat.bmp
//   scan             → sobel_scan.bmp
//   a.b.c            → sobel_a.b.bmp
//   .hidden          → sobel_.bmp
//
// Only '/' separates directories, and only the last '.' of the file name
// starts the extension. A dot in a directory name is never mistaken for one.

use std::path::{Path, PathBuf};

pub const OUTPUT_PREFIX: &str = "sobel_";
pub const OUTPUT_EXTENSION: &str = "bmp";

/// File name (no directory) of the output image for `input`.
pub fn output_file_name(input: &str) -> String {
    let name = match input.rfind('/') {
        Some(slash) => &input[slash + 1..],
        None => input,
    };
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    };
    format!("{OUTPUT_PREFIX}{stem}.{OUTPUT_EXTENSION}")
}

/// Output path for `input` inside `output_dir`.
pub fn output_path(input: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(output_file_name(input))
}
