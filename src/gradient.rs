// gradient.rs — Sobel gradients and the CPU reference edge filter.
//
// Sobel kernels are separable:
//   Sobel_x: row [-1, 0, 1] (derivative along x), col [1, 2, 1] (smooth)
//   Sobel_y: row [ 1, 2, 1] (smooth),             col [-1, 0, 1] (derivative)
//
// `sobel_magnitude` is the host-side twin of shaders/sobel.wgsl: luminance
// in, |∇I| = sqrt(Ix² + Iy²) clamped to [0, 255] out, written as opaque
// gray RGBA. It backs the `cpu` backend and is the oracle the GPU tests
// compare against.

use crate::convolution::convolve_separable;
use crate::image::{Image, Pixel, Rgba8};

const SOBEL_DERIV: [f32; 3] = [-1.0, 0.0, 1.0];
const SOBEL_SMOOTH: [f32; 3] = [1.0, 2.0, 1.0];

/// Horizontal gradient Ix. Positive where intensity increases to the right.
///
/// Output is unnormalized (range roughly [-1020, 1020] for 8-bit input).
pub fn sobel_x<T: Pixel>(src: &Image<T>) -> Image<f32> {
    convolve_separable(src, &SOBEL_DERIV, &SOBEL_SMOOTH)
}

/// Vertical gradient Iy. Positive where intensity increases downward.
pub fn sobel_y<T: Pixel>(src: &Image<T>) -> Image<f32> {
    convolve_separable(src, &SOBEL_SMOOTH, &SOBEL_DERIV)
}

pub fn sobel_xy<T: Pixel>(src: &Image<T>) -> (Image<f32>, Image<f32>) {
    (sobel_x(src), sobel_y(src))
}

/// Sobel edge magnitude as an opaque gray RGBA image, same size as `src`.
pub fn sobel_magnitude<T: Pixel>(src: &Image<T>) -> Image<Rgba8> {
    let (ix, iy) = sobel_xy(src);
    let data = ix
        .pixels()
        .zip(iy.pixels())
        .map(|((_, _, gx), (_, _, gy))| Rgba8::from_f32((gx * gx + gy * gy).sqrt()))
        .collect();
    Image::from_vec(src.width(), src.height(), data)
}
