// convolution.rs — Separable 1D convolution for Image<T>.
//
// A 2D convolution with a separable kernel K = k_col * k_row^T decomposes
// into two 1D passes:
//   convolve_rows()      horizontal pass, any Pixel type in, f32 out
//   convolve_cols()      vertical pass, f32 in, f32 out
//   convolve_separable() both, in that order
//
// The Sobel operator is separable ([-1 0 1] x [1 2 1]), so the CPU
// reference filter in gradient.rs is two calls into this module.
//
// BORDER HANDLING: Clamp (replicate edge pixels).
// Out-of-bounds taps read the nearest edge pixel. The WGSL kernel clamps
// its texel coordinates the same way, which is what lets the GPU output
// be checked against the CPU reference pixel for pixel.

use crate::image::{Image, Pixel};

fn check_kernel(kernel: &[f32]) {
    assert!(!kernel.is_empty(), "kernel must not be empty");
    assert!(kernel.len() % 2 == 1, "kernel length must be odd (got {})", kernel.len());
}

/// Index of tap `ki` around `center`, clamped into `[0, len)`.
#[inline]
fn clamped_tap(center: usize, ki: usize, half: usize, len: usize) -> usize {
    let i = center as isize + ki as isize - half as isize;
    i.clamp(0, len as isize - 1) as usize
}

/// Range of positions along an axis of length `len` whose full kernel
/// window stays inside the image. Positions outside it take the clamped
/// path.
#[inline]
fn interior(len: usize, half: usize) -> std::ops::Range<usize> {
    if len > 2 * half {
        half..len - half
    } else {
        0..0
    }
}

/// Convolve each row of `src` with a centred 1D kernel (horizontal pass).
///
/// # Panics
/// Panics if `kernel` is empty or has even length.
pub fn convolve_rows<T: Pixel>(src: &Image<T>, kernel: &[f32]) -> Image<f32> {
    check_kernel(kernel);

    let (w, h) = (src.width(), src.height());
    let half = kernel.len() / 2;
    let inner = interior(w, half);
    let mut dst = Image::<f32>::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            if inner.contains(&x) {
                // SAFETY: x - half >= 0 and x + half < w.
                unsafe {
                    for (ki, &kv) in kernel.iter().enumerate() {
                        acc += src.get_unchecked(x + ki - half, y).to_f32() * kv;
                    }
                }
            } else {
                for (ki, &kv) in kernel.iter().enumerate() {
                    acc += src.get(clamped_tap(x, ki, half, w), y).to_f32() * kv;
                }
            }
            // SAFETY: x < w, y < h by loop bounds.
            unsafe { dst.set_unchecked(x, y, acc) };
        }
    }
    dst
}

/// Convolve each column of `src` with a centred 1D kernel (vertical pass).
///
/// # Panics
/// Panics if `kernel` is empty or has even length.
pub fn convolve_cols(src: &Image<f32>, kernel: &[f32]) -> Image<f32> {
    check_kernel(kernel);

    let (w, h) = (src.width(), src.height());
    let half = kernel.len() / 2;
    let inner = interior(h, half);
    let mut dst = Image::<f32>::new(w, h);

    for y in 0..h {
        let in_rows = inner.contains(&y);
        for x in 0..w {
            let mut acc = 0.0f32;
            if in_rows {
                // SAFETY: y - half >= 0 and y + half < h.
                unsafe {
                    for (ki, &kv) in kernel.iter().enumerate() {
                        acc += src.get_unchecked(x, y + ki - half) * kv;
                    }
                }
            } else {
                for (ki, &kv) in kernel.iter().enumerate() {
                    acc += src.get(x, clamped_tap(y, ki, half, h)) * kv;
                }
            }
            // SAFETY: x < w, y < h by loop bounds.
            unsafe { dst.set_unchecked(x, y, acc) };
        }
    }
    dst
}

/// Full separable 2D convolution: `kernel_row` along x, then `kernel_col`
/// along y. The result is always `f32`; use `Pixel::from_f32` to go back.
pub fn convolve_separable<T: Pixel>(
    src: &Image<T>,
    kernel_row: &[f32],
    kernel_col: &[f32],
) -> Image<f32> {
    let intermediate = convolve_rows(src, kernel_row);
    convolve_cols(&intermediate, kernel_col)
}
