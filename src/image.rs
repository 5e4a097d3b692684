// image.rs — Runtime-sized image container, generic over pixel type.
//
// Every frame that passes through the filter lives in an `Image<T>`:
//
//   load_rgba()      → Image<Rgba8>   (decoded bitmap, 32-bit RGBA)
//   sobel_x/sobel_y  → Image<f32>     (signed gradients, CPU reference)
//   sobel_magnitude  → Image<Rgba8>   (opaque gray edge map)
//   GpuImage::readback → Image<Rgba8>
//
// The buffer is row-major with an explicit stride so a row may carry
// padding after its `width` active pixels:
//
//   data index:  0  1  2  3 [4]  5  6  7  8 [9]
//   pixel:       ■  ■  ■  ■  ·   ■  ■  ■  ■  ·
//   row:         |--- row 0 ---|  |--- row 1 ---|
//
// NEW RUST CONCEPTS:
// - `#[repr(C)]` + `bytemuck::Pod` on `Rgba8` — guarantees a plain 4-byte
//   layout so a `&[Rgba8]` can be viewed as `&[u8]` without copying when
//   it is handed to the GPU.
// - `impl Iterator` return types (see `pixels()`).

use std::fmt;

// ---------------------------------------------------------------------------
// Pixel Trait
// ---------------------------------------------------------------------------

/// Trait for types that can serve as pixel values in an Image.
pub trait Pixel: Copy + Default + Send + Sync + PartialOrd + 'static {
    /// Convert this pixel value to f32 (raw intensity, not normalised).
    fn to_f32(self) -> f32;

    /// Construct a pixel from an f32 value (with appropriate clamping/rounding).
    fn from_f32(v: f32) -> Self;
}

impl Pixel for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        // `as u8` truncates, so clamp and round first.
        v.clamp(0.0, 255.0).round() as u8
    }
}

impl Pixel for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

// ---------------------------------------------------------------------------
// Rgba8
// ---------------------------------------------------------------------------

/// Rec. 601 luma weights. The WGSL kernel uses the same constants.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// A 32-bit RGBA pixel, 8 bits per channel, in R, G, B, A byte order.
///
/// This is the host-side twin of the `Rgba8Uint` textures the kernel
/// reads and writes. As a [`Pixel`] it behaves like a grayscale value:
/// `to_f32` returns luminance in [0, 255] and `from_f32` produces an
/// opaque gray.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8([0, 0, 0, 255]);
    pub const WHITE: Rgba8 = Rgba8([255, 255, 255, 255]);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8([r, g, b, a])
    }

    /// Opaque gray with all three colour channels set to `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Rgba8([v, v, v, 255])
    }

    #[inline]
    pub fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(self) -> u8 {
        self.0[3]
    }

    /// Luminance in [0, 255]. Alpha is ignored.
    #[inline]
    pub fn luma(self) -> f32 {
        LUMA_R * self.r() as f32 + LUMA_G * self.g() as f32 + LUMA_B * self.b() as f32
    }
}

impl Pixel for Rgba8 {
    #[inline]
    fn to_f32(self) -> f32 {
        self.luma()
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        Rgba8::gray(u8::from_f32(v))
    }
}

// ---------------------------------------------------------------------------
// Image<T>
// ---------------------------------------------------------------------------

/// A 2D image with runtime dimensions, generic over pixel type `T`.
pub struct Image<T: Pixel> {
    /// Pixel data in row-major order. Length = height * stride.
    data: Vec<T>,
    width: usize,
    height: usize,
    /// Row stride in *elements* (not bytes). stride >= width.
    stride: usize,
}

impl<T: Pixel> Clone for Image<T> {
    fn clone(&self) -> Self {
        Image {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}

impl<T: Pixel> Image<T> {
    // --- Constructors ---

    /// Create a zero-initialized image with the given dimensions.
    /// Stride equals width (no padding).
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_with_stride(width, height, width)
    }

    /// Create a zero-initialized image with an explicit stride.
    ///
    /// # Panics
    /// Panics if `stride < width`.
    pub fn new_with_stride(width: usize, height: usize, stride: usize) -> Self {
        assert!(
            stride >= width,
            "stride ({stride}) must be >= width ({width})"
        );
        Image {
            data: vec![T::default(); height * stride],
            width,
            height,
            stride,
        }
    }

    /// Create an image from an existing pixel vector.
    ///
    /// `data` must contain exactly `height * width` elements (no stride padding).
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "data length ({}) must equal width * height ({})",
            data.len(),
            width * height,
        );
        Image {
            data,
            width,
            height,
            stride: width,
        }
    }

    /// Create an image from raw data with explicit stride.
    ///
    /// # Panics
    /// Panics if `data.len() != height * stride` or `stride < width`.
    pub fn from_vec_with_stride(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<T>,
    ) -> Self {
        assert!(stride >= width, "stride ({stride}) must be >= width ({width})");
        assert_eq!(
            data.len(),
            height * stride,
            "data length ({}) must equal height * stride ({})",
            data.len(),
            height * stride,
        );
        Image {
            data,
            width,
            height,
            stride,
        }
    }

    // --- Accessors ---

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `true` if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the pixel value at (x, y). x is column, y is row.
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.bounds_check(x, y);
        self.data[y * self.stride + x]
    }

    /// Get pixel value without bounds checking.
    ///
    /// # Safety
    /// Caller must guarantee x < width and y < height.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height,
            "get_unchecked({x},{y}) out of bounds for {}x{}", self.width, self.height);
        *self.data.get_unchecked(y * self.stride + x)
    }

    /// Set pixel value without bounds checking.
    ///
    /// # Safety
    /// Caller must guarantee x < width and y < height.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        *self.data.get_unchecked_mut(y * self.stride + x) = value;
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        self.bounds_check(x, y);
        let idx = y * self.stride + x;
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    /// Borrow the active pixels of row `y` (stride padding excluded).
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Iterate over all pixels as `(x, y, value)` tuples, skipping padding.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| (x, y, self.data[y * self.stride + x]))
        })
    }

    /// Access the underlying data as a flat slice, stride padding included.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy the active pixels into a tightly packed vector (stride == width).
    pub fn to_packed_vec(&self) -> Vec<T> {
        if self.stride == self.width {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    #[inline]
    fn bounds_check(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds for image {}×{}",
            self.width,
            self.height,
        );
    }
}

impl Image<Rgba8> {
    /// View the active pixels as packed RGBA bytes, 4 per pixel.
    ///
    /// Borrows when the image has no stride padding, copies otherwise.
    pub fn to_rgba_bytes(&self) -> std::borrow::Cow<'_, [u8]> {
        if self.stride == self.width {
            std::borrow::Cow::Borrowed(bytemuck::cast_slice(&self.data))
        } else {
            std::borrow::Cow::Owned(bytemuck::cast_slice::<Rgba8, u8>(&self.to_packed_vec()).to_vec())
        }
    }

    /// Build an image from packed RGBA bytes (`width * height * 4` of them).
    ///
    /// # Panics
    /// Panics if `bytes.len() != width * height * 4`.
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Self {
        assert_eq!(
            bytes.len(),
            width * height * 4,
            "byte length ({}) must equal width * height * 4 ({})",
            bytes.len(),
            width * height * 4,
        );
        let data = bytes
            .chunks_exact(4)
            .map(|c| Rgba8([c[0], c[1], c[2], c[3]]))
            .collect();
        Image::from_vec(width, height, data)
    }
}

impl<T: Pixel + fmt::Debug> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image<{}> {{ {}×{}, stride={} }}",
            std::any::type_name::<T>(),
            self.width,
            self.height,
            self.stride,
        )?;
        for y in 0..self.height.min(8) {
            write!(f, "  row {y}: [")?;
            for x in 0..self.width.min(16) {
                if x > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", self.get(x, y))?;
            }
            if self.width > 16 {
                write!(f, ", ...")?;
            }
            writeln!(f, "]")?;
        }
        if self.height > 8 {
            writeln!(f, "  ...")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Index / IndexMut — img[(x, y)] syntax
// ---------------------------------------------------------------------------

impl<T: Pixel> std::ops::Index<(usize, usize)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        self.bounds_check(x, y);
        &self.data[y * self.stride + x]
    }
}

impl<T: Pixel> std::ops::IndexMut<(usize, usize)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        self.bounds_check(x, y);
        let idx = y * self.stride + x;
        &mut self.data[idx]
    }
}
