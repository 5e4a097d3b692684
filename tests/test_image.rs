// tests/test_image.rs — Integration tests for Image<T> and Rgba8.
//
// These run with `cargo test --test test_image`.
// Unlike unit tests (inside #[cfg(test)] mod tests {}), integration tests
// live in tests/ and can only access the crate's public API — a good check
// that the public surface is usable.

use sobel_filter::image::{Image, Pixel, Rgba8};

// ===== Image construction & basic access =====

#[test]
fn image_new_zero_initialized() {
    let img: Image<u8> = Image::new(100, 50);
    assert_eq!(img.width(), 100);
    assert_eq!(img.height(), 50);
    assert_eq!(img.get(0, 0), 0);
    assert_eq!(img.get(99, 49), 0);
}

#[test]
fn image_set_get_consistency() {
    let mut img: Image<u8> = Image::new(10, 10);
    // Write a checkerboard pattern.
    for y in 0..10 {
        for x in 0..10 {
            let val = if (x + y) % 2 == 0 { 255u8 } else { 0u8 };
            img.set(x, y, val);
        }
    }
    // Verify the pattern.
    for y in 0..10 {
        for x in 0..10 {
            let expected = if (x + y) % 2 == 0 { 255u8 } else { 0u8 };
            assert_eq!(img.get(x, y), expected, "mismatch at ({x}, {y})");
        }
    }
}

#[test]
fn image_from_vec_layout() {
    // 3×2 image, row-major:
    //  [10, 20, 30]
    //  [40, 50, 60]
    let data = vec![10u8, 20, 30, 40, 50, 60];
    let img = Image::from_vec(3, 2, data);
    assert_eq!(img.get(0, 0), 10);
    assert_eq!(img.get(2, 0), 30);
    assert_eq!(img.get(0, 1), 40);
    assert_eq!(img.get(2, 1), 60);
}

// ===== Stride =====

#[test]
fn image_stride_does_not_affect_pixel_access() {
    // Width 3, stride 8: lots of padding.
    let mut img: Image<u8> = Image::new_with_stride(3, 2, 8);
    img.set(0, 0, 1);
    img.set(2, 0, 2);
    img.set(0, 1, 3);
    img.set(2, 1, 4);

    assert_eq!(img.get(0, 0), 1);
    assert_eq!(img.get(2, 0), 2);
    assert_eq!(img.get(0, 1), 3);
    assert_eq!(img.get(2, 1), 4);

    // Row slices should only be `width` long, not `stride` long.
    assert_eq!(img.row(0).len(), 3);
    assert_eq!(img.row(0), &[1, 0, 2]);
}

// ===== Iterator =====

#[test]
fn pixels_iterator_count() {
    let img: Image<u8> = Image::new(7, 3);
    let count = img.pixels().count();
    assert_eq!(count, 7 * 3);
}

#[test]
fn pixels_iterator_with_stride() {
    // Stride padding should NOT appear in the iterator.
    let mut img: Image<u8> = Image::new_with_stride(2, 2, 4);
    img.set(0, 0, 1);
    img.set(1, 0, 2);
    img.set(0, 1, 3);
    img.set(1, 1, 4);

    let pixels: Vec<_> = img.pixels().collect();
    assert_eq!(pixels.len(), 4); // NOT 8 (stride * height)
    assert_eq!(pixels[0], (0, 0, 1));
    assert_eq!(pixels[1], (1, 0, 2));
    assert_eq!(pixels[2], (0, 1, 3));
    assert_eq!(pixels[3], (1, 1, 4));
}

// ===== Clone =====

#[test]
fn clone_is_independent() {
    let mut img: Image<u8> = Image::new(4, 4);
    img.set(0, 0, 42);
    let img2 = img.clone();
    img.set(0, 0, 99);
    // Clone should not be affected by mutation of original.
    assert_eq!(img2.get(0, 0), 42);
    assert_eq!(img.get(0, 0), 99);
}

// ===== Edge cases =====

#[test]
fn empty_dimension_image() {
    let img: Image<u8> = Image::new(0, 0);
    assert_eq!(img.width(), 0);
    assert_eq!(img.height(), 0);
    assert_eq!(img.pixels().count(), 0);
}

#[test]
fn single_pixel_image() {
    let mut img: Image<u8> = Image::new(1, 1);
    img.set(0, 0, 123);
    assert_eq!(img.get(0, 0), 123);
    assert_eq!(img.row(0), &[123]);

}

// ===== Rgba8 =====

#[test]
fn rgba_image_bytes_round_trip() {
    let bytes: Vec<u8> = (0..24).collect();
    let img = Image::from_rgba_bytes(3, 2, &bytes);
    assert_eq!(img.get(2, 1), Rgba8::new(20, 21, 22, 23));
    assert_eq!(&*img.to_rgba_bytes(), bytes.as_slice());
}

#[test]
fn rgba_pixel_behaves_as_luminance() {
    // Pure primaries weigh in with the Rec. 601 coefficients.
    assert!((Rgba8::new(255, 0, 0, 255).to_f32() - 76.245).abs() < 1e-3);
    assert!((Rgba8::new(0, 255, 0, 255).to_f32() - 149.685).abs() < 1e-3);
    assert!((Rgba8::new(0, 0, 255, 255).to_f32() - 29.07).abs() < 1e-3);
}

#[test]
fn packed_vec_drops_stride_padding() {
    let img = Image::from_vec_with_stride(2, 2, 3, vec![1u8, 2, 0, 3, 4, 0]);
    assert_eq!(img.to_packed_vec(), vec![1, 2, 3, 4]);
}

#[test]
fn index_syntax_matches_get_set() {
    let mut img: Image<Rgba8> = Image::new(3, 3);
    img[(1, 2)] = Rgba8::WHITE;
    assert_eq!(img.get(1, 2), Rgba8::WHITE);
    assert_eq!(img[(0, 0)], Rgba8::default());
}

#[test]
#[should_panic(expected = "out of bounds")]
fn out_of_bounds_get_panics() {
    let img: Image<u8> = Image::new(2, 2);
    img.get(2, 0);
}
