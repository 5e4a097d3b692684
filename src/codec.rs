// codec.rs — Bitmap decode/encode through the `image` crate.
//
// Decoding guesses the format from the file contents, not the extension,
// and always converts to 32-bit RGBA: the kernel's input texture is
// `Rgba8Uint` no matter what the source bitmap was (8-bit palette, 24-bit
// BGR, 16-bit gray, ...). Encoding always writes BMP.

use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbaImage};
use log::debug;

use crate::image::{Image, Rgba8};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read image {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {} has zero width or height", path.display())]
    EmptyImage { path: PathBuf },
}

/// Decode the bitmap at `path` into a 32-bit RGBA image.
pub fn load_rgba(path: impl AsRef<Path>) -> Result<Image<Rgba8>, CodecError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .map_err(|source| CodecError::Open { path: path.to_path_buf(), source })?
        .with_guessed_format()
        .map_err(|source| CodecError::Open { path: path.to_path_buf(), source })?;
    debug!("decoding {} as {:?}", path.display(), reader.format());

    let decoded = reader
        .decode()
        .map_err(|source| CodecError::Decode { path: path.to_path_buf(), source })?;
    debug!("source colour type {:?}", decoded.color());

    let rgba = decoded.into_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(CodecError::EmptyImage { path: path.to_path_buf() });
    }
    Ok(Image::from_rgba_bytes(w as usize, h as usize, rgba.as_raw()))
}

/// Encode `img` as a 32-bit BMP at `path`, replacing any existing file.
pub fn save_bmp(path: impl AsRef<Path>, img: &Image<Rgba8>) -> Result<(), CodecError> {
    let path = path.as_ref();
    if img.is_empty() {
        return Err(CodecError::EmptyImage { path: path.to_path_buf() });
    }
    let bytes = img.to_rgba_bytes().into_owned();
    // Dimensions match the byte count by construction, so `from_raw` only
    // fails on an inconsistent Image, which the constructors rule out.
    let buffer = RgbaImage::from_raw(img.width() as u32, img.height() as u32, bytes)
        .ok_or_else(|| CodecError::EmptyImage { path: path.to_path_buf() })?;
    buffer
        .save_with_format(path, ImageFormat::Bmp)
        .map_err(|source| CodecError::Encode { path: path.to_path_buf(), source })?;
    debug!("wrote {}×{} BMP to {}", img.width(), img.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(w: usize, h: usize) -> Image<Rgba8> {
        let data = (0..w * h)
            .map(|i| Rgba8::new((i * 7) as u8, (i * 13) as u8, (i * 29) as u8, 255))
            .collect();
        Image::from_vec(w, h, data)
    }

    #[test]
    fn test_bmp_save_load_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.bmp");
        let img = pattern(13, 5);

        save_bmp(&path, &img).unwrap();
        let back = load_rgba(&path).unwrap();

        assert_eq!((back.width(), back.height()), (13, 5));
        for (x, y, p) in img.pixels() {
            assert_eq!(back.get(x, y), p, "pixel mismatch at ({x},{y})");
        }
    }

    #[test]
    fn test_load_converts_gray_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_raw(3, 2, vec![0, 50, 100, 150, 200, 250])
            .unwrap()
            .save(&path)
            .unwrap();

        let img = load_rgba(&path).unwrap();
        assert_eq!(img.get(1, 0), Rgba8::gray(50));
        assert_eq!(img.get(2, 1), Rgba8::gray(250));
    }

    #[test]
    fn test_format_guessed_from_contents() {
        // PNG bytes behind a misleading extension still decode.
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        image::GrayImage::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap().save(&png).unwrap();
        let disguised = dir.path().join("disguised.bmp");
        std::fs::copy(&png, &disguised).unwrap();

        let img = load_rgba(&disguised).unwrap();
        assert_eq!(img.get(1, 1), Rgba8::gray(4));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rgba(dir.path().join("nope.bmp")).unwrap_err();
        assert!(matches!(err, CodecError::Open { .. }), "got {err}");
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bmp");
        std::fs::write(&path, b"definitely not a bitmap").unwrap();
        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }), "got {err}");
    }

    #[test]
    fn test_save_rejects_empty_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_bmp(dir.path().join("empty.bmp"), &Image::<Rgba8>::new(0, 4)).unwrap_err();
        assert!(matches!(err, CodecError::EmptyImage { .. }));
    }

    #[test]
    fn test_save_into_missing_directory_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bmp");
        let err = save_bmp(&path, &pattern(2, 2)).unwrap_err();
        assert!(matches!(err, CodecError::Encode { .. }), "got {err}");
    }
}
