//! Camera image decoding via the `image` crate.

use crate::error::DataError;
use crate::types::FrameImage;
use std::path::Path;
use tracing::debug;

/// Decode any supported image file into tightly packed RGB8.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn decode_image(path: &Path) -> Result<FrameImage, DataError> {
    let decoded = ::image::open(path).map_err(|source| DataError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!("Decoded {}x{} image", width, height);
    Ok(FrameImage::new(width, height, rgb.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("000000.png");
        let mut img = ::image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, ::image::Rgba([10, 20, 30, 128]));
        img.save(&path).unwrap();

        let frame = decode_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert!(frame.is_consistent());
        let last = &frame.pixels[frame.pixels.len() - 3..];
        assert_eq!(last, &[10, 20, 30]);
    }

    #[test]
    fn test_decode_failure_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(decode_image(&path), Err(DataError::Image { .. })));
        assert!(decode_image(&dir.path().join("absent.png")).is_err());
    }
}
