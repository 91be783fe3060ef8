use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tb_core::error::CoreError;
use tb_core::frame::PixelBuffer;
use tb_core::traits::Source;

/// Décode un fichier image en mémoire vers un buffer RGBA.
///
/// The format is guessed from the magic bytes (PNG, JPEG, WebP, GIF, BMP).
/// Only the first frame of an animated file is kept.
///
/// # Errors
/// Returns [`CoreError::Decode`] if the bytes are not a supported raster
/// image. No partial buffer is ever returned.
///
/// # Example
/// ```
/// use tb_source::image::decode;
/// assert!(decode(b"not an image").is_err());
/// ```
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, CoreError> {
    let img = image::load_from_memory(bytes).map_err(|e| CoreError::Decode {
        reason: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("decode: {width}×{height} ({} octets en entrée)", bytes.len());
    PixelBuffer::from_raw(width, height, rgba.into_raw())
}

/// Lit et décode une image depuis le disque.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use tb_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    decode(&bytes).with_context(|| format!("Impossible de charger {}", path.display()))
}

/// Source d'image statique. Retourne toujours la même frame.
///
/// # Example
/// ```
/// use tb_source::image::ImageSource;
/// use tb_core::frame::PixelBuffer;
/// use tb_core::traits::Source;
/// let source = ImageSource::from_buffer(PixelBuffer::new(4, 3));
/// assert_eq!(source.native_size(), (4, 3));
/// ```
#[derive(Clone, Debug)]
pub struct ImageSource {
    frame: Arc<PixelBuffer>,
}

impl ImageSource {
    /// Decode in-memory bytes into a source.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the bytes cannot be decoded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(Self::from_buffer(decode(bytes)?))
    }

    /// Load an image from disk and create a source.
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_buffer(load_image(path)?))
    }

    /// Wrap an already decoded buffer.
    #[must_use]
    pub fn from_buffer(frame: PixelBuffer) -> Self {
        Self {
            frame: Arc::new(frame),
        }
    }
}

impl Source for ImageSource {
    fn frame(&self) -> Arc<PixelBuffer> {
        Arc::clone(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_png_to_rgba() {
        let fb = decode(&png_bytes(3, 2, [10, 20, 30, 200])).unwrap();
        assert_eq!((fb.width(), fb.height()), (3, 2));
        assert_eq!(fb.pixel(2, 1), [10, 20, 30, 200]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(&[0x89, b'P', b'N', b'G', 0, 1, 2]).unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }));
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn load_image_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, png_bytes(5, 4, [255, 0, 0, 255])).unwrap();
        let source = ImageSource::open(&path).unwrap();
        assert_eq!(source.native_size(), (5, 4));
        assert_eq!(source.frame().pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn load_image_reports_missing_file() {
        let err = load_image(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
