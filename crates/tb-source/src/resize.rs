use anyhow::{Context, Result};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};
use tb_core::frame::PixelBuffer;

/// Resizer réutilisable wrappant fast_image_resize.
///
/// # Example
/// ```
/// use tb_source::resize::Resizer;
/// use tb_core::frame::PixelBuffer;
/// let mut r = Resizer::new();
/// let out = r.resize(&PixelBuffer::new(100, 100), 50, 25).unwrap();
/// assert_eq!((out.width(), out.height()), (50, 25));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
        }
    }

    /// Resize `src` to `width × height` into a new buffer.
    ///
    /// Same size returns a copy; an empty source or target gives a
    /// transparent buffer of the requested size.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    pub fn resize(&mut self, src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        if src.width() == width && src.height() == height {
            return Ok(src.clone());
        }
        if src.is_empty() || width == 0 || height == 0 {
            return Ok(PixelBuffer::new(width, height));
        }

        let src_image = ImageRef::new(src.width(), src.height(), src.data(), PixelType::U8x4)
            .context("Invalid source dimensions")?;
        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        PixelBuffer::from_raw(width, height, dst_image.into_vec())
            .context("Invalid destination dimensions")
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for one-shot usage.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use tb_source::resize::resize_frame;
/// use tb_core::frame::PixelBuffer;
/// let src = PixelBuffer::new(100, 100);
/// let dst = resize_frame(&src, 50, 50).unwrap();
/// assert_eq!(dst.width(), 50);
/// ```
pub fn resize_frame(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    Resizer::new().resize(src, width, height)
}

/// Dimensions of `width × height` scaled to fit `max_width × max_height`.
///
/// Aspect ratio is kept, the result never exceeds the source size and no
/// side is ever 0 for a non-empty source.
///
/// # Example
/// ```
/// use tb_source::resize::fit_dimensions;
/// assert_eq!(fit_dimensions(1000, 500, 400, 400), (400, 200));
/// assert_eq!(fit_dimensions(100, 50, 400, 400), (100, 50));
/// assert_eq!(fit_dimensions(1000, 1, 10, 10), (10, 1));
/// ```
#[must_use]
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = (f64::from(max_width.max(1)) / f64::from(width))
        .min(f64::from(max_height.max(1)) / f64::from(height))
        .min(1.0);
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Preview scaling: shrink `src` to fit the viewport, never upscale.
///
/// # Errors
/// Returns an error if the resize operation fails.
pub fn fit_within(src: &PixelBuffer, max_width: u32, max_height: u32) -> Result<PixelBuffer> {
    let (w, h) = fit_dimensions(src.width(), src.height(), max_width, max_height);
    if (w, h) != (src.width(), src.height()) {
        log::debug!(
            "fit_within: {}×{} → {w}×{h}",
            src.width(),
            src.height()
        );
    }
    resize_frame(src, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_stays_uniform() {
        let src = PixelBuffer::filled(40, 30, [200, 100, 50, 255]);
        let out = resize_frame(&src, 13, 7).unwrap();
        assert_eq!((out.width(), out.height()), (13, 7));
        for px in out.data().chunks_exact(4) {
            for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
                assert!(got.abs_diff(want) <= 1, "{px:?}");
            }
        }
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = PixelBuffer::filled(4, 4, [1, 2, 3, 4]);
        assert_eq!(resize_frame(&src, 4, 4).unwrap(), src);
    }

    #[test]
    fn empty_source_gives_transparent_target() {
        let out = resize_frame(&PixelBuffer::new(0, 0), 3, 3).unwrap();
        assert_eq!(out, PixelBuffer::new(3, 3));
    }

    #[test]
    fn fit_within_keeps_aspect_and_never_upscales() {
        let src = PixelBuffer::filled(800, 200, [0, 0, 0, 255]);
        let out = fit_within(&src, 400, 400).unwrap();
        assert_eq!((out.width(), out.height()), (400, 100));

        let small = PixelBuffer::filled(20, 10, [0, 0, 0, 255]);
        let out = fit_within(&small, 400, 400).unwrap();
        assert_eq!((out.width(), out.height()), (20, 10));
    }

    #[test]
    fn fit_dimensions_handles_zero_viewport() {
        assert_eq!(fit_dimensions(50, 50, 0, 0), (1, 1));
        assert_eq!(fit_dimensions(0, 0, 10, 10), (0, 0));
    }
}
