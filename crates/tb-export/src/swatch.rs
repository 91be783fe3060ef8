use tb_core::color::Rgb;
use tb_core::frame::PixelBuffer;

/// Image originale surmontant une rangée de carrés de palette.
///
/// The output is `W × (H + floor(W / 5))`. Square `i` covers
/// `[i * s, (i + 1) * s)` horizontally below the image, `s = floor(W / 5)`;
/// squares past the right edge are clipped and uncovered area stays
/// transparent.
///
/// # Example
/// ```
/// use tb_export::swatch::palette_swatch;
/// use tb_core::frame::PixelBuffer;
/// use tb_core::color::Rgb;
/// let src = PixelBuffer::filled(10, 4, [9, 9, 9, 255]);
/// let out = palette_swatch(&src, &[Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
/// assert_eq!((out.width(), out.height()), (10, 6));
/// assert_eq!(out.pixel(1, 5), [255, 0, 0, 255]);
/// assert_eq!(out.pixel(3, 4), [0, 0, 255, 255]);
/// assert_eq!(out.pixel(9, 5), [0, 0, 0, 0]);
/// ```
#[must_use]
pub fn palette_swatch(buffer: &PixelBuffer, palette: &[Rgb]) -> PixelBuffer {
    let (width, height) = (buffer.width(), buffer.height());
    let square = width / 5;
    PixelBuffer::from_rows(width, height + square, |y, row| {
        if y < height {
            row.copy_from_slice(buffer.row(y));
            return;
        }
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            if let Some(c) = palette.get(x / square as usize) {
                px.copy_from_slice(&[c.r, c.g, c.b, 255]);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_images_get_no_swatch_row() {
        let src = PixelBuffer::filled(4, 3, [1, 2, 3, 4]);
        let out = palette_swatch(&src, &[Rgb::WHITE]);
        assert_eq!(out, src);
    }

    #[test]
    fn five_squares_fill_the_row() {
        let src = PixelBuffer::filled(25, 2, [0, 0, 0, 255]);
        let palette: Vec<Rgb> = (0..5u8).map(|i| Rgb::gray(i * 50)).collect();
        let out = palette_swatch(&src, &palette);
        assert_eq!(out.height(), 7);
        for (i, c) in palette.iter().enumerate() {
            let x = i as u32 * 5 + 2;
            assert_eq!(out.pixel(x, 6), [c.r, c.g, c.b, 255]);
        }
        assert_eq!(out.pixel(0, 1), [0, 0, 0, 255]);
    }
}
