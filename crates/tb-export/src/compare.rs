use anyhow::Result;
use tb_core::frame::PixelBuffer;
use tb_source::resize::resize_frame;

/// Vue avant/après : original à gauche du curseur, résultat à droite.
///
/// The split column is `round(width * position / 100)` with `position`
/// clamped to [0, 100]. `processed` is resized to the original size when
/// the dimensions differ.
///
/// # Errors
/// Returns an error if resizing `processed` fails.
///
/// # Example
/// ```
/// use tb_export::compare::compose_comparison;
/// use tb_core::frame::PixelBuffer;
/// let a = PixelBuffer::filled(10, 2, [0, 0, 0, 255]);
/// let b = PixelBuffer::filled(10, 2, [255, 255, 255, 255]);
/// let out = compose_comparison(&a, &b, 30.0).unwrap();
/// assert_eq!(out.pixel(2, 0), [0, 0, 0, 255]);
/// assert_eq!(out.pixel(3, 0), [255, 255, 255, 255]);
/// ```
pub fn compose_comparison(
    original: &PixelBuffer,
    processed: &PixelBuffer,
    position: f64,
) -> Result<PixelBuffer> {
    let (width, height) = (original.width(), original.height());
    let resized;
    let right = if (processed.width(), processed.height()) == (width, height) {
        processed
    } else {
        log::debug!(
            "compare: redimensionnement {}×{} → {width}×{height}",
            processed.width(),
            processed.height()
        );
        resized = resize_frame(processed, width, height)?;
        &resized
    };

    let position = if position.is_nan() { 50.0 } else { position.clamp(0.0, 100.0) };
    let split = ((f64::from(width) * position / 100.0).round() as usize).min(width as usize) * 4;

    Ok(PixelBuffer::from_rows(width, height, |y, row| {
        row[..split].copy_from_slice(&original.row(y)[..split]);
        row[split..].copy_from_slice(&right.row(y)[split..]);
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_show_one_side() {
        let a = PixelBuffer::filled(6, 3, [10, 0, 0, 255]);
        let b = PixelBuffer::filled(6, 3, [0, 10, 0, 255]);
        assert_eq!(compose_comparison(&a, &b, 100.0).unwrap(), a);
        assert_eq!(compose_comparison(&a, &b, 0.0).unwrap(), b);
        assert_eq!(compose_comparison(&a, &b, 250.0).unwrap(), a);
        assert_eq!(compose_comparison(&a, &b, -5.0).unwrap(), b);
    }

    #[test]
    fn processed_is_resized_to_original() {
        let a = PixelBuffer::filled(8, 4, [0, 0, 0, 255]);
        let b = PixelBuffer::filled(16, 8, [200, 200, 200, 255]);
        let out = compose_comparison(&a, &b, 50.0).unwrap();
        assert_eq!((out.width(), out.height()), (8, 4));
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        let [r, _, _, a] = out.pixel(7, 3);
        assert!(r.abs_diff(200) <= 1);
        assert_eq!(a, 255);
    }
}
