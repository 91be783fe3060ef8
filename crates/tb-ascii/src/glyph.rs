use tb_core::charset::GlyphRamp;

/// Glyphe de la rampe pour une luminosité dans [0, 255].
///
/// Uses the ramp's own rounding and declared order.
///
/// # Example
/// ```
/// use tb_ascii::glyph::map_to_glyph;
/// use tb_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::classic();
/// assert_eq!(map_to_glyph(0.0, &ramp), '@');
/// assert_eq!(map_to_glyph(255.0, &ramp), '.');
/// ```
#[inline(always)]
#[must_use]
pub fn map_to_glyph(brightness: f64, ramp: &GlyphRamp) -> char {
    ramp.glyph_for_tone(ramp.index_for(brightness as f32))
}

/// Index de ton biaisé par la netteté.
///
/// `floor(adjusted / 255 * (len - 1) * (sharpness / 100 + 0.5))`, clamped to
/// `[0, len - 1]`. Sharpness 50 is neutral; above it indices move toward
/// the end of the ramp.
///
/// # Example
/// ```
/// use tb_ascii::glyph::glyph_index;
/// assert_eq!(glyph_index(255.0, 50, 11), 10);
/// assert_eq!(glyph_index(255.0, 100, 11), 10);
/// assert_eq!(glyph_index(0.0, 100, 11), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_index(adjusted: f64, sharpness: u8, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let bias = f64::from(sharpness.min(100)) / 100.0 + 0.5;
    let raw = (adjusted / 255.0 * last as f64 * bias).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(last)
    }
}

#[cfg(test)]
mod tests {
    use tb_core::charset::RampOrder;

    use super::*;

    #[test]
    fn extremes_hit_ramp_ends() {
        for ramp in [GlyphRamp::classic(), GlyphRamp::detailed()] {
            let first = ramp.glyphs()[0];
            let last = ramp.glyphs()[ramp.len() - 1];
            assert_eq!(map_to_glyph(0.0, &ramp), first);
            assert_eq!(map_to_glyph(255.0, &ramp), last);

            let flipped = ramp.with_order(RampOrder::LightToDark);
            assert_eq!(map_to_glyph(0.0, &flipped), last);
            assert_eq!(map_to_glyph(255.0, &flipped), first);
        }
    }

    #[test]
    fn glyph_index_is_monotonic() {
        for sharpness in [0u8, 25, 50, 75, 100] {
            let mut prev = 0;
            for b in 0..=255u8 {
                let idx = glyph_index(f64::from(b), sharpness, 69);
                assert!(idx >= prev);
                assert!(idx < 69);
                prev = idx;
            }
        }
    }

    #[test]
    fn low_sharpness_compresses_range() {
        // bias 0.5: white lands in the middle of the ramp.
        assert_eq!(glyph_index(255.0, 0, 11), 5);
    }

    #[test]
    fn degenerate_inputs_are_clamped() {
        assert_eq!(glyph_index(f64::NAN, 50, 11), 0);
        assert_eq!(glyph_index(-3.0, 50, 11), 0);
        assert_eq!(glyph_index(1e9, 50, 11), 10);
        assert_eq!(glyph_index(255.0, 50, 0), 0);
    }
}
