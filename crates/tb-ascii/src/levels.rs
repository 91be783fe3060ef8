/// Étirement des niveaux noir/blanc d'une luminosité.
///
/// `black_point` and `white_point` are percentages in [0, 100]. The black
/// point maps to 0 and the white point to 255, linearly, clamped.
///
/// When `white_point <= black_point` the range is empty and the stretch
/// becomes a hard threshold at the black point: at or above it is 255,
/// below it is 0.
///
/// # Example
/// ```
/// use tb_ascii::levels::levels_stretch;
/// assert_eq!(levels_stretch(128.0, 0, 100), 128.0);
/// assert_eq!(levels_stretch(127.5, 50, 50), 255.0);
/// assert_eq!(levels_stretch(10.0, 50, 50), 0.0);
/// ```
#[inline]
#[must_use]
pub fn levels_stretch(brightness: f64, black_point: u8, white_point: u8) -> f64 {
    if brightness.is_nan() {
        return 0.0;
    }
    let lo = percent_to_level(black_point);
    let hi = percent_to_level(white_point);
    if hi <= lo {
        return if brightness >= lo { 255.0 } else { 0.0 };
    }
    ((brightness - lo) * 255.0 / (hi - lo)).clamp(0.0, 255.0)
}

/// `p * 2.55`, computed as `p * 255 / 100` so whole percentages stay exact.
#[inline(always)]
fn percent_to_level(p: u8) -> f64 {
    f64::from(p.min(100)) * 255.0 / 100.0
}
