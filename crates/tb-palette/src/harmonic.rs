use tb_core::color::Rgb;

/// Palette harmonique de cinq couleurs autour d'une ancre.
///
/// `palette` is sorted by distance to `anchor` (stable, so equal
/// distances keep their order). The result is
/// `[anchor, s[1], s[n/3], s[2n/3], s[n-1]]`, indices clamped for short
/// palettes. An empty palette gives five copies of the anchor.
///
/// This is a ranking heuristic over the extracted palette, not a
/// colour-theory harmony.
///
/// # Example
/// ```
/// use tb_palette::harmonic::harmonic_palette;
/// use tb_core::color::Rgb;
/// let anchor = Rgb::new(255, 0, 0);
/// let out = harmonic_palette(anchor, &[]);
/// assert_eq!(out, [anchor; 5]);
/// ```
#[must_use]
pub fn harmonic_palette(anchor: Rgb, palette: &[Rgb]) -> [Rgb; 5] {
    if palette.is_empty() {
        return [anchor; 5];
    }
    let mut sorted = palette.to_vec();
    sorted.sort_by_key(|c| anchor.distance_sq(*c));

    let n = sorted.len();
    let at = |i: usize| sorted[i.min(n - 1)];
    [anchor, at(1), at(n / 3), at(2 * n / 3), at(n - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_by_distance_rank() {
        let anchor = Rgb::BLACK;
        let palette: Vec<Rgb> = (0..20u8).rev().map(|v| Rgb::gray(v * 10)).collect();
        let out = harmonic_palette(anchor, &palette);
        // sorted ascending: gray(0), gray(10), ..., gray(190)
        assert_eq!(
            out,
            [
                anchor,
                Rgb::gray(10),
                Rgb::gray(60),
                Rgb::gray(130),
                Rgb::gray(190),
            ]
        );
    }

    #[test]
    fn single_colour_palette_is_clamped() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(harmonic_palette(Rgb::WHITE, &[c]), [Rgb::WHITE, c, c, c, c]);
    }

    #[test]
    fn ties_keep_palette_order() {
        let a = Rgb::new(10, 0, 0);
        let b = Rgb::new(0, 10, 0);
        let out = harmonic_palette(Rgb::BLACK, &[a, b]);
        assert_eq!(out, [Rgb::BLACK, b, a, b, b]);
    }
}
