use tb_core::color::Rgb;
use tb_core::config::ColorMode;

/// Couleur d'une cellule selon le mode choisi.
///
/// `Color`: each channel is `mean * c + tone * (1 - c)` with
/// `c = colorization / 100`, rounded half-up. `Monochrome`: the tone on
/// all three channels.
///
/// # Example
/// ```
/// use tb_ascii::color_map::colorize;
/// use tb_core::color::Rgb;
/// use tb_core::config::ColorMode;
/// let red = Rgb::new(200, 50, 50);
/// assert_eq!(colorize(red, 90, 100, ColorMode::Color), red);
/// assert_eq!(colorize(red, 90, 0, ColorMode::Color), Rgb::gray(90));
/// assert_eq!(colorize(red, 90, 100, ColorMode::Monochrome), Rgb::gray(90));
/// ```
#[inline(always)]
#[must_use]
pub fn colorize(mean: Rgb, tone: u8, colorization: u8, mode: ColorMode) -> Rgb {
    match mode {
        ColorMode::Monochrome => Rgb::gray(tone),
        ColorMode::Color => {
            let c = f64::from(colorization.min(100)) / 100.0;
            let t = f64::from(tone) * (1.0 - c);
            let mix = |m: u8| (f64::from(m) * c + t + 0.5).floor().clamp(0.0, 255.0) as u8;
            Rgb::new(mix(mean.r), mix(mean.g), mix(mean.b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_colorization_blends_evenly() {
        let out = colorize(Rgb::new(200, 0, 100), 100, 50, ColorMode::Color);
        assert_eq!(out, Rgb::new(150, 50, 100));
    }

    #[test]
    fn out_of_range_colorization_is_full_color() {
        let mean = Rgb::new(1, 2, 3);
        assert_eq!(colorize(mean, 250, 255, ColorMode::Color), mean);
    }
}
