use std::fmt;

use crate::frame::PixelBuffer;

/// Triplet RGB 8 bits.
///
/// # Example
/// ```
/// use tb_core::color::Rgb;
/// let c = Rgb::new(255, 128, 0);
/// assert_eq!(c.to_hex(), "#ff8000");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey level `v` on all three channels.
    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Squared Euclidean distance in raw RGB space.
    ///
    /// Exact integer arithmetic, so comparisons never suffer from rounding.
    ///
    /// # Example
    /// ```
    /// use tb_core::color::Rgb;
    /// assert_eq!(Rgb::BLACK.distance_sq(Rgb::new(3, 4, 0)), 25);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn distance_sq(self, other: Self) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Euclidean distance in raw RGB space.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        f64::from(self.distance_sq(other)).sqrt()
    }

    /// `#rrggbb`, lowercase.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive).
    ///
    /// # Example
    /// ```
    /// use tb_core::color::Rgb;
    /// assert_eq!(Rgb::from_hex("#FF0080"), Some(Rgb::new(255, 0, 128)));
    /// assert_eq!(Rgb::from_hex("nope"), None);
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convertit en HSL : H ∈ [0, 360), S ∈ [0, 100], L ∈ [0, 100].
    ///
    /// Achromatic colours have hue and saturation 0.
    ///
    /// # Example
    /// ```
    /// use tb_core::color::Rgb;
    /// let (h, s, l) = Rgb::new(255, 0, 0).to_hsl();
    /// assert!((h - 0.0).abs() < 1e-9);
    /// assert!((s - 100.0).abs() < 1e-9);
    /// assert!((l - 50.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if self.r == self.g && self.g == self.b {
            return (0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0 * 360.0, s * 100.0, l * 100.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// CSS representations of a picked colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorInfo {
    /// `rgb(r, g, b)`.
    pub rgb: String,
    /// `#rrggbb`.
    pub hex: String,
    /// `hsl(h, s%, l%)`, rounded to integers.
    pub hsl: String,
}

impl From<Rgb> for ColorInfo {
    fn from(color: Rgb) -> Self {
        let (h, s, l) = color.to_hsl();
        Self {
            rgb: color.to_string(),
            hex: color.to_hex(),
            hsl: format!("hsl({}, {}%, {}%)", h.round(), s.round(), l.round()),
        }
    }
}

/// Couleur du pixel (x, y), alpha ignoré. `None` hors de l'image.
///
/// # Example
/// ```
/// use tb_core::color::{pixel_at, Rgb};
/// use tb_core::frame::PixelBuffer;
/// let fb = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
/// assert_eq!(pixel_at(&fb, 3, 3), Some(Rgb::new(10, 20, 30)));
/// assert_eq!(pixel_at(&fb, 4, 0), None);
/// ```
#[must_use]
pub fn pixel_at(buffer: &PixelBuffer, x: u32, y: u32) -> Option<Rgb> {
    if x >= buffer.width() || y >= buffer.height() {
        return None;
    }
    let [r, g, b, _] = buffer.pixel(x, y);
    Some(Rgb::new(r, g, b))
}
