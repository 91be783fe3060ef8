use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 11 caractères : rampe compacte du convertisseur historique.
pub const RAMP_CLASSIC: &str = "@#S%?*+;:,.";

/// 69 caractères : rampe détaillée, bloc dense en tête.
pub const RAMP_DETAILED: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Which tone the glyph at index 0 stands for.
///
/// Reversing the order of a ramp inverts the rendered image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RampOrder {
    /// Index 0 renders the darkest brightness.
    #[default]
    DarkToLight,
    /// Index 0 renders the lightest brightness.
    LightToDark,
}

/// Rounding applied by [`GlyphRamp::index_for`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum GlyphRounding {
    /// `floor`, the compact ramp's historical rule.
    #[default]
    Floor,
    /// Round half away from zero.
    Round,
    /// `ceil`, the detailed ramp's historical rule.
    Ceil,
}

impl GlyphRounding {
    #[inline(always)]
    fn apply(self, v: f32) -> f32 {
        match self {
            Self::Floor => v.floor(),
            Self::Round => v.round(),
            Self::Ceil => v.ceil(),
        }
    }
}

/// Named ramp presets, selectable from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RampPreset {
    /// [`RAMP_CLASSIC`].
    Classic,
    /// [`RAMP_DETAILED`].
    #[default]
    Detailed,
    /// User supplied glyphs, index 0 = darkest.
    Custom(String),
}

/// Rampe ordonnée de glyphes (GlyphMap). Jamais vide.
///
/// # Example
/// ```
/// use tb_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::classic();
/// assert_eq!(ramp.len(), 11);
/// assert_eq!(ramp.glyph(0), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
    order: RampOrder,
    rounding: GlyphRounding,
}

impl GlyphRamp {
    /// Build a ramp from a glyph string.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if `glyphs` is empty.
    ///
    /// # Example
    /// ```
    /// use tb_core::charset::{GlyphRamp, GlyphRounding, RampOrder};
    /// assert!(GlyphRamp::new("", RampOrder::DarkToLight, GlyphRounding::Floor).is_err());
    /// ```
    pub fn new(glyphs: &str, order: RampOrder, rounding: GlyphRounding) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::Config("rampe de glyphes vide".into()));
        }
        Ok(Self {
            glyphs,
            order,
            rounding,
        })
    }

    /// The 11-glyph historical ramp, floor rounding.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            glyphs: RAMP_CLASSIC.chars().collect(),
            order: RampOrder::DarkToLight,
            rounding: GlyphRounding::Floor,
        }
    }

    /// The 69-glyph ramp, ceil rounding.
    #[must_use]
    pub fn detailed() -> Self {
        Self {
            glyphs: RAMP_DETAILED.chars().collect(),
            order: RampOrder::DarkToLight,
            rounding: GlyphRounding::Ceil,
        }
    }

    /// Resolve a preset. An empty custom ramp falls back to the detailed one.
    #[must_use]
    pub fn from_preset(preset: &RampPreset) -> Self {
        match preset {
            RampPreset::Classic => Self::classic(),
            RampPreset::Detailed => Self::detailed(),
            RampPreset::Custom(glyphs) => {
                Self::new(glyphs, RampOrder::DarkToLight, GlyphRounding::Floor).unwrap_or_else(
                    |e| {
                        log::warn!("{e}, rampe détaillée utilisée");
                        Self::detailed()
                    },
                )
            }
        }
    }

    /// Same glyphs, declared in the opposite tone order.
    #[must_use]
    pub fn with_order(mut self, order: RampOrder) -> Self {
        self.order = order;
        self
    }

    /// Number of glyphs (≥ 1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; present for API symmetry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Declared tone order.
    #[inline]
    #[must_use]
    pub fn order(&self) -> RampOrder {
        self.order
    }

    /// Glyph stored at `index`, clamped into range.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Glyph for a tone index, where tone 0 is the darkest.
    ///
    /// Applies the declared order, so callers never reverse by hand.
    ///
    /// # Example
    /// ```
    /// use tb_core::charset::{GlyphRamp, RampOrder};
    /// let ramp = GlyphRamp::classic();
    /// assert_eq!(ramp.glyph_for_tone(0), '@');
    /// let flipped = ramp.with_order(RampOrder::LightToDark);
    /// assert_eq!(flipped.glyph_for_tone(0), '.');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn glyph_for_tone(&self, tone_index: usize) -> char {
        let last = self.glyphs.len() - 1;
        let tone_index = tone_index.min(last);
        match self.order {
            RampOrder::DarkToLight => self.glyphs[tone_index],
            RampOrder::LightToDark => self.glyphs[last - tone_index],
        }
    }

    /// Tone index for a brightness in [0, 255], using the ramp's rounding.
    ///
    /// `rounding((len - 1) * brightness / 255)`, clamped to `[0, len - 1]`.
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, brightness: f32) -> usize {
        let last = self.glyphs.len() - 1;
        let raw = self.rounding.apply(last as f32 * brightness / 255.0);
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    /// The glyphs, in storage order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::detailed()
    }
}
