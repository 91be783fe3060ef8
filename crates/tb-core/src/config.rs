use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::RampPreset;
use crate::sampler::BrightnessPolicy;

/// Comment le nombre de cellules ASCII est dérivé de l'image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum CellLayout {
    /// Monospace font size in pixels; cell = `0.6 × size` by `size`.
    FontSize(u32),
    /// Fixed number of characters per row; rows follow the aspect ratio.
    Columns(u32),
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::FontSize(12)
    }
}

/// Color handling of the ASCII output.
///
/// # Example
/// ```
/// use tb_core::config::ColorMode;
/// assert_eq!(ColorMode::default(), ColorMode::Color);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorMode {
    /// Cell colour blended with the tone by `colorization`.
    #[default]
    Color,
    /// Grey tone on all channels.
    Monochrome,
}

/// Paramètres du convertisseur ASCII.
///
/// # Example
/// ```
/// use tb_core::config::AsciiConfig;
/// let config = AsciiConfig::default();
/// assert_eq!(config.sharpness, 50);
/// assert_eq!(config.white_point, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// Cell layout.
    pub layout: CellLayout,
    /// Glyph index bias [0, 100]. 50 = neutre.
    pub sharpness: u8,
    /// Mix between cell colour and tone [0, 100]. 100 = pleine couleur.
    pub colorization: u8,
    /// Levels black point, percent [0, 100].
    pub black_point: u8,
    /// Levels white point, percent [0, 100].
    pub white_point: u8,
    /// Color or monochrome output.
    pub color_mode: ColorMode,
    /// Glyph ramp.
    pub ramp: RampPreset,
    /// Render the ramp light-to-dark, inverting the image.
    pub invert: bool,
    /// Brightness formula used for sampling.
    pub brightness: BrightnessPolicy,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            layout: CellLayout::default(),
            sharpness: 50,
            colorization: 100,
            black_point: 0,
            white_point: 100,
            color_mode: ColorMode::Color,
            ramp: RampPreset::Detailed,
            invert: false,
            brightness: BrightnessPolicy::Perceptual,
        }
    }
}

impl AsciiConfig {
    /// The historical column converter: compact ramp, unweighted brightness.
    ///
    /// # Example
    /// ```
    /// use tb_core::config::{AsciiConfig, CellLayout};
    /// let config = AsciiConfig::classic(100);
    /// assert_eq!(config.layout, CellLayout::Columns(100));
    /// ```
    #[must_use]
    pub fn classic(columns: u32) -> Self {
        Self {
            layout: CellLayout::Columns(columns),
            ramp: RampPreset::Classic,
            brightness: BrightnessPolicy::Average,
            ..Self::default()
        }
    }

    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.layout = match self.layout {
            CellLayout::FontSize(px) => CellLayout::FontSize(px.clamp(8, 24)),
            CellLayout::Columns(n) => CellLayout::Columns(n.clamp(1, 1000)),
        };
        self.sharpness = self.sharpness.min(100);
        self.colorization = self.colorization.min(100);
        self.black_point = self.black_point.min(100);
        self.white_point = self.white_point.min(100);
    }
}

/// Paramètres du motif de points.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DotConfig {
    /// Tile size and dot diameter in pixels [1, 50].
    pub dot_size: u32,
    /// RGBA colour left between dots.
    pub background: [u8; 4],
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            dot_size: 5,
            background: [0, 0, 0, 0],
        }
    }
}

impl DotConfig {
    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.dot_size = self.dot_size.clamp(1, 50);
    }
}

/// Paramètres du flou gaussien.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Kernel radius [0.5, 10.0]; the kernel is `2 * max(1, floor(r)) + 1` wide.
    pub radius: f64,
    /// Gaussian standard deviation [0.1, 10.0].
    pub sigma: f64,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            sigma: 5.0,
        }
    }
}

impl BlurConfig {
    /// Clamp all numeric fields to their valid ranges. NaN falls back to
    /// the default value.
    pub fn clamp_all(&mut self) {
        let defaults = Self::default();
        self.radius = finite_or(self.radius, defaults.radius).clamp(0.5, 10.0);
        self.sigma = finite_or(self.sigma, defaults.sigma).clamp(0.1, 10.0);
    }
}

/// Paramètres de l'extraction de palette.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Number of clusters `k`.
    pub cluster_count: usize,
    /// Keep every n-th pixel ("quality").
    pub sample_stride: usize,
    /// Upper bound on k-means iterations.
    pub max_iterations: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            cluster_count: 5,
            sample_stride: 10,
            max_iterations: 20,
        }
    }
}

impl PaletteConfig {
    /// Larger palette from which the harmonic five are picked.
    #[must_use]
    pub fn harmonic_source() -> Self {
        Self {
            cluster_count: 20,
            ..Self::default()
        }
    }

    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.cluster_count = self.cluster_count.clamp(1, 64);
        self.sample_stride = self.sample_stride.clamp(1, 1000);
        self.max_iterations = self.max_iterations.clamp(1, 100);
    }
}

/// Enregistrement de configuration d'un outil, choisi par l'appelant.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum ToolConfig {
    /// ASCII art conversion.
    Ascii(AsciiConfig),
    /// Dot pattern halftone.
    Dots(DotConfig),
    /// Gaussian blur.
    Blur(BlurConfig),
    /// k-means palette extraction.
    Palette(PaletteConfig),
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::Ascii(AsciiConfig::default())
    }
}

impl ToolConfig {
    /// Clamp the inner record.
    pub fn clamp_all(&mut self) {
        match self {
            Self::Ascii(c) => c.clamp_all(),
            Self::Dots(c) => c.clamp_all(),
            Self::Blur(c) => c.clamp_all(),
            Self::Palette(c) => c.clamp_all(),
        }
    }

    /// Nom court de l'outil.
    #[must_use]
    pub fn tool(&self) -> ToolKind {
        match self {
            Self::Ascii(_) => ToolKind::Ascii,
            Self::Dots(_) => ToolKind::Dots,
            Self::Blur(_) => ToolKind::Blur,
            Self::Palette(_) => ToolKind::Palette,
        }
    }
}

/// Tool selector used in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// `ascii`.
    #[default]
    Ascii,
    /// `dots`.
    Dots,
    /// `blur`.
    Blur,
    /// `palette`.
    Palette,
}

/// Configuration complète de la boîte à outils.
///
/// Every section is optional in the TOML file; missing values take their
/// defaults and everything is clamped after parsing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolboxConfig {
    /// Outil actif.
    pub tool: ToolKind,
    /// `[ascii]` section.
    pub ascii: AsciiConfig,
    /// `[dots]` section.
    pub dots: DotConfig,
    /// `[blur]` section.
    pub blur: BlurConfig,
    /// `[palette]` section.
    pub palette: PaletteConfig,
}

impl ToolboxConfig {
    /// Clamp every section.
    pub fn clamp_all(&mut self) {
        self.ascii.clamp_all();
        self.dots.clamp_all();
        self.blur.clamp_all();
        self.palette.clamp_all();
    }

    /// The record of the active tool.
    ///
    /// # Example
    /// ```
    /// use tb_core::config::{ToolboxConfig, ToolConfig};
    /// let config = ToolboxConfig::default();
    /// assert!(matches!(config.active(), ToolConfig::Ascii(_)));
    /// ```
    #[must_use]
    pub fn active(&self) -> ToolConfig {
        match self.tool {
            ToolKind::Ascii => ToolConfig::Ascii(self.ascii.clone()),
            ToolKind::Dots => ToolConfig::Dots(self.dots.clone()),
            ToolKind::Blur => ToolConfig::Blur(self.blur.clone()),
            ToolKind::Palette => ToolConfig::Palette(self.palette.clone()),
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Parse une configuration TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use tb_core::config::{parse_config, ToolKind};
/// let config = parse_config("tool = \"dots\"\n[dots]\ndot_size = 80\n").unwrap();
/// assert_eq!(config.tool, ToolKind::Dots);
/// assert_eq!(config.dots.dot_size, 50);
/// ```
pub fn parse_config(content: &str) -> Result<ToolboxConfig> {
    let mut config: ToolboxConfig =
        toml::from_str(content).context("Erreur de parsing TOML de la configuration")?;
    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use tb_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ToolboxConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ToolboxConfig::default());
    }

    #[test]
    fn sections_override_partially() {
        let config = parse_config(
            r#"
tool = "blur"

[ascii]
sharpness = 80
ramp = "Classic"
layout = { Columns = 120 }

[blur]
sigma = 42.0
"#,
        )
        .unwrap();
        assert_eq!(config.tool, ToolKind::Blur);
        assert_eq!(config.ascii.sharpness, 80);
        assert_eq!(config.ascii.ramp, RampPreset::Classic);
        assert_eq!(config.ascii.layout, CellLayout::Columns(120));
        assert_eq!(config.ascii.colorization, 100);
        assert!((config.blur.sigma - 10.0).abs() < f64::EPSILON);
        assert!((config.blur.radius - 2.0).abs() < f64::EPSILON);
        assert!(matches!(config.active(), ToolConfig::Blur(_)));
    }

    #[test]
    fn clamp_bounds_every_field() {
        let mut ascii = AsciiConfig {
            layout: CellLayout::FontSize(3),
            sharpness: 200,
            colorization: 101,
            black_point: 255,
            white_point: 150,
            ..AsciiConfig::default()
        };
        ascii.clamp_all();
        assert_eq!(ascii.layout, CellLayout::FontSize(8));
        assert_eq!(
            (ascii.sharpness, ascii.colorization, ascii.black_point, ascii.white_point),
            (100, 100, 100, 100)
        );

        let mut blur = BlurConfig {
            radius: f64::NAN,
            sigma: 0.0,
        };
        blur.clamp_all();
        assert!((blur.radius - 2.0).abs() < f64::EPSILON);
        assert!((blur.sigma - 0.1).abs() < f64::EPSILON);

        let mut palette = PaletteConfig {
            cluster_count: 0,
            sample_stride: 0,
            max_iterations: 0,
        };
        palette.clamp_all();
        assert_eq!(
            (palette.cluster_count, palette.sample_stride, palette.max_iterations),
            (1, 1, 1)
        );
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tool = \"palette\"\n[palette]\ncluster_count = 8").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tool, ToolKind::Palette);
        assert_eq!(config.palette.cluster_count, 8);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/toolbox.toml")).unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
