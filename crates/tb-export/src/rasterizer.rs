use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, point};
use anyhow::{Context, Result};
use tb_core::color::Rgb;
use tb_core::frame::{AsciiGrid, PixelBuffer};
use tb_core::sampler::BrightnessPolicy;

use crate::bitmap::{self, BITMAP_SIZE};

/// Couleur des glyphes dans l'image exportée.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportStyle {
    /// Each glyph in its cell colour.
    #[default]
    Color,
    /// Each glyph in the perceptual grey of its cell colour.
    Monochrome,
}

impl ExportStyle {
    #[inline(always)]
    fn ink(self, color: Rgb) -> Rgb {
        match self {
            Self::Color => color,
            Self::Monochrome => Rgb::gray(BrightnessPolicy::Perceptual.gray(color)),
        }
    }

    /// Apply the style to an already rendered buffer. Alpha is kept.
    ///
    /// # Example
    /// ```
    /// use tb_export::rasterizer::ExportStyle;
    /// use tb_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::filled(2, 1, [0, 255, 0, 128]);
    /// assert_eq!(ExportStyle::Monochrome.restyle(&fb).pixel(1, 0), [184, 184, 184, 128]);
    /// assert_eq!(ExportStyle::Color.restyle(&fb), fb);
    /// ```
    #[must_use]
    pub fn restyle(self, buffer: &PixelBuffer) -> PixelBuffer {
        if self == Self::Color {
            return buffer.clone();
        }
        PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
            for (out, px) in row.chunks_exact_mut(4).zip(buffer.row(y).chunks_exact(4)) {
                let ink = self.ink(Rgb::new(px[0], px[1], px[2]));
                out.copy_from_slice(&[ink.r, ink.g, ink.b, px[3]]);
            }
        })
    }
}

/// Masque de couverture d'un glyphe, 0 = vide, 255 = plein.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl GlyphMask {
    /// Coverage at normalised cell coordinates `u, v` in [0, 1).
    #[inline(always)]
    #[must_use]
    pub fn sample(&self, u: f64, v: f64) -> u8 {
        let x = ((u * f64::from(self.width)) as u32).min(self.width - 1);
        let y = ((v * f64::from(self.height)) as u32).min(self.height - 1);
        self.coverage[(y * self.width + x) as usize]
    }

    /// Mask dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

enum GlyphSource {
    Bitmap,
    Font(FontArc),
}

/// Convertit une AsciiGrid en pixels RGBA.
///
/// Glyph shapes come either from a TrueType/OpenType font or from the
/// built-in 5×5 bitmaps. Preview and export use the same rendering; only
/// the target size differs.
///
/// # Example
/// ```
/// use tb_export::rasterizer::{ExportStyle, GlyphRasterizer};
/// use tb_core::frame::AsciiGrid;
/// let r = GlyphRasterizer::bitmap();
/// let fb = r.render_grid(&AsciiGrid::new(4, 2), 40, 20, ExportStyle::Color);
/// assert_eq!(fb.pixel(5, 5), [255, 255, 255, 255]);
/// ```
pub struct GlyphRasterizer {
    source: GlyphSource,
}

impl GlyphRasterizer {
    /// Built-in bitmap glyphs, no font needed.
    #[must_use]
    pub fn bitmap() -> Self {
        Self {
            source: GlyphSource::Bitmap,
        }
    }

    /// Use a font supplied by the host.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn from_font_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data).context("Police invalide")?;
        Ok(Self {
            source: GlyphSource::Font(font),
        })
    }

    /// Load a font file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a font.
    pub fn from_font_file(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
        Self::from_font_bytes(data)
            .with_context(|| format!("Police invalide dans {}", path.display()))
    }

    /// Whether glyphs come from a font.
    #[must_use]
    pub fn has_font(&self) -> bool {
        matches!(self.source, GlyphSource::Font(_))
    }

    /// Coverage mask of `ch` for a `cell_width × cell_height` cell.
    #[must_use]
    pub fn mask(&self, ch: char, cell_width: u32, cell_height: u32) -> GlyphMask {
        match &self.source {
            GlyphSource::Bitmap => GlyphMask {
                width: BITMAP_SIZE,
                height: BITMAP_SIZE,
                coverage: bitmap::coverage(ch),
            },
            GlyphSource::Font(font) => font_mask(font, ch, cell_width.max(1), cell_height.max(1)),
        }
    }

    /// Rendu de la grille sur fond blanc, à la taille `width × height`.
    ///
    /// Each cell covers a `width / columns × height / rows` region and its
    /// glyph is blended over white with the mask coverage. Rows are
    /// rendered in parallel.
    #[must_use]
    pub fn render_grid(
        &self,
        grid: &AsciiGrid,
        width: u32,
        height: u32,
        style: ExportStyle,
    ) -> PixelBuffer {
        if grid.columns == 0 || grid.rows == 0 || width == 0 || height == 0 {
            return PixelBuffer::filled(width, height, [255, 255, 255, 255]);
        }

        let cell_w = f64::from(width) / f64::from(grid.columns);
        let cell_h = f64::from(height) / f64::from(grid.rows);
        let (mask_w, mask_h) = (cell_w.ceil() as u32, cell_h.ceil() as u32);

        let mut masks: HashMap<char, GlyphMask> = HashMap::new();
        for cell in &grid.cells {
            masks
                .entry(cell.ch)
                .or_insert_with(|| self.mask(cell.ch, mask_w, mask_h));
        }

        let (columns, rows) = (u64::from(grid.columns), u64::from(grid.rows));
        let fb = PixelBuffer::from_rows(width, height, |y, row| {
            let gy = (u64::from(y) * rows / u64::from(height)) as u32;
            let v = ((f64::from(y) + 0.5) / cell_h - f64::from(gy)).clamp(0.0, 1.0);
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let gx = (x as u64 * columns / u64::from(width)) as u32;
                let u = ((x as f64 + 0.5) / cell_w - f64::from(gx)).clamp(0.0, 1.0);
                let cell = grid.get(gx, gy);
                let alpha = masks.get(&cell.ch).map_or(0, |m| m.sample(u, v));
                let ink = style.ink(cell.color);
                px.copy_from_slice(&[
                    over_white(ink.r, alpha),
                    over_white(ink.g, alpha),
                    over_white(ink.b, alpha),
                    255,
                ]);
            }
        });
        log::debug!(
            "rasterizer: grille {}×{} → {width}×{height} ({} glyphes)",
            grid.columns,
            grid.rows,
            masks.len()
        );
        fb
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::bitmap()
    }
}

/// `ink * a + 255 * (1 - a)`, rounded.
#[inline(always)]
fn over_white(ink: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(ink) * a + 255 * (255 - a) + 127) / 255) as u8
}

fn font_mask(font: &FontArc, ch: char, width: u32, height: u32) -> GlyphMask {
    let mut coverage = vec![0u8; (width * height) as usize];
    let scale = PxScale::from(height as f32);
    let gid = font.glyph_id(ch);

    let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
    let advance = font.h_advance_unscaled(gid) * scale.x / font.height_unscaled();
    let x_offset = ((width as f32 - advance) / 2.0).max(0.0);
    let glyph = gid.with_scale_and_position(scale, point(x_offset, ascent_px));

    if let Some(outline) = font.outline_glyph(glyph) {
        let bounds = outline.px_bounds();
        #[allow(clippy::cast_possible_wrap)]
        outline.draw(|x, y, v| {
            let px = x as i32 + bounds.min.x as i32;
            let py = y as i32 + bounds.min.y as i32;
            if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                let idx = (py as u32 * width + px as u32) as usize;
                coverage[idx] = coverage[idx].max((v * 255.0).round() as u8);
            }
        });
    }
    GlyphMask {
        width,
        height,
        coverage,
    }
}

/// One-shot rendering with the built-in bitmaps.
///
/// # Example
/// ```
/// use tb_export::rasterizer::{render_grid, ExportStyle};
/// use tb_core::frame::{AsciiCell, AsciiGrid};
/// use tb_core::color::Rgb;
/// let mut grid = AsciiGrid::new(1, 1);
/// grid.set(0, 0, AsciiCell { ch: '█', color: Rgb::new(255, 0, 0) });
/// let fb = render_grid(&grid, 10, 10, ExportStyle::Color);
/// assert_eq!(fb.pixel(9, 9), [255, 0, 0, 255]);
/// ```
#[must_use]
pub fn render_grid(grid: &AsciiGrid, width: u32, height: u32, style: ExportStyle) -> PixelBuffer {
    GlyphRasterizer::bitmap().render_grid(grid, width, height, style)
}
