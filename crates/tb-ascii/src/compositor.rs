use rayon::prelude::*;
use tb_core::charset::{GlyphRamp, RampOrder};
use tb_core::config::{AsciiConfig, CellLayout};
use tb_core::frame::{AsciiCell, AsciiGrid, PixelBuffer};
use tb_core::sampler::{self, Partition};
use tb_core::traits::Transform;

use crate::color_map::colorize;
use crate::glyph::glyph_index;
use crate::levels::levels_stretch;

/// Advance of a monospace glyph, as a fraction of the font size.
const MONO_ADVANCE: f64 = 0.6;

/// Nombre de cellules `(columns, rows)` pour une image `width × height`.
///
/// `FontSize(px)`: one cell per `0.6 px × px` region. `Columns(n)`: `n`
/// cells per row, rows following the aspect ratio. Never 0 for a non-empty
/// image.
///
/// # Example
/// ```
/// use tb_ascii::compositor::grid_dimensions;
/// use tb_core::config::CellLayout;
/// assert_eq!(grid_dimensions(CellLayout::FontSize(10), 600, 400), (100, 40));
/// assert_eq!(grid_dimensions(CellLayout::Columns(100), 200, 100), (100, 50));
/// assert_eq!(grid_dimensions(CellLayout::Columns(100), 0, 100), (0, 0));
/// ```
#[must_use]
pub fn grid_dimensions(layout: CellLayout, width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let (w, h) = (f64::from(width), f64::from(height));
    match layout {
        CellLayout::FontSize(px) => {
            let px = f64::from(px.max(1));
            let columns = (w / (px * MONO_ADVANCE)).floor().max(1.0) as u32;
            let rows = (h / px).floor().max(1.0) as u32;
            (columns, rows)
        }
        CellLayout::Columns(n) => {
            let n = n.max(1);
            let rows = (f64::from(n) * h / w).round().max(1.0) as u32;
            (n, rows)
        }
    }
}

/// Convertisseur pixel → grille ASCII.
///
/// Holds a clamped copy of its configuration and the resolved glyph ramp.
///
/// # Example
/// ```
/// use tb_ascii::compositor::AsciiConverter;
/// use tb_core::config::AsciiConfig;
/// use tb_core::frame::PixelBuffer;
///
/// let converter = AsciiConverter::new(&AsciiConfig::classic(4));
/// let grid = converter.convert(&PixelBuffer::filled(8, 8, [255, 255, 255, 255]));
/// assert_eq!((grid.columns, grid.rows), (4, 4));
/// assert!(grid.cells.iter().all(|c| c.ch == '.'));
/// ```
pub struct AsciiConverter {
    config: AsciiConfig,
    ramp: GlyphRamp,
}

impl AsciiConverter {
    /// Build a converter; out-of-range fields are clamped.
    #[must_use]
    pub fn new(config: &AsciiConfig) -> Self {
        let mut config = config.clone();
        config.clamp_all();
        let ramp = resolve_ramp(&config);
        Self { config, ramp }
    }

    /// Replace the configuration, rebuilding the ramp only when it changed.
    pub fn update_if_needed(&mut self, config: &AsciiConfig) {
        let mut config = config.clone();
        config.clamp_all();
        if config.ramp != self.config.ramp || config.invert != self.config.invert {
            self.ramp = resolve_ramp(&config);
        }
        self.config = config;
    }

    /// Current (clamped) configuration.
    #[must_use]
    pub fn config(&self) -> &AsciiConfig {
        &self.config
    }

    /// Resolved glyph ramp.
    #[must_use]
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Convert `buffer` into a grid of coloured glyphs.
    ///
    /// Each cell: mean colour and brightness → levels stretch → sharpness
    /// biased tone index → glyph in ramp order → colorize. Rows are filled
    /// in parallel. An empty buffer gives a 0×0 grid.
    #[must_use]
    pub fn convert(&self, buffer: &PixelBuffer) -> AsciiGrid {
        let cfg = &self.config;
        let (columns, rows) = grid_dimensions(cfg.layout, buffer.width(), buffer.height());
        let stats = sampler::sample(buffer, Partition::Grid { columns, rows }, cfg.brightness);
        let mut grid = AsciiGrid::new(stats.columns, stats.rows);
        if grid.cells.is_empty() {
            return grid;
        }

        let len = self.ramp.len();
        let row_len = grid.columns as usize;
        grid.cells
            .par_chunks_mut(row_len)
            .zip(stats.stats.par_chunks(row_len))
            .for_each(|(out, row_stats)| {
                for (cell, stat) in out.iter_mut().zip(row_stats) {
                    let adjusted = levels_stretch(stat.brightness, cfg.black_point, cfg.white_point);
                    let ch = self
                        .ramp
                        .glyph_for_tone(glyph_index(adjusted, cfg.sharpness, len));
                    let tone = adjusted.round() as u8;
                    *cell = AsciiCell {
                        ch,
                        color: colorize(stat.mean_rgb(), tone, cfg.colorization, cfg.color_mode),
                    };
                }
            });

        log::debug!(
            "ascii: {}×{} → {}×{} cellules, rampe {len}",
            buffer.width(),
            buffer.height(),
            grid.columns,
            grid.rows
        );
        grid
    }
}

impl Transform for AsciiConverter {
    type Output = AsciiGrid;

    fn apply(&self, input: &PixelBuffer) -> AsciiGrid {
        self.convert(input)
    }

    fn name(&self) -> &'static str {
        "ascii"
    }
}

fn resolve_ramp(config: &AsciiConfig) -> GlyphRamp {
    let ramp = GlyphRamp::from_preset(&config.ramp);
    if config.invert {
        ramp.with_order(RampOrder::LightToDark)
    } else {
        ramp
    }
}
