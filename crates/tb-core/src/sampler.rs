//! Découpage d'un buffer en cellules et statistiques par cellule.
//!
//! Shared by the ASCII converter (character cells) and the dot pattern
//! (fixed tiles). Pure functions: the buffer is only read.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::frame::PixelBuffer;

/// Formule de luminosité appliquée aux moyennes d'une cellule.
///
/// # Example
/// ```
/// use tb_core::sampler::BrightnessPolicy;
/// assert_eq!(BrightnessPolicy::Average.brightness(30.0, 60.0, 90.0), 60.0);
/// let p = BrightnessPolicy::Perceptual.brightness(255.0, 255.0, 255.0);
/// assert!((p - 255.0).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum BrightnessPolicy {
    /// `(R + G + B) / 3`.
    Average,
    /// `0.21 R + 0.72 G + 0.07 B`.
    #[default]
    Perceptual,
}

impl BrightnessPolicy {
    /// Brightness in [0, 255] of an RGB triple.
    #[inline(always)]
    #[must_use]
    pub fn brightness(self, r: f64, g: f64, b: f64) -> f64 {
        match self {
            Self::Average => (r + g + b) / 3.0,
            // Integer weights keep white at exactly 255.
            Self::Perceptual => (21.0 * r + 72.0 * g + 7.0 * b) / 100.0,
        }
    }

    /// Brightness of a colour, rounded to the nearest grey level.
    #[inline]
    #[must_use]
    pub fn gray(self, color: Rgb) -> u8 {
        self.brightness(
            f64::from(color.r),
            f64::from(color.g),
            f64::from(color.b),
        )
        .round()
        .clamp(0.0, 255.0) as u8
    }
}

/// Région rectangulaire demi-ouverte `[x0, x1) × [y0, y1)`, déjà clippée.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl Cell {
    /// Width of the in-bounds region.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the in-bounds region.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Number of in-bounds pixels, the averaging divisor.
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// Moyennes RGB et luminosité d'une cellule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AggregateStat {
    /// Mean red.
    pub mean_r: f64,
    /// Mean green.
    pub mean_g: f64,
    /// Mean blue.
    pub mean_b: f64,
    /// Brightness of the means under the sampling policy.
    pub brightness: f64,
}

impl AggregateStat {
    /// Mean colour, each channel rounded half-up.
    ///
    /// # Example
    /// ```
    /// use tb_core::sampler::AggregateStat;
    /// use tb_core::color::Rgb;
    /// let s = AggregateStat { mean_r: 2.5, mean_g: 0.49, mean_b: 254.6, brightness: 0.0 };
    /// assert_eq!(s.mean_rgb(), Rgb::new(3, 0, 255));
    /// ```
    #[must_use]
    pub fn mean_rgb(&self) -> Rgb {
        let round = |v: f64| (v + 0.5).floor().clamp(0.0, 255.0) as u8;
        Rgb::new(round(self.mean_r), round(self.mean_g), round(self.mean_b))
    }
}

/// Partition scheme of a buffer into cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
    /// Square tiles of `size` pixels; the last row/column may be ragged.
    Tile(u32),
    /// A target number of cells, spread evenly over the buffer.
    Grid {
        /// Cells per row.
        columns: u32,
        /// Cells per column.
        rows: u32,
    },
}

impl Partition {
    /// Grid dimensions `(columns, rows)` for a `width × height` buffer.
    ///
    /// Tile size 0 counts as 1; grid counts are clamped to `[1, width]`
    /// and `[1, height]` so no cell is ever empty.
    ///
    /// # Example
    /// ```
    /// use tb_core::sampler::Partition;
    /// assert_eq!(Partition::Tile(4).dimensions(10, 7), (3, 2));
    /// assert_eq!(Partition::Grid { columns: 50, rows: 0 }.dimensions(10, 7), (10, 1));
    /// assert_eq!(Partition::Tile(3).dimensions(0, 7), (0, 0));
    /// ```
    #[must_use]
    pub fn dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (0, 0);
        }
        match *self {
            Self::Tile(size) => {
                let size = size.max(1);
                (width.div_ceil(size), height.div_ceil(size))
            }
            Self::Grid { columns, rows } => (columns.clamp(1, width), rows.clamp(1, height)),
        }
    }

    /// Cell `(cx, cy)` of this partition, clipped to the buffer.
    #[must_use]
    pub fn cell(&self, width: u32, height: u32, cx: u32, cy: u32) -> Cell {
        match *self {
            Self::Tile(size) => {
                let size = size.max(1);
                let x0 = cx.saturating_mul(size).min(width);
                let y0 = cy.saturating_mul(size).min(height);
                Cell {
                    x0,
                    y0,
                    x1: x0.saturating_add(size).min(width),
                    y1: y0.saturating_add(size).min(height),
                }
            }
            Self::Grid { .. } => {
                let (columns, rows) = self.dimensions(width, height);
                let split = |i: u32, n: u32, extent: u32| {
                    (u64::from(i) * u64::from(extent) / u64::from(n.max(1))) as u32
                };
                Cell {
                    x0: split(cx, columns, width),
                    y0: split(cy, rows, height),
                    x1: split(cx + 1, columns, width).min(width),
                    y1: split(cy + 1, rows, height).min(height),
                }
            }
        }
    }
}

/// Grille de statistiques, row-major, avec la cellule de chaque entrée.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatGrid {
    /// Cells per row.
    pub columns: u32,
    /// Cells per column.
    pub rows: u32,
    /// One aggregate per cell.
    pub stats: Vec<AggregateStat>,
    /// The pixel region of each aggregate.
    pub cells: Vec<Cell>,
}

impl StatGrid {
    /// Aggregate of cell `(cx, cy)`.
    #[inline]
    #[must_use]
    pub fn get(&self, cx: u32, cy: u32) -> &AggregateStat {
        &self.stats[cy as usize * self.columns as usize + cx as usize]
    }

    /// Iterate `(cell, stat)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &AggregateStat)> {
        self.cells.iter().zip(self.stats.iter())
    }
}

/// Aggregate one cell. Only in-bounds pixels contribute and the divisor is
/// their count; an empty cell yields zeroes.
#[must_use]
pub fn aggregate(buffer: &PixelBuffer, cell: &Cell, policy: BrightnessPolicy) -> AggregateStat {
    let x1 = cell.x1.min(buffer.width());
    let y1 = cell.y1.min(buffer.height());
    if cell.x0 >= x1 || cell.y0 >= y1 {
        return AggregateStat::default();
    }

    let (mut sr, mut sg, mut sb) = (0u64, 0u64, 0u64);
    for y in cell.y0..y1 {
        let row = buffer.row(y);
        for px in row[cell.x0 as usize * 4..x1 as usize * 4].chunks_exact(4) {
            sr += u64::from(px[0]);
            sg += u64::from(px[1]);
            sb += u64::from(px[2]);
        }
    }
    let count = (u64::from(x1 - cell.x0) * u64::from(y1 - cell.y0)) as f64;
    let (mean_r, mean_g, mean_b) = (sr as f64 / count, sg as f64 / count, sb as f64 / count);
    AggregateStat {
        mean_r,
        mean_g,
        mean_b,
        brightness: policy.brightness(mean_r, mean_g, mean_b),
    }
}

/// Partition `buffer` and aggregate every cell.
///
/// Rows of cells are aggregated in parallel; the result does not depend on
/// scheduling.
///
/// # Example
/// ```
/// use tb_core::frame::PixelBuffer;
/// use tb_core::sampler::{sample, BrightnessPolicy, Partition};
/// let fb = PixelBuffer::filled(10, 7, [90, 90, 90, 255]);
/// let grid = sample(&fb, Partition::Tile(4), BrightnessPolicy::Average);
/// assert_eq!((grid.columns, grid.rows), (3, 2));
/// assert_eq!(grid.get(2, 1).brightness, 90.0);
/// ```
#[must_use]
pub fn sample(buffer: &PixelBuffer, partition: Partition, policy: BrightnessPolicy) -> StatGrid {
    let (width, height) = (buffer.width(), buffer.height());
    let (columns, rows) = partition.dimensions(width, height);
    if columns == 0 || rows == 0 {
        log::debug!("sample: buffer vide {width}×{height}, grille vide");
        return StatGrid::default();
    }

    let cells: Vec<Cell> = (0..rows)
        .flat_map(|cy| (0..columns).map(move |cx| partition.cell(width, height, cx, cy)))
        .collect();

    let mut stats = vec![AggregateStat::default(); cells.len()];
    stats
        .par_chunks_mut(columns as usize)
        .zip(cells.par_chunks(columns as usize))
        .for_each(|(out, row_cells)| {
            for (stat, cell) in out.iter_mut().zip(row_cells) {
                *stat = aggregate(buffer, cell, policy);
            }
        });

    StatGrid {
        columns,
        rows,
        stats,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_rows(width, height, |y, row| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                px.copy_from_slice(&[(x * 10) as u8, (y * 10) as u8, 0, 255]);
            }
        })
    }

    #[test]
    fn tile_count_is_ceiling() {
        let fb = gradient(10, 7);
        for t in 1..=12u32 {
            let grid = sample(&fb, Partition::Tile(t), BrightnessPolicy::Average);
            assert_eq!(grid.columns, 10u32.div_ceil(t));
            assert_eq!(grid.rows, 7u32.div_ceil(t));
            assert_eq!(grid.stats.len(), (grid.columns * grid.rows) as usize);
        }
    }

    #[test]
    fn edge_cells_use_in_bounds_divisor() {
        // 10 wide, tile 4: last column covers x = 8, 9 only.
        let fb = gradient(10, 7);
        let grid = sample(&fb, Partition::Tile(4), BrightnessPolicy::Average);
        let corner = grid.get(2, 1);
        let cell = grid.cells[(grid.columns + 2) as usize];
        assert_eq!((cell.x0, cell.x1, cell.y0, cell.y1), (8, 10, 4, 7));
        assert_eq!(cell.pixel_count(), 6);
        // mean of x*10 for x in {8, 9}
        assert!((corner.mean_r - 85.0).abs() < 1e-9);
        // mean of y*10 for y in {4, 5, 6}
        assert!((corner.mean_g - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_tile_size_is_clamped() {
        let fb = gradient(3, 2);
        let grid = sample(&fb, Partition::Tile(0), BrightnessPolicy::Average);
        assert_eq!((grid.columns, grid.rows), (3, 2));
    }

    #[test]
    fn grid_cells_cover_buffer_without_gaps() {
        let fb = gradient(17, 9);
        let grid = sample(
            &fb,
            Partition::Grid {
                columns: 5,
                rows: 4,
            },
            BrightnessPolicy::Perceptual,
        );
        let covered: u64 = grid.cells.iter().map(Cell::pixel_count).sum();
        assert_eq!(covered, 17 * 9);
        assert!(grid.cells.iter().all(|c| c.pixel_count() > 0));
    }

    #[test]
    fn empty_buffer_gives_empty_grid() {
        let fb = PixelBuffer::new(0, 0);
        let grid = sample(&fb, Partition::Tile(5), BrightnessPolicy::Average);
        assert_eq!(grid, StatGrid::default());
    }

    #[test]
    fn perceptual_weights_green_most() {
        let p = BrightnessPolicy::Perceptual;
        assert!(p.brightness(0.0, 100.0, 0.0) > p.brightness(100.0, 0.0, 0.0));
        assert!(p.brightness(100.0, 0.0, 0.0) > p.brightness(0.0, 0.0, 100.0));
        assert_eq!(p.gray(Rgb::WHITE), 255);
    }
}
