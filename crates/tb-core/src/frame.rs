use rayon::prelude::*;

use crate::color::Rgb;
use crate::error::CoreError;

/// Buffer de pixels immuable, RGBA row-major, 4 octets par pixel.
///
/// Invariant: `data().len() == width * height * 4`. A buffer is never
/// modified once built; every transform produces a new one.
///
/// # Example
/// ```
/// use tb_core::frame::PixelBuffer;
/// let fb = PixelBuffer::new(10, 10);
/// assert_eq!(fb.data().len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

/// Number of bytes needed for a `width × height` RGBA buffer.
#[inline]
#[must_use]
pub fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

impl PixelBuffer {
    /// Crée un buffer transparent (0, 0, 0, 0) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use tb_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(100, 50);
    /// assert_eq!(fb.width(), 100);
    /// assert_eq!(fb.height(), 50);
    /// assert_eq!(fb.pixel(0, 0), [0, 0, 0, 0]);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; byte_len(width, height)],
            width,
            height,
        }
    }

    /// Crée un buffer uniforme.
    ///
    /// # Example
    /// ```
    /// use tb_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
    /// assert_eq!(fb.pixel(1, 1), [255, 0, 0, 255]);
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(byte_len(width, height))
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap raw RGBA samples, checking the length invariant.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use tb_core::frame::PixelBuffer;
    /// assert!(PixelBuffer::from_raw(1, 1, vec![1, 2, 3, 4]).is_ok());
    /// assert!(PixelBuffer::from_raw(2, 1, vec![1, 2, 3, 4]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if data.len() != byte_len(width, height) {
            return Err(CoreError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a buffer row by row, in parallel.
    ///
    /// `fill(y, row)` receives a zeroed row slice of `width * 4` bytes. Rows
    /// are disjoint and all of them are written before this returns.
    ///
    /// # Example
    /// ```
    /// use tb_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::from_rows(3, 2, |y, row| {
    ///     for px in row.chunks_exact_mut(4) {
    ///         px.copy_from_slice(&[y as u8, 0, 0, 255]);
    ///     }
    /// });
    /// assert_eq!(fb.pixel(2, 1), [1, 0, 0, 255]);
    /// ```
    #[must_use]
    pub fn from_rows<F>(width: u32, height: u32, fill: F) -> Self
    where
        F: Fn(u32, &mut [u8]) + Sync,
    {
        let mut data = vec![0u8; byte_len(width, height)];
        if !data.is_empty() {
            data.par_chunks_mut(width as usize * 4)
                .enumerate()
                .for_each(|(y, row)| fill(y as u32, row));
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels RGBA, row-major.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `true` si l'une des dimensions est nulle.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Consume the buffer and return the raw samples.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Accès au pixel (x, y) → [r, g, b, a].
    ///
    /// Out-of-bounds coordinates read as transparent black.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// One row of RGBA samples.
    ///
    /// # Panics
    /// Panics if `y >= height`.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }
}

/// Single cell in the ASCII grid.
///
/// # Example
/// ```
/// use tb_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur du glyphe.
    pub color: Rgb,
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: Rgb::BLACK,
        }
    }
}

/// Grille de sortie ASCII, une cellule par région échantillonnée.
///
/// # Example
/// ```
/// use tb_core::frame::{AsciiGrid, AsciiCell};
/// use tb_core::color::Rgb;
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', color: Rgb::new(255, 0, 0) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub columns: u32,
    /// Height in characters.
    pub rows: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie d'espaces.
    ///
    /// # Example
    /// ```
    /// use tb_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); columns as usize * rows as usize],
            columns,
            rows,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        self.cells[y as usize * self.columns as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &AsciiCell {
        &self.cells[y as usize * self.columns as usize + x as usize]
    }

    /// Iterate over the rows of the grid.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[AsciiCell]> {
        self.cells.chunks(self.columns.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_bad_length() {
        let err = PixelBuffer::from_raw(3, 3, vec![0; 35]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidDimensions {
                width: 3,
                height: 3,
                len: 35
            }
        ));
    }

    #[test]
    fn zero_sized_buffer_is_empty() {
        let fb = PixelBuffer::new(0, 7);
        assert!(fb.is_empty());
        assert!(fb.data().is_empty());
        let built = PixelBuffer::from_rows(0, 0, |_, _| {});
        assert!(built.is_empty());
    }

    #[test]
    fn out_of_bounds_pixel_is_transparent() {
        let fb = PixelBuffer::filled(2, 2, [9, 9, 9, 9]);
        assert_eq!(fb.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(fb.pixel(0, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn rows_iter_yields_each_row() {
        let grid = AsciiGrid::new(3, 4);
        assert_eq!(grid.rows_iter().count(), 4);
        assert!(grid.rows_iter().all(|row| row.len() == 3));
    }
}
