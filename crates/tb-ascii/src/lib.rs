/// ASCII conversion engine for the Toolbox.
///
/// Turns a pixel buffer into a grid of coloured glyphs: cell sampling,
/// levels stretch, sharpness-biased glyph selection and colorization.
pub mod color_map;
pub mod compositor;
pub mod glyph;
pub mod levels;

pub use compositor::{AsciiConverter, grid_dimensions};
