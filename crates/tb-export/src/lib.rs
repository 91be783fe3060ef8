/// Output encoding for the Toolbox.
///
/// Text and HTML renditions of ASCII grids, glyph rasterization, PNG/JPEG/
/// WebP encoding, palette swatches and before/after compositing.
pub mod bitmap;
pub mod compare;
pub mod encode;
pub mod rasterizer;
pub mod swatch;
pub mod text;

pub use compare::compose_comparison;
pub use encode::{EXPORT_QUALITY, ExportFormat, ExportPayload, encode};
pub use rasterizer::{ExportStyle, GlyphRasterizer, render_grid};
pub use swatch::palette_swatch;
pub use text::{to_html, to_plain_text};
