/// Shared types, sampling and configuration for the Toolbox pipeline.
///
/// This crate contains the pixel buffer, the cell sampler, glyph ramps,
/// colour helpers and the per-tool configuration records used across the
/// workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod sampler;
pub mod traits;

pub use charset::GlyphRamp;
pub use color::Rgb;
pub use config::{
    AsciiConfig, BlurConfig, CellLayout, ColorMode, DotConfig, PaletteConfig, ToolConfig,
    ToolKind, ToolboxConfig,
};
pub use error::CoreError;
pub use frame::{AsciiCell, AsciiGrid, PixelBuffer};
pub use sampler::{AggregateStat, BrightnessPolicy, Cell, Partition, StatGrid};
