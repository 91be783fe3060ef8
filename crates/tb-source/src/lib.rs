/// Raster source for the Toolbox: image decoding and preview scaling.

pub mod image;
pub mod resize;

pub use crate::image::{ImageSource, decode, load_image};
pub use resize::{Resizer, fit_dimensions, fit_within, resize_frame};
