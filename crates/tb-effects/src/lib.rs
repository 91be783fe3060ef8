/// Pixel effects for the Toolbox: dot-pattern halftone and Gaussian blur.
pub mod blur;
pub mod dot;

pub use blur::{BlurKernel, GaussianBlur, gaussian_blur};
pub use dot::{Dot, DotPattern, map_to_dot, render_dots};
