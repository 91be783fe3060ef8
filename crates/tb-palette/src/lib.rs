/// Colour palette extraction for the Toolbox.
///
/// Strided pixel sampling, deterministic k-means in raw RGB space and the
/// harmonic five-colour selection around an anchor colour.
pub mod harmonic;
pub mod kmeans;

pub use harmonic::harmonic_palette;
pub use kmeans::{
    ColorCluster, PaletteExtractor, extract_palette, kmeans, kmeans_clusters, sample_pixels,
};
