use rayon::prelude::*;
use tb_core::color::Rgb;
use tb_core::config::PaletteConfig;
use tb_core::frame::PixelBuffer;
use tb_core::traits::Transform;

/// Un cluster final : centroïde et pixels affectés.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCluster {
    /// Representative colour.
    pub centroid: Rgb,
    /// Samples assigned to this centroid in the last pass.
    pub members: Vec<Rgb>,
}

/// Un pixel sur `stride`, par index plat, en partant de 0. Alpha ignoré.
///
/// # Example
/// ```
/// use tb_palette::kmeans::sample_pixels;
/// use tb_core::frame::PixelBuffer;
/// let fb = PixelBuffer::filled(5, 2, [1, 2, 3, 4]);
/// assert_eq!(sample_pixels(&fb, 3).len(), 4);
/// assert_eq!(sample_pixels(&fb, 0).len(), 10);
/// ```
#[must_use]
pub fn sample_pixels(buffer: &PixelBuffer, stride: usize) -> Vec<Rgb> {
    buffer
        .data()
        .chunks_exact(4)
        .step_by(stride.max(1))
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .collect()
}

/// Index of the nearest centroid; the earliest wins ties.
#[inline(always)]
fn nearest(pixel: Rgb, centroids: &[Rgb]) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let d = pixel.distance_sq(*c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Mean of `members`, each channel rounded half-up.
fn mean(members: &[Rgb]) -> Rgb {
    let n = members.len() as u64;
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for c in members {
        r += u64::from(c.r);
        g += u64::from(c.g);
        b += u64::from(c.b);
    }
    let round = |sum: u64| ((2 * sum + n) / (2 * n)) as u8;
    Rgb::new(round(r), round(g), round(b))
}

/// Lloyd run shared by [`kmeans`] and [`kmeans_clusters`].
fn run(pixels: &[Rgb], k: usize, max_iterations: usize) -> (Vec<Rgb>, Vec<usize>) {
    let mut centroids: Vec<Rgb> = pixels.iter().take(k).copied().collect();
    if centroids.is_empty() {
        return (centroids, Vec::new());
    }
    if k > pixels.len() {
        log::warn!(
            "kmeans: k={k} > {} échantillons, {} centroïdes",
            pixels.len(),
            pixels.len()
        );
    }

    let mut assignment = Vec::new();
    let mut iterations = 0;
    for _ in 0..max_iterations {
        iterations += 1;
        assignment = pixels
            .par_iter()
            .map(|&p| nearest(p, &centroids))
            .collect();

        let mut members: Vec<Vec<Rgb>> = vec![Vec::new(); centroids.len()];
        for (&p, &i) in pixels.iter().zip(&assignment) {
            members[i].push(p);
        }
        let next: Vec<Rgb> = centroids
            .iter()
            .zip(&members)
            .map(|(&c, m)| if m.is_empty() { c } else { mean(m) })
            .collect();

        if next == centroids {
            break;
        }
        centroids = next;
    }
    log::debug!(
        "kmeans: {} échantillons, {} centroïdes, {iterations} itérations",
        pixels.len(),
        centroids.len()
    );
    (centroids, assignment)
}

/// k-means déterministe dans l'espace RGB brut.
///
/// Seeds are the first `k` samples. Each pass assigns every sample to the
/// nearest centroid (Euclidean, earliest index on ties), then moves each
/// centroid to its members' mean rounded half-up; an empty cluster keeps
/// its centroid. Stops when no centroid moves or after `max_iterations`.
///
/// Returns `min(k, pixels.len())` centroids; empty for `k == 0` or no
/// samples.
///
/// # Example
/// ```
/// use tb_palette::kmeans::kmeans;
/// use tb_core::color::Rgb;
/// let px = [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), Rgb::new(2, 2, 2), Rgb::new(250, 250, 250)];
/// let c = kmeans(&px, 2, 20);
/// assert_eq!(c, vec![Rgb::new(1, 1, 1), Rgb::new(253, 253, 253)]);
/// ```
#[must_use]
pub fn kmeans(pixels: &[Rgb], k: usize, max_iterations: usize) -> Vec<Rgb> {
    run(pixels, k, max_iterations).0
}

/// Same run as [`kmeans`], keeping the membership of the final assignment.
///
/// Members come from the last assignment pass, in sample order.
#[must_use]
pub fn kmeans_clusters(pixels: &[Rgb], k: usize, max_iterations: usize) -> Vec<ColorCluster> {
    let (centroids, assignment) = run(pixels, k, max_iterations);
    let mut clusters: Vec<ColorCluster> = centroids
        .into_iter()
        .map(|centroid| ColorCluster {
            centroid,
            members: Vec::new(),
        })
        .collect();
    for (&p, &i) in pixels.iter().zip(&assignment) {
        clusters[i].members.push(p);
    }
    clusters
}

/// Palette dominante d'une image.
///
/// # Example
/// ```
/// use tb_palette::kmeans::extract_palette;
/// use tb_core::config::PaletteConfig;
/// use tb_core::frame::PixelBuffer;
/// use tb_core::color::Rgb;
/// let fb = PixelBuffer::filled(10, 10, [9, 8, 7, 255]);
/// assert_eq!(extract_palette(&fb, &PaletteConfig::default()), vec![Rgb::new(9, 8, 7); 5]);
/// ```
#[must_use]
pub fn extract_palette(buffer: &PixelBuffer, config: &PaletteConfig) -> Vec<Rgb> {
    let pixels = sample_pixels(buffer, config.sample_stride);
    kmeans(&pixels, config.cluster_count, config.max_iterations)
}

/// Palette extraction as a pipeline transform.
pub struct PaletteExtractor {
    config: PaletteConfig,
}

impl PaletteExtractor {
    /// Build the transform from clamped parameters.
    #[must_use]
    pub fn new(config: &PaletteConfig) -> Self {
        let mut config = config.clone();
        config.clamp_all();
        Self { config }
    }
}

impl Transform for PaletteExtractor {
    type Output = Vec<Rgb>;

    fn apply(&self, input: &PixelBuffer) -> Vec<Rgb> {
        extract_palette(input, &self.config)
    }

    fn name(&self) -> &'static str {
        "palette"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_rows(width, height, |y, row| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let v = (x as u32 * 37 + y * 91) % 256;
                px.copy_from_slice(&[v as u8, (v * 3 % 256) as u8, (255 - v) as u8, 255]);
            }
        })
    }

    #[test]
    fn reruns_are_bit_identical() {
        let pixels = sample_pixels(&noisy(64, 48), 7);
        let first = kmeans(&pixels, 6, 20);
        assert_eq!(first.len(), 6);
        for _ in 0..3 {
            assert_eq!(kmeans(&pixels, 6, 20), first);
        }
    }

    #[test]
    fn centroids_are_member_means() {
        let pixels = sample_pixels(&noisy(40, 30), 3);
        let clusters = kmeans_clusters(&pixels, 4, 100);
        for cluster in clusters.iter().filter(|c| !c.members.is_empty()) {
            assert_eq!(cluster.centroid, mean(&cluster.members));
        }
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, pixels.len());
    }

    #[test]
    fn k_larger_than_samples_is_clamped() {
        let pixels = [Rgb::new(1, 1, 1), Rgb::new(200, 0, 0)];
        assert_eq!(kmeans(&pixels, 5, 20), pixels.to_vec());
    }

    #[test]
    fn degenerate_inputs_give_empty_palette() {
        assert!(kmeans(&[], 5, 20).is_empty());
        assert!(kmeans(&[Rgb::WHITE], 0, 20).is_empty());
        assert!(extract_palette(&PixelBuffer::new(0, 0), &PaletteConfig::default()).is_empty());
    }

    #[test]
    fn duplicate_seeds_keep_empty_clusters() {
        let clusters = kmeans_clusters(&[Rgb::BLACK, Rgb::BLACK], 2, 20);
        // both seeds are black; the first wins every tie
        assert_eq!(clusters[0].members.len(), 2);
        assert_eq!(clusters[1].centroid, Rgb::BLACK);
        assert!(clusters[1].members.is_empty());
    }

    #[test]
    fn empty_cluster_recovers_after_first_pass() {
        let clusters = kmeans_clusters(&[Rgb::BLACK, Rgb::BLACK, Rgb::WHITE], 2, 20);
        assert_eq!(clusters[0].centroid, Rgb::WHITE);
        assert_eq!(clusters[1].centroid, Rgb::BLACK);
        assert_eq!(clusters[1].members.len(), 2);
    }

    #[test]
    fn mean_rounds_half_up() {
        assert_eq!(mean(&[Rgb::new(0, 1, 2), Rgb::new(1, 2, 2)]), Rgb::new(1, 2, 2));
    }

    #[test]
    fn sampling_starts_at_first_pixel() {
        let fb = PixelBuffer::from_rows(4, 1, |_, row| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                px.copy_from_slice(&[x as u8, 0, 0, 0]);
            }
        });
        let s = sample_pixels(&fb, 3);
        assert_eq!(s, vec![Rgb::new(0, 0, 0), Rgb::new(3, 0, 0)]);
    }
}
