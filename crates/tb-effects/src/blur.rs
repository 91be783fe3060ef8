use tb_core::config::BlurConfig;
use tb_core::frame::PixelBuffer;
use tb_core::traits::Transform;

/// Largest half-width accepted for a kernel.
const MAX_HALF: usize = 64;

/// Noyau gaussien carré normalisé, de taille impaire.
///
/// Size is `2 * max(1, floor(radius)) + 1`; weights are
/// `exp(-(x² + y²) / (2σ²))` divided by their sum.
///
/// # Example
/// ```
/// use tb_effects::blur::BlurKernel;
/// let k = BlurKernel::new(2.7, 1.5);
/// assert_eq!(k.size(), 5);
/// assert!((k.sum() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BlurKernel {
    half: usize,
    weights: Vec<f64>,
}

impl BlurKernel {
    /// Build the kernel.
    ///
    /// A non-finite or sub-1 radius gives the minimum 3×3 kernel. A
    /// non-finite or non-positive sigma gives the identity kernel.
    #[must_use]
    pub fn new(radius: f64, sigma: f64) -> Self {
        let half = if radius.is_finite() && radius >= 1.0 {
            (radius.floor() as usize).min(MAX_HALF)
        } else {
            1
        };
        let size = 2 * half + 1;
        let mut weights = vec![0.0; size * size];

        if !(sigma.is_finite() && sigma > 0.0) {
            log::warn!("blur: sigma {sigma} invalide, noyau identité");
            weights[half * size + half] = 1.0;
            return Self { half, weights };
        }

        let denom = 2.0 * sigma * sigma;
        let mut sum = 0.0;
        for ky in 0..size {
            for kx in 0..size {
                let ry = ky as f64 - half as f64;
                let rx = kx as f64 - half as f64;
                let w = (-(rx * rx + ry * ry) / denom).exp();
                weights[ky * size + kx] = w;
                sum += w;
            }
        }
        // centre weight is exp(0) = 1, so sum >= 1
        for w in &mut weights {
            *w /= sum;
        }
        Self { half, weights }
    }

    /// Side length (always odd, at least 3).
    #[must_use]
    pub fn size(&self) -> usize {
        2 * self.half + 1
    }

    /// Distance from the centre to an edge.
    #[must_use]
    pub fn half(&self) -> usize {
        self.half
    }

    /// Row-major weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Convolve `buffer` with this kernel, clamping reads at the edges.
    ///
    /// All four channels are filtered. Each result is rounded half to even
    /// and clamped to [0, 255]. Rows are computed in parallel.
    #[must_use]
    pub fn convolve(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let (width, height) = (buffer.width(), buffer.height());
        if buffer.is_empty() {
            return PixelBuffer::new(width, height);
        }
        let size = self.size();
        let half = self.half as i64;
        let (max_x, max_y) = (i64::from(width) - 1, i64::from(height) - 1);

        PixelBuffer::from_rows(width, height, |y, row| {
            for (x, out) in row.chunks_exact_mut(4).enumerate() {
                let mut acc = [0.0f64; 4];
                for ky in 0..size {
                    let iy = (i64::from(y) + ky as i64 - half).clamp(0, max_y) as u32;
                    let src_row = buffer.row(iy);
                    let kernel_row = &self.weights[ky * size..(ky + 1) * size];
                    for (kx, &w) in kernel_row.iter().enumerate() {
                        let ix = (x as i64 + kx as i64 - half).clamp(0, max_x) as usize;
                        let px = &src_row[ix * 4..ix * 4 + 4];
                        for (a, &v) in acc.iter_mut().zip(px) {
                            *a += f64::from(v) * w;
                        }
                    }
                }
                for (o, a) in out.iter_mut().zip(acc) {
                    *o = a.round_ties_even().clamp(0.0, 255.0) as u8;
                }
            }
        })
    }
}

/// Flou gaussien d'une image, mêmes dimensions en sortie.
///
/// # Example
/// ```
/// use tb_effects::blur::gaussian_blur;
/// use tb_core::frame::PixelBuffer;
/// let src = PixelBuffer::filled(6, 4, [40, 80, 120, 255]);
/// assert_eq!(gaussian_blur(&src, 2.0, 5.0), src);
/// ```
#[must_use]
pub fn gaussian_blur(buffer: &PixelBuffer, radius: f64, sigma: f64) -> PixelBuffer {
    let kernel = BlurKernel::new(radius, sigma);
    let out = kernel.convolve(buffer);
    log::debug!(
        "blur: {}×{} noyau {}×{} σ={sigma}",
        buffer.width(),
        buffer.height(),
        kernel.size(),
        kernel.size()
    );
    out
}

/// Gaussian blur as a pipeline transform.
pub struct GaussianBlur {
    kernel: BlurKernel,
}

impl GaussianBlur {
    /// Build the transform from clamped parameters.
    #[must_use]
    pub fn new(config: &BlurConfig) -> Self {
        let mut config = config.clone();
        config.clamp_all();
        Self {
            kernel: BlurKernel::new(config.radius, config.sigma),
        }
    }

    /// The precomputed kernel.
    #[must_use]
    pub fn kernel(&self) -> &BlurKernel {
        &self.kernel
    }
}

impl Transform for GaussianBlur {
    type Output = PixelBuffer;

    fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        self.kernel.convolve(input)
    }

    fn name(&self) -> &'static str {
        "blur"
    }
}
