use tb_core::color::Rgb;
use tb_core::config::DotConfig;
use tb_core::frame::PixelBuffer;
use tb_core::sampler::{self, AggregateStat, BrightnessPolicy, Cell, Partition};
use tb_core::traits::Transform;

/// Disque plein dessiné pour une tuile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    /// Centre X in pixels.
    pub cx: f64,
    /// Centre Y in pixels.
    pub cy: f64,
    /// Radius in pixels (`dot_size / 2`).
    pub radius: f64,
    /// Fill colour.
    pub color: Rgb,
}

impl Dot {
    /// Whether the centre of pixel `(x, y)` lies inside the disc.
    #[inline(always)]
    #[must_use]
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let dx = f64::from(x) + 0.5 - self.cx;
        let dy = f64::from(y) + 0.5 - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Disque de diamètre `dot_size`, centré dans la tuile, couleur moyenne.
///
/// The centre is `(x0 + size / 2, y0 + size / 2)` even for clipped edge
/// tiles; the canvas clips the disc.
///
/// # Example
/// ```
/// use tb_effects::dot::map_to_dot;
/// use tb_core::sampler::{AggregateStat, Cell};
/// use tb_core::color::Rgb;
/// let stat = AggregateStat { mean_r: 255.0, mean_g: 0.0, mean_b: 0.0, brightness: 85.0 };
/// let cell = Cell { x0: 5, y0: 0, x1: 10, y1: 5 };
/// let dot = map_to_dot(&stat, &cell, 5);
/// assert_eq!((dot.cx, dot.cy, dot.radius), (7.5, 2.5, 2.5));
/// assert_eq!(dot.color, Rgb::new(255, 0, 0));
/// ```
#[must_use]
pub fn map_to_dot(stat: &AggregateStat, cell: &Cell, dot_size: u32) -> Dot {
    let half = f64::from(dot_size) / 2.0;
    Dot {
        cx: f64::from(cell.x0) + half,
        cy: f64::from(cell.y0) + half,
        radius: half,
        color: stat.mean_rgb(),
    }
}

/// Rend le motif de points d'une image.
///
/// Output has the input's dimensions. Pixels outside every disc keep
/// `config.background`; pixels inside are painted opaque. Diameter equals
/// the tile size, so each pixel only needs its own tile's disc.
///
/// # Example
/// ```
/// use tb_effects::dot::render_dots;
/// use tb_core::config::DotConfig;
/// use tb_core::frame::PixelBuffer;
/// let out = render_dots(&PixelBuffer::filled(10, 10, [255, 0, 0, 255]), &DotConfig::default());
/// assert_eq!(out.pixel(2, 2), [255, 0, 0, 255]);
/// assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
/// ```
#[must_use]
pub fn render_dots(buffer: &PixelBuffer, config: &DotConfig) -> PixelBuffer {
    let size = config.dot_size.max(1);
    let stats = sampler::sample(buffer, Partition::Tile(size), BrightnessPolicy::Average);
    if stats.stats.is_empty() {
        return PixelBuffer::new(buffer.width(), buffer.height());
    }

    let dots: Vec<Dot> = stats
        .iter()
        .map(|(cell, stat)| map_to_dot(stat, cell, size))
        .collect();
    let columns = stats.columns as usize;
    let background = config.background;

    let out = PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
        let tile_row = &dots[(y / size) as usize * columns..][..columns];
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let x = x as u32;
            let dot = &tile_row[(x / size) as usize];
            if dot.covers(x, y) {
                px.copy_from_slice(&[dot.color.r, dot.color.g, dot.color.b, 255]);
            } else {
                px.copy_from_slice(&background);
            }
        }
    });
    log::debug!(
        "dots: {}×{} tuiles de {size}px",
        stats.columns,
        stats.rows
    );
    out
}

/// Dot pattern as a pipeline transform.
pub struct DotPattern {
    config: DotConfig,
}

impl DotPattern {
    /// Build the transform; the dot size is clamped.
    #[must_use]
    pub fn new(config: &DotConfig) -> Self {
        let mut config = config.clone();
        config.clamp_all();
        Self { config }
    }
}

impl Transform for DotPattern {
    type Output = PixelBuffer;

    fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        render_dots(input, &self.config)
    }

    fn name(&self) -> &'static str {
        "dots"
    }
}
