use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use tb_core::color::{ColorInfo, pixel_at};
use tb_core::config::ToolConfig;
use tb_core::error::CoreError;
use tb_core::frame::PixelBuffer;
use tb_core::traits::Source;
use tb_export::ExportPayload;

use crate::pipeline::{self, Artifact, ExportRequest, Exporter};

/// Artefact publié, avec la génération de configuration qui l'a produit.
#[derive(Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Configuration generation the artifact was computed for.
    pub generation: u64,
    /// The result.
    pub artifact: Artifact,
}

/// Session d'édition : une image source, une configuration, un résultat.
///
/// Every parameter change recomputes the artifact in full. A computation
/// that finishes after a newer configuration arrived is discarded, never
/// aborted midway. All methods take `&self`; the session can be shared
/// between a UI thread and a worker.
///
/// # Example
/// ```
/// use tb_app::session::Session;
/// use tb_core::config::{DotConfig, ToolConfig};
/// use tb_core::frame::PixelBuffer;
///
/// let session = Session::new(PixelBuffer::filled(10, 10, [255, 0, 0, 255]), ToolConfig::default());
/// session.set_config(ToolConfig::Dots(DotConfig::default()));
/// let rendered = session.render().unwrap();
/// assert_eq!(rendered.generation, 1);
/// ```
pub struct Session {
    source: Arc<PixelBuffer>,
    config: ArcSwap<ToolConfig>,
    generation: AtomicU64,
    published: ArcSwapOption<Rendered>,
    exporter: Exporter,
}

impl Session {
    /// Start a session on a decoded image.
    #[must_use]
    pub fn new(source: PixelBuffer, config: ToolConfig) -> Self {
        Self::with_source(Arc::new(source), config)
    }

    /// Start a session on a frame shared with the host.
    #[must_use]
    pub fn with_source(source: Arc<PixelBuffer>, mut config: ToolConfig) -> Self {
        config.clamp_all();
        Self {
            source,
            config: ArcSwap::from_pointee(config),
            generation: AtomicU64::new(0),
            published: ArcSwapOption::empty(),
            exporter: Exporter::default(),
        }
    }

    /// Start a session from any [`Source`].
    #[must_use]
    pub fn from_source(source: &dyn Source, config: ToolConfig) -> Self {
        Self::with_source(source.frame(), config)
    }

    /// Decode `bytes` and start a session.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the bytes are not an image.
    pub fn from_bytes(bytes: &[u8], config: ToolConfig) -> Result<Self, CoreError> {
        Ok(Self::new(tb_source::decode(bytes)?, config))
    }

    /// Replace the exporter (e.g. to rasterize with a font).
    #[must_use]
    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// The decoded source image.
    #[must_use]
    pub fn source(&self) -> &Arc<PixelBuffer> {
        &self.source
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> Arc<ToolConfig> {
        self.config.load_full()
    }

    /// Current configuration generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Installe une nouvelle configuration (bornée) et retourne sa génération.
    pub fn set_config(&self, mut config: ToolConfig) -> u64 {
        config.clamp_all();
        // store first: a render that sees the new generation must see this config
        self.config.store(Arc::new(config));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("session: configuration génération {generation}");
        generation
    }

    /// Calcule le résultat pour la configuration courante.
    ///
    /// Returns the published result, or `None` when a newer configuration
    /// arrived during the computation (the result is dropped).
    pub fn render(&self) -> Option<Arc<Rendered>> {
        let generation = self.generation();
        let config = self.config.load_full();
        let artifact = pipeline::run(&self.source, &config);
        self.publish(generation, artifact)
    }

    /// Publish `artifact` computed for `generation`, unless it is stale.
    fn publish(&self, generation: u64, artifact: Artifact) -> Option<Arc<Rendered>> {
        if generation != self.generation() {
            log::debug!("session: résultat génération {generation} périmé, ignoré");
            return None;
        }
        let rendered = Arc::new(Rendered {
            generation,
            artifact,
        });
        self.published.rcu(|current| match current {
            Some(newer) if newer.generation > generation => Some(Arc::clone(newer)),
            _ => Some(Arc::clone(&rendered)),
        });
        Some(rendered)
    }

    /// Last published result, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Rendered>> {
        self.published.load_full()
    }

    /// Whether the published result matches the current configuration.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest()
            .is_some_and(|r| r.generation == self.generation())
    }

    /// Export the latest result, rendering it first if needed.
    ///
    /// # Errors
    /// Returns [`CoreError::Export`] if no current result could be
    /// produced, or any error from [`Exporter::export`].
    pub fn export(&self, request: ExportRequest) -> Result<ExportPayload, CoreError> {
        let rendered = match self.latest() {
            Some(r) if r.generation == self.generation() => r,
            _ => self.render().ok_or_else(|| CoreError::Export {
                format: format!("{request:?}"),
                reason: "configuration modifiée pendant le calcul".into(),
            })?,
        };
        self.exporter
            .export(&rendered.artifact, &self.source, request)
    }

    /// Couleur du pixel (x, y) de la source, en notations CSS.
    #[must_use]
    pub fn pick(&self, x: u32, y: u32) -> Option<ColorInfo> {
        pixel_at(&self.source, x, y).map(ColorInfo::from)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tb_core::config::{AsciiConfig, BlurConfig, DotConfig, PaletteConfig};

    use super::*;

    fn red() -> PixelBuffer {
        PixelBuffer::filled(10, 10, [255, 0, 0, 255])
    }

    #[test]
    fn render_publishes_current_generation() {
        let session = Session::new(red(), ToolConfig::Dots(DotConfig::default()));
        assert!(session.latest().is_none());
        let rendered = session.render().unwrap();
        assert_eq!(rendered.generation, 0);
        assert!(session.is_current());
        assert!(matches!(rendered.artifact, Artifact::Image(_)));
    }

    #[test]
    fn stale_result_is_discarded() {
        let session = Session::new(red(), ToolConfig::default());
        let first = session.set_config(ToolConfig::Blur(BlurConfig::default()));
        let artifact = pipeline::run(session.source(), &session.config());
        let second = session.set_config(ToolConfig::Palette(PaletteConfig::default()));
        assert!(second > first);

        assert!(session.publish(first, artifact).is_none());
        assert!(session.latest().is_none());

        let rendered = session.render().unwrap();
        assert_eq!(rendered.generation, second);
        assert!(matches!(rendered.artifact, Artifact::Palette(_)));
    }

    #[test]
    fn set_config_clamps() {
        let session = Session::new(red(), ToolConfig::default());
        session.set_config(ToolConfig::Dots(DotConfig {
            dot_size: 0,
            ..DotConfig::default()
        }));
        assert_eq!(
            *session.config(),
            ToolConfig::Dots(DotConfig {
                dot_size: 1,
                ..DotConfig::default()
            })
        );
    }

    #[test]
    fn concurrent_updates_end_on_latest_config() {
        let session = Arc::new(Session::new(red(), ToolConfig::default()));
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let s = Arc::clone(&session);
                thread::spawn(move || {
                    s.set_config(ToolConfig::Dots(DotConfig {
                        dot_size: 2 + i,
                        ..DotConfig::default()
                    }));
                    s.render();
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        let rendered = session.render().unwrap();
        assert_eq!(rendered.generation, 4);
        assert!(session.is_current());
    }

    #[test]
    fn export_renders_on_demand() {
        let session = Session::new(
            PixelBuffer::filled(6, 6, [255, 255, 255, 255]),
            ToolConfig::Ascii(AsciiConfig::classic(2)),
        );
        let payload = session.export(ExportRequest::Text).unwrap();
        assert_eq!(payload, ExportPayload::Text("..\n..".into()));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(matches!(
            Session::from_bytes(b"GIF89a", ToolConfig::default()),
            Err(CoreError::Decode { .. })
        ));
    }

    #[test]
    fn pick_reports_css_strings() {
        let session = Session::new(red(), ToolConfig::default());
        let info = session.pick(3, 3).unwrap();
        assert_eq!(info.hex, "#ff0000");
        assert_eq!(info.hsl, "hsl(0, 100%, 50%)");
        assert!(session.pick(10, 0).is_none());
    }
}
