use std::path::Path;

use anyhow::Result;
use tb_ascii::AsciiConverter;
use tb_core::color::Rgb;
use tb_core::config::{PaletteConfig, ToolConfig, load_config};
use tb_core::error::CoreError;
use tb_core::frame::{AsciiGrid, PixelBuffer};
use tb_core::traits::Transform;
use tb_effects::{DotPattern, GaussianBlur};
use tb_export::{
    ExportFormat, ExportPayload, ExportStyle, GlyphRasterizer, encode, palette_swatch, to_html,
    to_plain_text,
};
use tb_palette::{PaletteExtractor, extract_palette, harmonic_palette};

/// Résultat d'un outil.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    /// ASCII art grid.
    Ascii(AsciiGrid),
    /// Dot pattern or blurred image.
    Image(PixelBuffer),
    /// Extracted palette, one colour per cluster.
    Palette(Vec<Rgb>),
}

impl Artifact {
    /// Short kind name for logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ascii(_) => "ascii",
            Self::Image(_) => "image",
            Self::Palette(_) => "palette",
        }
    }
}

/// Exécute l'outil choisi sur le buffer source, jusqu'au bout.
///
/// The configuration is clamped before use. The source is only read.
///
/// # Example
/// ```
/// use tb_app::pipeline::{run, Artifact};
/// use tb_core::config::{BlurConfig, ToolConfig};
/// use tb_core::frame::PixelBuffer;
/// let src = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
/// let out = run(&src, &ToolConfig::Blur(BlurConfig::default()));
/// assert_eq!(out, Artifact::Image(src));
/// ```
#[must_use]
pub fn run(buffer: &PixelBuffer, config: &ToolConfig) -> Artifact {
    let artifact = match config {
        ToolConfig::Ascii(c) => Artifact::Ascii(apply(&AsciiConverter::new(c), buffer)),
        ToolConfig::Dots(c) => Artifact::Image(apply(&DotPattern::new(c), buffer)),
        ToolConfig::Blur(c) => Artifact::Image(apply(&GaussianBlur::new(c), buffer)),
        ToolConfig::Palette(c) => Artifact::Palette(apply(&PaletteExtractor::new(c), buffer)),
    };
    log::info!(
        "pipeline: {:?} sur {}×{} terminé",
        config.tool(),
        buffer.width(),
        buffer.height()
    );
    artifact
}

fn apply<T: Transform>(transform: &T, buffer: &PixelBuffer) -> T::Output {
    log::debug!("pipeline: {}", transform.name());
    transform.apply(buffer)
}

/// Palette harmonique de cinq couleurs autour de `anchor`, tirée d'une
/// palette de 20 couleurs de l'image.
///
/// # Example
/// ```
/// use tb_app::pipeline::harmonic;
/// use tb_core::frame::PixelBuffer;
/// use tb_core::color::Rgb;
/// let src = PixelBuffer::filled(10, 10, [0, 0, 255, 255]);
/// let out = harmonic(&src, Rgb::WHITE);
/// assert_eq!(out[0], Rgb::WHITE);
/// assert_eq!(out[4], Rgb::new(0, 0, 255));
/// ```
#[must_use]
pub fn harmonic(buffer: &PixelBuffer, anchor: Rgb) -> [Rgb; 5] {
    let palette = extract_palette(buffer, &PaletteConfig::harmonic_source());
    harmonic_palette(anchor, &palette)
}

/// Configuration de l'outil actif lue depuis un fichier TOML.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_tool_config(path: &Path) -> Result<ToolConfig> {
    Ok(load_config(path)?.active())
}

/// What the export sink asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportRequest {
    /// Plain text: ASCII glyphs, or one hex colour per line for a palette.
    Text,
    /// Coloured HTML spans (ASCII only).
    Html,
    /// Encoded image, in colour or in perceptual grey. ASCII grids are
    /// rasterized at the source size, palettes become the
    /// image-with-palette swatch.
    Image(ExportFormat, ExportStyle),
}

/// Encode les artefacts pour le consommateur externe.
///
/// # Example
/// ```
/// use tb_app::pipeline::{Artifact, ExportRequest, Exporter};
/// use tb_core::frame::PixelBuffer;
/// use tb_core::color::Rgb;
/// use tb_export::ExportPayload;
/// let src = PixelBuffer::new(1, 1);
/// let payload = Exporter::default()
///     .export(&Artifact::Palette(vec![Rgb::WHITE]), &src, ExportRequest::Text)
///     .unwrap();
/// assert_eq!(payload, ExportPayload::Text("#ffffff".into()));
/// ```
#[derive(Default)]
pub struct Exporter {
    rasterizer: GlyphRasterizer,
}

impl Exporter {
    /// Use a specific glyph rasterizer (e.g. backed by a font).
    #[must_use]
    pub fn new(rasterizer: GlyphRasterizer) -> Self {
        Self { rasterizer }
    }

    /// Encode `artifact`; `source` is the image it was computed from.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedFormat`] when the request does not
    /// apply to the artifact, or [`CoreError::Export`] if encoding fails.
    pub fn export(
        &self,
        artifact: &Artifact,
        source: &PixelBuffer,
        request: ExportRequest,
    ) -> Result<ExportPayload, CoreError> {
        let payload = match (artifact, request) {
            (Artifact::Ascii(grid), ExportRequest::Text) => ExportPayload::Text(to_plain_text(grid)),
            (Artifact::Ascii(grid), ExportRequest::Html) => ExportPayload::Text(to_html(grid)),
            (Artifact::Ascii(grid), ExportRequest::Image(format, style)) => {
                let fb = self
                    .rasterizer
                    .render_grid(grid, source.width(), source.height(), style);
                image_payload(&fb, format)?
            }
            (Artifact::Image(fb), ExportRequest::Image(format, style)) => {
                image_payload(&style.restyle(fb), format)?
            }
            (Artifact::Palette(colors), ExportRequest::Text) => ExportPayload::Text(
                colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>().join("\n"),
            ),
            (Artifact::Palette(colors), ExportRequest::Image(format, style)) => {
                image_payload(&style.restyle(&palette_swatch(source, colors)), format)?
            }
            (artifact, request) => {
                return Err(CoreError::UnsupportedFormat {
                    format: format!("{request:?} pour {}", artifact.kind()),
                });
            }
        };
        Ok(payload)
    }
}

fn image_payload(buffer: &PixelBuffer, format: ExportFormat) -> Result<ExportPayload, CoreError> {
    Ok(ExportPayload::Image {
        mime: format.mime(),
        bytes: encode(buffer, format)?,
    })
}

/// [`Exporter::export`] with the built-in glyphs.
///
/// # Errors
/// See [`Exporter::export`].
pub fn export(
    artifact: &Artifact,
    source: &PixelBuffer,
    request: ExportRequest,
) -> Result<ExportPayload, CoreError> {
    Exporter::default().export(artifact, source, request)
}

#[cfg(test)]
mod tests {
    use tb_core::config::{AsciiConfig, DotConfig};

    use super::*;

    #[test]
    fn every_tool_produces_its_artifact() {
        let src = PixelBuffer::filled(20, 10, [255, 0, 0, 255]);
        assert!(matches!(
            run(&src, &ToolConfig::Ascii(AsciiConfig::default())),
            Artifact::Ascii(_)
        ));
        assert!(matches!(
            run(&src, &ToolConfig::Dots(DotConfig::default())),
            Artifact::Image(_)
        ));
        assert_eq!(
            run(&src, &ToolConfig::Palette(PaletteConfig::default())),
            Artifact::Palette(vec![Rgb::new(255, 0, 0); 5])
        );
    }

    #[test]
    fn red_dots_end_to_end() {
        let src = PixelBuffer::filled(10, 10, [255, 0, 0, 255]);
        let Artifact::Image(out) = run(&src, &ToolConfig::Dots(DotConfig::default())) else {
            panic!("image attendue");
        };
        assert_eq!(out.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn run_does_not_touch_source() {
        let src = PixelBuffer::filled(8, 8, [1, 2, 3, 4]);
        let before = src.clone();
        let _ = run(&src, &ToolConfig::Blur(Default::default()));
        assert_eq!(src, before);
    }

    #[test]
    fn ascii_exports_text_html_and_image() {
        let src = PixelBuffer::filled(12, 12, [255, 255, 255, 255]);
        let artifact = run(&src, &ToolConfig::Ascii(AsciiConfig::classic(3)));
        assert_eq!(
            export(&artifact, &src, ExportRequest::Text).unwrap(),
            ExportPayload::Text("...\n...\n...".into())
        );
        let ExportPayload::Text(html) = export(&artifact, &src, ExportRequest::Html).unwrap() else {
            panic!("texte attendu");
        };
        assert_eq!(html.matches("<br>").count(), 2);

        let payload = export(
            &artifact,
            &src,
            ExportRequest::Image(ExportFormat::Png, ExportStyle::Color),
        )
        .unwrap();
        let ExportPayload::Image { mime, bytes } = payload else {
            panic!("image attendue");
        };
        assert_eq!(mime, "image/png");
        let decoded = tb_source::decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 12));
    }

    #[test]
    fn palette_exports_swatch() {
        let src = PixelBuffer::filled(10, 10, [0, 128, 0, 255]);
        let artifact = run(&src, &ToolConfig::Palette(PaletteConfig::default()));
        let ExportPayload::Image { bytes, .. } =
            export(
                &artifact,
                &src,
                ExportRequest::Image(ExportFormat::Png, ExportStyle::Color),
            )
            .unwrap()
        else {
            panic!("image attendue");
        };
        let decoded = tb_source::decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 12));
        assert_eq!(decoded.pixel(0, 11), [0, 128, 0, 255]);
    }

    #[test]
    fn monochrome_export_keeps_colour_artifact() {
        let src = PixelBuffer::filled(12, 12, [0, 255, 0, 255]);
        let artifact = run(&src, &ToolConfig::Ascii(AsciiConfig::classic(1)));
        let Artifact::Ascii(grid) = &artifact else {
            panic!("grille attendue");
        };
        assert_eq!(grid.get(0, 0).color, Rgb::new(0, 255, 0));

        let grey = |artifact: &Artifact| {
            let ExportPayload::Image { bytes, .. } = export(
                artifact,
                &src,
                ExportRequest::Image(ExportFormat::Png, ExportStyle::Monochrome),
            )
            .unwrap() else {
                panic!("image attendue");
            };
            tb_source::decode(&bytes).unwrap()
        };
        let decoded = grey(&artifact);
        assert!(
            decoded
                .data()
                .chunks_exact(4)
                .all(|px| px[0] == px[1] && px[1] == px[2])
        );

        let dots = grey(&run(&src, &ToolConfig::Dots(DotConfig::default())));
        assert_eq!(dots.pixel(2, 2), [184, 184, 184, 255]);
        assert_eq!(dots.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn mismatched_request_is_rejected() {
        let src = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let err = export(&Artifact::Image(src.clone()), &src, ExportRequest::Html).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { .. }));
    }

    #[test]
    fn tool_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolbox.toml");
        std::fs::write(&path, "tool = \"dots\"\n[dots]\ndot_size = 7\n").unwrap();
        let config = load_tool_config(&path).unwrap();
        assert_eq!(
            config,
            ToolConfig::Dots(DotConfig {
                dot_size: 7,
                ..DotConfig::default()
            })
        );
    }
}
