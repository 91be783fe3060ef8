use std::fmt;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tb_core::error::CoreError;
use tb_core::frame::PixelBuffer;

/// Qualité fixe des exports avec perte (0.95).
pub const EXPORT_QUALITY: u8 = 95;

/// Image container requested by the export sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `image/png`, lossless with alpha.
    #[default]
    Png,
    /// `image/jpeg`, quality [`EXPORT_QUALITY`], alpha flattened onto black.
    Jpeg,
    /// `image/webp`, lossless with alpha.
    WebP,
}

impl ExportFormat {
    /// MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Usual file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Parse a MIME type.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedFormat`] for anything else than
    /// PNG, JPEG or WebP.
    ///
    /// # Example
    /// ```
    /// use tb_export::encode::ExportFormat;
    /// assert_eq!(ExportFormat::from_mime("image/webp").unwrap(), ExportFormat::WebP);
    /// assert!(ExportFormat::from_mime("image/gif").is_err());
    /// ```
    pub fn from_mime(mime: &str) -> Result<Self, CoreError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/webp" => Ok(Self::WebP),
            other => Err(CoreError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Ce qui est remis au consommateur externe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportPayload {
    /// UTF-8 text (TXT download, clipboard).
    Text(String),
    /// Encoded image bytes.
    Image {
        /// MIME type of `bytes`.
        mime: &'static str,
        /// Encoded file contents.
        bytes: Vec<u8>,
    },
}

impl ExportPayload {
    /// MIME type of the payload.
    #[must_use]
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Text(_) => "text/plain",
            Self::Image { mime, .. } => mime,
        }
    }
}

/// Encode un buffer dans le format demandé.
///
/// # Errors
/// Returns [`CoreError::Export`] if the buffer is empty or the encoder
/// fails. Never retried.
///
/// # Example
/// ```
/// use tb_export::encode::{encode, ExportFormat};
/// use tb_core::frame::PixelBuffer;
/// let png = encode(&PixelBuffer::filled(2, 2, [1, 2, 3, 255]), ExportFormat::Png).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode(buffer: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>, CoreError> {
    let failure = |reason: String| CoreError::Export {
        format: format.mime().to_string(),
        reason,
    };
    if buffer.is_empty() {
        return Err(failure(format!(
            "image vide {}×{}",
            buffer.width(),
            buffer.height()
        )));
    }

    let (w, h) = (buffer.width(), buffer.height());
    let mut out = Vec::new();
    let result = match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(buffer.data(), w, h, ExtendedColorType::Rgba8)
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_on_black(buffer);
            JpegEncoder::new_with_quality(&mut out, EXPORT_QUALITY).encode(
                &rgb,
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        ExportFormat::WebP => {
            WebPEncoder::new_lossless(&mut out).encode(buffer.data(), w, h, ExtendedColorType::Rgba8)
        }
    };
    result.map_err(|e| failure(e.to_string()))?;

    log::info!("export {format}: {w}×{h} → {} octets", out.len());
    Ok(out)
}

/// RGB samples with alpha premultiplied onto black.
fn flatten_on_black(buffer: &PixelBuffer) -> Vec<u8> {
    buffer
        .data()
        .chunks_exact(4)
        .flat_map(|px| {
            let a = u32::from(px[3]);
            let mul = move |c: u8| ((u32::from(c) * a + 127) / 255) as u8;
            [mul(px[0]), mul(px[1]), mul(px[2])]
        })
        .collect()
}
