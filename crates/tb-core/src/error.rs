use thiserror::Error;

/// Errors originating from the toolbox pipeline.
///
/// Only decoding and encoding failures reach the caller. Degenerate
/// parameters are clamped where they are used and never produce an error.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Input bytes are not a recognised raster image.
    #[error("Décodage impossible : {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// The encoder could not produce bytes for the requested format.
    #[error("Export {format} impossible : {reason}")]
    Export {
        /// Requested MIME type.
        format: String,
        /// Encoder message.
        reason: String,
    },

    /// Unsupported file or data format.
    #[error("Format non supporté : {format}")]
    UnsupportedFormat {
        /// The format string that is unsupported.
        format: String,
    },

    /// Sample count does not match width × height × 4.
    #[error("Dimensions invalides : {width}×{height} pour {len} octets")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
        /// Length of the supplied sample buffer.
        len: usize,
    },
}
