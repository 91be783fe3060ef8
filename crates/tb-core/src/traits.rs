use std::sync::Arc;

use crate::frame::PixelBuffer;

/// Fournit l'image source décodée au pipeline.
///
/// # Example
/// ```
/// use tb_core::traits::Source;
/// use tb_core::frame::PixelBuffer;
/// use std::sync::Arc;
///
/// struct Solid(Arc<PixelBuffer>);
/// impl Source for Solid {
///     fn frame(&self) -> Arc<PixelBuffer> { Arc::clone(&self.0) }
/// }
/// let s = Solid(Arc::new(PixelBuffer::new(3, 2)));
/// assert_eq!(s.native_size(), (3, 2));
/// ```
pub trait Source: Send + Sync {
    /// The decoded, read-only source frame.
    fn frame(&self) -> Arc<PixelBuffer>;

    /// Dimensions natives de la source.
    fn native_size(&self) -> (u32, u32) {
        let frame = self.frame();
        (frame.width(), frame.height())
    }
}

/// Transforme un buffer source en artefact dérivé.
///
/// CONTRAT : `input` n'est jamais modifié ; chaque appel recalcule tout
/// et alloue sa propre sortie.
///
/// # Example
/// ```
/// use tb_core::traits::Transform;
/// use tb_core::frame::PixelBuffer;
///
/// struct Identity;
/// impl Transform for Identity {
///     type Output = PixelBuffer;
///     fn apply(&self, input: &PixelBuffer) -> PixelBuffer { input.clone() }
///     fn name(&self) -> &'static str { "identity" }
/// }
/// let out = Identity.apply(&PixelBuffer::new(2, 2));
/// assert_eq!(out.width(), 2);
/// ```
pub trait Transform: Send + Sync {
    /// Produced artefact (grid, buffer, palette).
    type Output;

    /// Run the transform to completion.
    fn apply(&self, input: &PixelBuffer) -> Self::Output;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
