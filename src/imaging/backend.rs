//! Rasterizer trait and shared types.
//!
//! The [`Rasterizer`] trait is the boundary between orientation/size planning
//! and pixel work: decode bytes into a drawable surface, draw that surface
//! into a planned canvas, encode the canvas back to bytes.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording mock in [`tests`].

use super::params::Quality;
use super::plan::ResizePlan;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Pixel dimensions of a decoded image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Decode, draw and encode, as needed by the resize pipeline.
///
/// `Sync` so one backend can serve a rayon batch.
pub trait Rasterizer: Sync {
    /// Decoded image or drawn canvas.
    type Surface;

    /// Whether the decoders/encoders this backend relies on are present.
    /// Batches degrade to pass-through when this is false.
    fn is_available(&self) -> bool {
        true
    }

    /// Read dimensions without keeping the pixels around.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        self.decode(bytes).map(|(_, dims)| dims)
    }

    /// Decode encoded bytes into a drawable surface.
    fn decode(&self, bytes: &[u8]) -> Result<(Self::Surface, Dimensions), BackendError>;

    /// Draw `surface` into a new canvas following `plan`.
    fn draw(&self, surface: Self::Surface, plan: &ResizePlan)
    -> Result<Self::Surface, BackendError>;

    /// Serialize a canvas in the format named by `mime_type`.
    fn encode(
        &self,
        canvas: &Self::Surface,
        mime_type: &str,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
