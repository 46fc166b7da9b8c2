//! # Upright
//!
//! Batch photo resizing that respects EXIF orientation.
//!
//! Cameras usually store pixels in sensor order and record how the picture
//! should be turned in the EXIF orientation tag (0x0112). Upright reads that
//! tag straight from the JPEG byte stream, scales each image so its dominant
//! edge fits a bounding box, and draws it onto an upright canvas.
//!
//! # Pipeline
//!
//! Every image in a batch goes through the same five steps:
//!
//! ```text
//! 1. Scan     bytes      →  orientation code   (marker walk, never fails the file)
//! 2. Decode   bytes      →  surface + size     (backend)
//! 3. Plan     size, code →  ResizePlan         (pure: fit + rotation/flip table)
//! 4. Draw     surface    →  upright canvas     (backend)
//! 5. Encode   canvas     →  bytes              (backend, same mime type)
//! ```
//!
//! Files whose mime type is not an image pass through untouched, at the same
//! position. Output length and order always equal input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Exif scanning, dimension math, resize planning, the [`imaging::Rasterizer`] seam and the `image`-crate backend |
//! | [`process`] | Batch driver: mime filtering, ordering, fail-fast errors, progress events |
//! | [`config`] | `upright.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Orientation Never Fails a File
//!
//! A missing, truncated or non-JPEG stream simply means "upright". Only a
//! decode or encode failure stops the batch, and it names the file.
//!
//! ## Plan Before Pixels
//!
//! All geometry is decided by [`imaging::plan_resize`] from the source size,
//! the bounds and the orientation code. The backend only executes the plan,
//! which keeps the eight orientation cases testable without decoding images.
//!
//! ## Pure-Rust Imaging
//!
//! The default backend uses the `image` crate (Lanczos3 resampling) with no
//! system libraries, so the binary is self-contained.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
