//! High-level image operations.
//!
//! These functions combine orientation scanning, planning and backend
//! execution for a single image.

use super::backend::{BackendError, Dimensions, Rasterizer};
use super::exif_parser::{DEFAULT_ORIENTATION, ScanError, read_orientation, scan_orientation};
use super::params::{Bounds, Quality};
use super::plan::{ResizePlan, plan_resize};
use log::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Settings for resizing one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeConfig {
    pub bounds: Bounds,
    pub quality: Quality,
}

/// A resized image along with what was done to it.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub bytes: Vec<u8>,
    pub orientation: u16,
    pub source: Dimensions,
    pub plan: ResizePlan,
}

/// Resize and re-orient one encoded image.
///
/// Runs scan → decode → plan → draw → encode. A missing or unreadable
/// orientation falls back to upright; backend failures are returned.
pub fn resize_image<R: Rasterizer>(
    backend: &R,
    bytes: &[u8],
    mime_type: &str,
    config: &ResizeConfig,
) -> Result<ResizedImage> {
    let orientation = read_orientation(bytes);
    let (surface, source) = backend.decode(bytes)?;
    let plan = plan_resize(source, config.bounds, orientation);
    debug!(
        "orientation {orientation}: {}x{} -> {}x{} ({:?}, flip_x={})",
        source.width,
        source.height,
        plan.canvas_width,
        plan.canvas_height,
        plan.rotation,
        plan.flip_x
    );

    let canvas = backend.draw(surface, &plan)?;
    let bytes = backend.encode(&canvas, mime_type, config.quality)?;

    Ok(ResizedImage {
        bytes,
        orientation,
        source,
        plan,
    })
}

/// What a resize would do, without decoding pixels.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub scan: std::result::Result<u16, ScanError>,
    pub source: Dimensions,
    pub plan: ResizePlan,
}

/// Scan orientation, identify dimensions and plan, without drawing.
pub fn inspect_image<R: Rasterizer>(
    backend: &R,
    bytes: &[u8],
    bounds: Bounds,
) -> Result<Inspection> {
    let scan = scan_orientation(bytes);
    let source = backend.identify(bytes)?;
    let plan = plan_resize(source, bounds, scan.unwrap_or(DEFAULT_ORIENTATION));
    Ok(Inspection { scan, source, plan })
}
