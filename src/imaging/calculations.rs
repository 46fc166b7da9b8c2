//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` down to fit `bounds`, preserving aspect ratio.
///
/// Only the dominant axis is checked: landscape sources are limited by
/// `max_width`, portrait and square sources by `max_height`. Sources already
/// within that bound are returned unchanged; images are never upscaled.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (max_width, max_height)
///
/// # Examples
/// ```
/// # use upright::imaging::fit_within_bounds;
/// // 4000x3000 landscape into 2000x2000 → 2000x1500
/// assert_eq!(fit_within_bounds((4000, 3000), (2000, 2000)), (2000, 1500));
///
/// // Already small enough → unchanged
/// assert_eq!(fit_within_bounds((800, 600), (2000, 2000)), (800, 600));
/// ```
pub fn fit_within_bounds(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = source;
    let (max_width, max_height) = bounds;

    if width > height {
        if width > max_width {
            return (max_width, scale_edge(height, max_width, width));
        }
    } else if height > max_height {
        return (scale_edge(width, max_height, height), max_height);
    }

    (width, height)
}

/// Scale `edge` by `target / reference`, rounded, never below one pixel.
fn scale_edge(edge: u32, target: u32, reference: u32) -> u32 {
    let scaled = (edge as f64 * (target as f64 / reference as f64)).round() as u32;
    scaled.max(1)
}
