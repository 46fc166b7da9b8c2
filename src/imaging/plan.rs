//! Resize planning: output canvas size plus the rotation/flip that puts an
//! image upright.
//!
//! The drawing model is a 2D canvas: the origin is moved to the canvas
//! centre, the context is flipped and/or rotated, and the scaled source is
//! drawn into a rectangle centred on the origin. Because the draw rectangle
//! is always the scaled, *unrotated* size, one fixed draw call covers all
//! eight EXIF orientations.
//!
//! | EXIF | rotation | flip_x | canvas |
//! |---|---|---|---|
//! | 1 / other | 0° | no | w × h |
//! | 2 | 0° | yes | w × h |
//! | 3 | 180° | no | w × h |
//! | 4 | 0° | yes | w × h |
//! | 5 | +90° | yes | h × w |
//! | 6 | +90° | no | h × w |
//! | 7 | −90° | yes | h × w |
//! | 8 | −90° | no | h × w |
//!
//! Positive angles are clockwise (y axis pointing down). The flip is applied
//! to the context before the rotation, so source pixels are rotated first and
//! mirrored second.

use super::backend::Dimensions;
use super::calculations::fit_within_bounds;
use super::params::Bounds;
use serde::Serialize;

/// Quarter-turn rotation applied about the canvas centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    None,
    Clockwise90,
    CounterClockwise90,
    Half,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::CounterClockwise90 => -90,
            Rotation::Half => 180,
        }
    }

    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }
}

/// Everything the draw step needs for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizePlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub rotation: Rotation,
    pub flip_x: bool,
    /// Scaled source size, before rotation.
    pub draw_width: u32,
    pub draw_height: u32,
}

impl ResizePlan {
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.radians()
    }

    /// Top-left corner of the draw rectangle, relative to the canvas centre.
    pub fn draw_origin(&self) -> (f64, f64) {
        (
            -f64::from(self.draw_width) / 2.0,
            -f64::from(self.draw_height) / 2.0,
        )
    }

    pub fn canvas(&self) -> Dimensions {
        Dimensions {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// True when drawing is a plain scale with no rotation or mirroring.
    pub fn is_upright(&self) -> bool {
        self.rotation == Rotation::None && !self.flip_x
    }
}

/// Whether an orientation code needs width and height swapped.
pub fn swaps_axes(orientation: u16) -> bool {
    matches!(orientation, 5..=8)
}

/// Plan the canvas and transform for one image.
///
/// Codes outside 1–8 (including the scanner's fallback) plan like 1.
pub fn plan_resize(source: Dimensions, bounds: Bounds, orientation: u16) -> ResizePlan {
    let (width, height) = fit_within_bounds((source.width, source.height), bounds.as_tuple());

    let (rotation, flip_x) = match orientation {
        6 => (Rotation::Clockwise90, false),
        8 => (Rotation::CounterClockwise90, false),
        5 => (Rotation::Clockwise90, true),
        7 => (Rotation::CounterClockwise90, true),
        3 => (Rotation::Half, false),
        2 | 4 => (Rotation::None, true),
        _ => (Rotation::None, false),
    };

    let (canvas_width, canvas_height) = if swaps_axes(orientation) {
        (height, width)
    } else {
        (width, height)
    };

    ResizePlan {
        canvas_width,
        canvas_height,
        rotation,
        flip_x,
        draw_width: width,
        draw_height: height,
    }
}
