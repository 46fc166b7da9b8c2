//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! and the [`backend`](super::backend) that does the pixel work.
//!
//! - [`Bounds`]: the box an output image must fit in (default 4000×4000).
//! - [`Quality`]: lossy encoding quality (1–100, default 92). Clamped on construction.

use serde::Serialize;

/// Maximum output size. Both edges are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    pub const DEFAULT_EDGE: u32 = 4000;

    /// Zero edges are raised to one pixel.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width: max_width.max(1),
            max_height: max_height.max(1),
        }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EDGE, Self::DEFAULT_EDGE)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The value as the `u8` the `image` encoders take.
    pub fn as_u8(self) -> u8 {
        self.0 as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}
