//! Image processing: orientation-aware resizing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | custom parser (JPEG APP1 / Exif IFD0 tag 0x0112) |
//! | **Plan** | pure functions: fit-to-bounds + 8-way orientation table |
//! | **Decode / draw / encode** | `image` crate, Lanczos3 |
//!
//! The module is split into:
//! - **Exif parser**: Bounds-checked marker walk that finds the orientation tag
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Plan**: Canvas size + rotation/flip for one image
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`Rasterizer`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining the above

pub mod backend;
mod calculations;
pub mod exif_parser;
pub mod operations;
mod params;
pub mod plan;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, Rasterizer};
pub use calculations::fit_within_bounds;
pub use exif_parser::{DEFAULT_ORIENTATION, ScanError, read_orientation, scan_orientation};
pub use operations::{Inspection, ResizeConfig, ResizedImage, inspect_image, resize_image};
pub use params::{Bounds, Quality};
pub use plan::{ResizePlan, Rotation, plan_resize};
pub use rust_backend::RustBackend;
