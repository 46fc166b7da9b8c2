//! Pure Rust rasterizer built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Scale | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Rotate / mirror | `rotate90` / `rotate180` / `rotate270` / `fliph` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → other | `DynamicImage::write_to` |
//!
//! EXIF orientation is never applied by the decoder here; the pipeline reads
//! it separately and passes it through the [`ResizePlan`].

use super::backend::{BackendError, Dimensions, Rasterizer};
use super::params::Quality;
use super::plan::{ResizePlan, Rotation};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Rasterizer over `image::DynamicImage`.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a mime type to an `image` format, tolerating common aliases and
/// parameters (`image/jpg`, `image/jpeg; q=1`).
pub fn format_for_mime(mime_type: &str) -> Option<ImageFormat> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
        other => ImageFormat::from_mime_type(other),
    }
}

fn decode_error(err: image::ImageError) -> BackendError {
    BackendError::Decode(err.to_string())
}

fn encode_error(err: image::ImageError) -> BackendError {
    BackendError::Encode(err.to_string())
}

impl Rasterizer for RustBackend {
    type Surface = DynamicImage;

    fn is_available(&self) -> bool {
        ImageFormat::Jpeg.reading_enabled() && ImageFormat::Jpeg.writing_enabled()
    }

    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(decode_error)?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, bytes: &[u8]) -> Result<(DynamicImage, Dimensions), BackendError> {
        let img = image::load_from_memory(bytes).map_err(decode_error)?;
        let dims = Dimensions {
            width: img.width(),
            height: img.height(),
        };
        Ok((img, dims))
    }

    fn draw(&self, surface: DynamicImage, plan: &ResizePlan) -> Result<DynamicImage, BackendError> {
        let scaled = if (surface.width(), surface.height()) == (plan.draw_width, plan.draw_height)
        {
            surface
        } else {
            surface.resize_exact(plan.draw_width, plan.draw_height, FilterType::Lanczos3)
        };

        let rotated = match plan.rotation {
            Rotation::None => scaled,
            Rotation::Clockwise90 => scaled.rotate90(),
            Rotation::CounterClockwise90 => scaled.rotate270(),
            Rotation::Half => scaled.rotate180(),
        };

        let canvas = if plan.flip_x {
            rotated.fliph()
        } else {
            rotated
        };

        debug_assert_eq!(
            (canvas.width(), canvas.height()),
            (plan.canvas_width, plan.canvas_height)
        );
        Ok(canvas)
    }

    fn encode(
        &self,
        canvas: &DynamicImage,
        mime_type: &str,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let format = format_for_mime(mime_type)
            .filter(|fmt| fmt.writing_enabled())
            .ok_or_else(|| BackendError::UnsupportedFormat(mime_type.to_string()))?;

        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(canvas.to_rgb8());
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality.as_u8());
                rgb.write_with_encoder(encoder).map_err(encode_error)?;
            }
            ImageFormat::Avif => {
                let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
                    &mut bytes,
                    6,
                    quality.as_u8(),
                );
                canvas.write_with_encoder(encoder).map_err(encode_error)?;
            }
            other => {
                canvas
                    .write_to(&mut Cursor::new(&mut bytes), other)
                    .map_err(encode_error)?;
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Bounds;
    use crate::imaging::plan::plan_resize;
    use crate::test_helpers::encode_jpeg;
    use image::{Rgb, RgbImage};

    #[test]
    fn available_with_jpeg_feature() {
        assert!(RustBackend::new().is_available());
    }

    #[test]
    fn mime_aliases() {
        assert_eq!(format_for_mime("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(format_for_mime("IMAGE/JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(format_for_mime("image/png; charset=x"), Some(ImageFormat::Png));
        assert_eq!(format_for_mime("text/plain"), None);
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let dims = RustBackend::new().identify(&encode_jpeg(200, 150)).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn decode_garbage_errors() {
        let result = RustBackend::new().decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn draw_scales_and_rotates() {
        let backend = RustBackend::new();
        let (surface, dims) = backend.decode(&encode_jpeg(400, 300)).unwrap();
        let plan = plan_resize(dims, Bounds::new(200, 200), 6);

        let canvas = backend.draw(surface, &plan).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (150, 200));
    }

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    /// 2x2 image with a distinct colour in each corner.
    ///
    /// ```text
    /// R G
    /// B W
    /// ```
    fn four_corner_image() -> DynamicImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, GREEN);
        img.put_pixel(0, 1, BLUE);
        img.put_pixel(1, 1, WHITE);
        DynamicImage::ImageRgb8(img)
    }

    /// Corners in reading order: top-left, top-right, bottom-left, bottom-right.
    fn corners(img: &DynamicImage) -> [Rgb<u8>; 4] {
        let rgb = img.to_rgb8();
        [
            *rgb.get_pixel(0, 0),
            *rgb.get_pixel(1, 0),
            *rgb.get_pixel(0, 1),
            *rgb.get_pixel(1, 1),
        ]
    }

    #[test]
    fn draw_corner_layout_for_every_orientation() {
        let cases = [
            (1, [RED, GREEN, BLUE, WHITE]),
            (2, [GREEN, RED, WHITE, BLUE]),
            (3, [WHITE, BLUE, GREEN, RED]),
            (4, [GREEN, RED, WHITE, BLUE]),
            // Quarter turns rotate first, then mirror
            (5, [RED, BLUE, GREEN, WHITE]),
            (6, [BLUE, RED, WHITE, GREEN]),
            (7, [WHITE, GREEN, BLUE, RED]),
            (8, [GREEN, WHITE, RED, BLUE]),
        ];

        for (code, expected) in cases {
            let plan = plan_resize(Dimensions { width: 2, height: 2 }, Bounds::default(), code);
            let canvas = RustBackend::new().draw(four_corner_image(), &plan).unwrap();
            assert_eq!((canvas.width(), canvas.height()), (2, 2), "size for {code}");
            assert_eq!(corners(&canvas), expected, "corners for {code}");
        }
    }

    #[test]
    fn draw_quarter_turn_swaps_non_square_canvas() {
        let plan = plan_resize(Dimensions { width: 2, height: 1 }, Bounds::default(), 8);
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, BLUE);

        let canvas = RustBackend::new()
            .draw(DynamicImage::ImageRgb8(img), &plan)
            .unwrap();
        assert_eq!((canvas.width(), canvas.height()), (1, 2));
        // Counter-clockwise: the left edge ends up at the bottom
        assert_eq!(*canvas.to_rgb8().get_pixel(0, 1), RED);
    }

    #[test]
    fn encode_jpeg_roundtrip_dimensions() {
        let backend = RustBackend::new();
        let (surface, _) = backend.decode(&encode_jpeg(64, 48)).unwrap();
        let bytes = backend
            .encode(&surface, "image/jpeg", Quality::default())
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            backend.identify(&bytes).unwrap(),
            Dimensions {
                width: 64,
                height: 48
            }
        );
    }

    #[test]
    fn encode_png() {
        let backend = RustBackend::new();
        let bytes = backend
            .encode(&four_corner_image(), "image/png", Quality::default())
            .unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn encode_unknown_mime_errors() {
        let result =
            RustBackend::new().encode(&four_corner_image(), "image/x-unknown", Quality::default());
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }
}
