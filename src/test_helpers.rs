//! Shared test utilities: synthetic JPEG marker streams and real encoded images.
//!
//! The segment builders produce byte-exact layouts so parser tests can poke at
//! known offsets:
//!
//! ```text
//! exif_segment(Some(6), true)
//!  0  FF E1            APP1 marker
//!  2  00 2E            length (46)
//!  4  "Exif" 00 00
//! 10  "II" 2A 00 08 00 00 00      TIFF header, IFD0 at 8
//! 18  02 00            entry count
//! 20  0F 01 ...        Make entry (ASCII, empty)
//! 32  12 01 03 00 01 00 00 00 06 00 00 00   Orientation entry
//! 44  00 00 00 00      next IFD
//! ```

use image::{ImageEncoder, RgbImage};

/// A minimal JFIF APP0 segment (marker included).
pub fn jfif_segment() -> Vec<u8> {
    let mut segment = vec![0xFF, 0xE0, 0x00, 0x10];
    segment.extend_from_slice(b"JFIF\0");
    segment.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    segment
}

/// An APP1/Exif segment whose IFD0 holds a Make entry and, when given, an
/// Orientation entry.
pub fn exif_segment(orientation: Option<u16>, little_endian: bool) -> Vec<u8> {
    let u16_bytes = |v: u16| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };
    let u32_bytes = |v: u32| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };

    let mut tiff = Vec::new();
    tiff.extend_from_slice(if little_endian { b"II" } else { b"MM" });
    tiff.extend_from_slice(&u16_bytes(42));
    tiff.extend_from_slice(&u32_bytes(8));

    let entry_count = if orientation.is_some() { 2 } else { 1 };
    tiff.extend_from_slice(&u16_bytes(entry_count));

    // Make: ASCII, zero-length
    tiff.extend_from_slice(&u16_bytes(0x010F));
    tiff.extend_from_slice(&u16_bytes(2));
    tiff.extend_from_slice(&u32_bytes(0));
    tiff.extend_from_slice(&u32_bytes(0));

    if let Some(value) = orientation {
        tiff.extend_from_slice(&u16_bytes(0x0112));
        tiff.extend_from_slice(&u16_bytes(3));
        tiff.extend_from_slice(&u32_bytes(1));
        tiff.extend_from_slice(&u16_bytes(value));
        tiff.extend_from_slice(&[0, 0]);
    }

    tiff.extend_from_slice(&u32_bytes(0));

    let length = (2 + 6 + tiff.len()) as u16;
    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(b"Exif\0\0");
    segment.extend_from_slice(&tiff);
    segment
}

/// SOI, the given segments, then EOI.
pub fn jpeg_with_segments(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    for segment in segments {
        data.extend_from_slice(segment);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// Encode a real gradient JPEG of the given size.
pub fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}
