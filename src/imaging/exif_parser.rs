//! Minimal EXIF orientation reader for JPEG streams.
//!
//! Walks the JPEG marker stream until the first APP1/Exif segment, then reads
//! tag `0x0112` (Orientation) from IFD0. Nothing else in the EXIF block is
//! interpreted.
//!
//! ```text
//! FF D8                          SOI
//! FF E0 LL LL ...                APPn segments (skipped by length)
//! FF E1 LL LL "Exif" 00 00       APP1 header
//!   "II" | "MM"  2A ..           TIFF header, byte order + IFD0 offset
//!   NN NN                        IFD0 entry count
//!   [tag type count value] * NN  12-byte entries
//! ```
//!
//! Every read goes through [`ByteCursor`], which checks bounds first. A read
//! past the end of the buffer is reported as [`ScanError::Malformed`].

use log::debug;
use thiserror::Error;

/// Orientation used when a buffer carries no readable tag.
pub const DEFAULT_ORIENTATION: u16 = 1;

const SOI_MARKER: u16 = 0xFFD8;
const APP1_MARKER: u16 = 0xFFE1;
const MARKER_PREFIX: u16 = 0xFF00;
/// "Exif" read as a big-endian u32.
const EXIF_SIGNATURE: u32 = 0x4578_6966;
/// "II": Intel (little-endian) TIFF byte order.
const LITTLE_ENDIAN_MARK: u16 = 0x4949;
const ORIENTATION_TAG: u16 = 0x0112;
const IFD_ENTRY_SIZE: usize = 12;
/// Segment lengths at or below this cannot hold an Exif header.
const MIN_SEGMENT_LENGTH: u16 = 8;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("not a JPEG stream")]
    FormatMismatch,
    #[error("EXIF orientation missing or malformed")]
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Big,
    Little,
}

/// Read position over a borrowed buffer with explicit-endian reads.
#[derive(Debug, Clone, Copy)]
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn advance(&mut self, by: usize) -> Result<(), ScanError> {
        self.pos = self.pos.checked_add(by).ok_or(ScanError::Malformed)?;
        Ok(())
    }

    fn bytes_at<const N: usize>(&self, rel: usize) -> Result<[u8; N], ScanError> {
        let start = self.pos.checked_add(rel).ok_or(ScanError::Malformed)?;
        let end = start.checked_add(N).ok_or(ScanError::Malformed)?;
        self.data
            .get(start..end)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ScanError::Malformed)
    }

    fn u16_at(&self, rel: usize, order: ByteOrder) -> Result<u16, ScanError> {
        let bytes = self.bytes_at::<2>(rel)?;
        Ok(match order {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        })
    }

    fn u32_at(&self, rel: usize, order: ByteOrder) -> Result<u32, ScanError> {
        let bytes = self.bytes_at::<4>(rel)?;
        Ok(match order {
            ByteOrder::Big => u32::from_be_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
        })
    }
}

/// Scan a raw JPEG buffer for its EXIF orientation code.
///
/// Returns the raw tag value (normally 1–8). Only the first Exif segment is
/// consulted; if it has no orientation entry the result is
/// [`ScanError::Malformed`].
pub fn scan_orientation(data: &[u8]) -> Result<u16, ScanError> {
    let mut cursor = ByteCursor::new(data);
    let soi = cursor
        .u16_at(0, ByteOrder::Big)
        .map_err(|_| ScanError::FormatMismatch)?;
    if soi != SOI_MARKER {
        return Err(ScanError::FormatMismatch);
    }
    cursor.advance(2)?;

    while cursor.position() < data.len() {
        if cursor.u16_at(2, ByteOrder::Big)? <= MIN_SEGMENT_LENGTH {
            return Err(ScanError::Malformed);
        }

        let marker = cursor.u16_at(0, ByteOrder::Big)?;
        cursor.advance(2)?;

        if marker == APP1_MARKER {
            return read_exif_orientation(cursor);
        }
        if marker & MARKER_PREFIX != MARKER_PREFIX {
            break;
        }

        let segment_len = cursor.u16_at(0, ByteOrder::Big)?;
        cursor.advance(usize::from(segment_len))?;
    }

    Err(ScanError::Malformed)
}

/// Read the orientation entry from an APP1 segment.
///
/// `cursor` sits on the segment's length field.
fn read_exif_orientation(mut cursor: ByteCursor<'_>) -> Result<u16, ScanError> {
    cursor.advance(2)?;
    if cursor.u32_at(0, ByteOrder::Big)? != EXIF_SIGNATURE {
        return Err(ScanError::Malformed);
    }

    // "Exif\0\0", then the TIFF header
    cursor.advance(6)?;
    let order = if cursor.u16_at(0, ByteOrder::Big)? == LITTLE_ENDIAN_MARK {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };

    let ifd_offset = cursor.u32_at(4, order)?;
    cursor.advance(ifd_offset as usize)?;

    let entry_count = cursor.u16_at(0, order)?;
    cursor.advance(2)?;

    for i in 0..usize::from(entry_count) {
        let entry = i * IFD_ENTRY_SIZE;
        if cursor.u16_at(entry, order)? == ORIENTATION_TAG {
            return cursor.u16_at(entry + 8, order);
        }
    }

    Err(ScanError::Malformed)
}

/// Orientation code for a buffer, falling back to [`DEFAULT_ORIENTATION`].
///
/// Scan errors never leave this function; they are logged at debug level.
pub fn read_orientation(data: &[u8]) -> u16 {
    match scan_orientation(data) {
        Ok(code) => code,
        Err(err) => {
            debug!("no usable orientation ({err}), using {DEFAULT_ORIENTATION}");
            DEFAULT_ORIENTATION
        }
    }
}
