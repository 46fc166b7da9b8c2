//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Resize
//!
//! ```text
//! 001 IMG_0412.jpg
//!     Orientation: 6 (rotate 90° clockwise)
//!     4000x3000 → 1500x2000 (3.1 MB → 812.4 KB)
//! 002 notes.txt
//!     Skipped: text/plain
//!
//! Resized 1 image, skipped 1 file
//! ```
//!
//! ## Inspect
//!
//! ```text
//! 001 IMG_0412.jpg
//!     Orientation: 6 (rotate 90° clockwise)
//!     Source: 4000x3000
//!     Canvas: 3000x4000
//! 002 scan.png
//!     Orientation: none (not a JPEG stream)
//!     Source: 1200x900
//!     Canvas: 1200x900
//! ```

use crate::imaging::{Dimensions, Inspection, ResizePlan};
use crate::process::ProcessEvent;
use serde::Serialize;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_dims(dims: Dimensions) -> String {
    format!("{}x{}", dims.width, dims.height)
}

/// Human-readable byte count (B, KB, MB; 1024-based).
fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// What an EXIF orientation code asks for, in words.
pub fn describe_orientation(code: u16) -> &'static str {
    match code {
        1 => "upright",
        2 => "mirror horizontally",
        3 => "rotate 180°",
        4 => "mirror vertically",
        5 => "mirror, rotate 90° clockwise",
        6 => "rotate 90° clockwise",
        7 => "mirror, rotate 90° counter-clockwise",
        8 => "rotate 90° counter-clockwise",
        _ => "unknown, treated as upright",
    }
}

fn orientation_line(code: u16) -> String {
    format!("{}Orientation: {} ({})", indent(1), code, describe_orientation(code))
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

// ============================================================================
// Resize output
// ============================================================================

/// Format one batch event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Resized {
            index,
            name,
            orientation,
            source,
            canvas,
            bytes_in,
            bytes_out,
        } => vec![
            format!("{} {}", format_index(*index), name),
            orientation_line(*orientation),
            format!(
                "{}{} \u{2192} {} ({} \u{2192} {})",
                indent(1),
                format_dims(*source),
                format_dims(*canvas),
                format_bytes(*bytes_in),
                format_bytes(*bytes_out)
            ),
        ],
        ProcessEvent::Skipped {
            index,
            name,
            mime_type,
        } => vec![
            format!("{} {}", format_index(*index), name),
            format!("{}Skipped: {}", indent(1), mime_type),
        ],
        ProcessEvent::Unavailable { file_count } => vec![format!(
            "Image backend unavailable; {} passed through unchanged",
            pluralize(*file_count, "file", "files")
        )],
    }
}

/// Final line after a resize run.
pub fn format_resize_summary(resized: usize, skipped: usize) -> String {
    format!(
        "Resized {}, skipped {}",
        pluralize(resized, "image", "images"),
        pluralize(skipped, "file", "files")
    )
}

// ============================================================================
// Inspect output
// ============================================================================

/// Serializable view of one inspected file (`inspect --json`).
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub name: String,
    /// Raw tag value, when one was found.
    pub orientation: Option<u16>,
    /// Why no tag was used, when none was found.
    pub scan_error: Option<String>,
    pub source: Dimensions,
    pub plan: ResizePlan,
}

impl InspectReport {
    pub fn new(name: impl Into<String>, inspection: &Inspection) -> Self {
        let (orientation, scan_error) = match inspection.scan {
            Ok(code) => (Some(code), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            name: name.into(),
            orientation,
            scan_error,
            source: inspection.source,
            plan: inspection.plan,
        }
    }
}

/// Format inspect results, one block per file in input order.
pub fn format_inspect_output(reports: &[InspectReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), report.name));
        match (report.orientation, &report.scan_error) {
            (Some(code), _) => lines.push(orientation_line(code)),
            (None, Some(reason)) => {
                lines.push(format!("{}Orientation: none ({})", indent(1), reason))
            }
            (None, None) => lines.push(format!("{}Orientation: none", indent(1))),
        }
        lines.push(format!("{}Source: {}", indent(1), format_dims(report.source)));
        lines.push(format!(
            "{}Canvas: {}",
            indent(1),
            format_dims(report.plan.canvas())
        ));
    }
    lines
}

/// Print inspect results to stdout.
pub fn print_inspect_output(reports: &[InspectReport]) {
    for line in format_inspect_output(reports) {
        println!("{}", line);
    }
}
