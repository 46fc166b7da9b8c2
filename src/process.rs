//! Batch resizing.
//!
//! Takes a list of files (bytes + mime type + name) and returns a list of the
//! same length and order. Image files are scanned for EXIF orientation,
//! scaled into the bounding box and re-encoded; everything else passes
//! through untouched.
//!
//! ## Ordering
//!
//! By default files are processed one at a time, in input order: each file's
//! decode → draw → encode finishes before the next file is read. With
//! [`ProcessOptions::parallel`] the work runs on the global
//! [rayon](https://docs.rs/rayon) pool; the ordered `collect` still returns
//! results in input order.
//!
//! ## Failure
//!
//! Orientation problems never fail a file (the image is treated as upright).
//! A decode or encode failure aborts the whole batch with
//! [`ProcessError::Imaging`] naming the file. Sequential batches stop at the
//! failing file; parallel batches run every file and report the failure
//! with the lowest input index.
//!
//! ## Fallback
//!
//! If the backend reports itself unavailable, the input list is returned
//! unchanged.

use crate::imaging::{
    BackendError, Dimensions, Rasterizer, ResizeConfig, RustBackend, resize_image,
};
use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Two inputs map to the same output name: {0}")]
    DuplicateName(String),
    #[error("Failed to process {name}: {source}")]
    Imaging {
        name: String,
        #[source]
        source: BackendError,
    },
}

/// Mime type used when a file extension names no known image format.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// One file in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, possibly with a relative directory (`trip/001.jpg`).
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// Case-insensitive check for "image" anywhere in the mime type.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().contains("image")
}

/// Guess a mime type from a path's extension.
pub fn mime_for_path(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME_TYPE.to_string())
}

/// Batch settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    pub resize: ResizeConfig,
    pub parallel: bool,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Resized {
        /// 1-based position in the batch.
        index: usize,
        name: String,
        orientation: u16,
        source: Dimensions,
        canvas: Dimensions,
        bytes_in: usize,
        bytes_out: usize,
    },
    Skipped {
        index: usize,
        name: String,
        mime_type: String,
    },
    /// Backend missing; the batch was returned as-is.
    Unavailable { file_count: usize },
}

/// Resize a batch with the default [`RustBackend`].
pub fn process_files(
    files: Vec<FileEntry>,
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Vec<FileEntry>, ProcessError> {
    process_with_backend(&RustBackend::new(), files, options, events)
}

/// Resize a batch using a specific backend (allows testing with mock).
pub fn process_with_backend<R: Rasterizer>(
    backend: &R,
    files: Vec<FileEntry>,
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Vec<FileEntry>, ProcessError> {
    if !backend.is_available() {
        warn!("image backend unavailable, passing {} files through", files.len());
        send(
            &events,
            ProcessEvent::Unavailable {
                file_count: files.len(),
            },
        );
        return Ok(files);
    }

    info!(
        "processing {} files ({})",
        files.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    if options.parallel {
        let results: Vec<Result<FileEntry, ProcessError>> = files
            .into_par_iter()
            .enumerate()
            .map(|(i, file)| process_entry(backend, i + 1, file, &options.resize, &events))
            .collect();
        // Sequential collect keeps the earliest failure in input order
        results.into_iter().collect()
    } else {
        let mut output = Vec::with_capacity(files.len());
        for (i, file) in files.into_iter().enumerate() {
            output.push(process_entry(backend, i + 1, file, &options.resize, &events)?);
        }
        Ok(output)
    }
}

fn process_entry<R: Rasterizer>(
    backend: &R,
    index: usize,
    file: FileEntry,
    config: &ResizeConfig,
    events: &Option<Sender<ProcessEvent>>,
) -> Result<FileEntry, ProcessError> {
    if !file.is_image() {
        send(
            events,
            ProcessEvent::Skipped {
                index,
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            },
        );
        return Ok(file);
    }

    let resized = resize_image(backend, &file.bytes, &file.mime_type, config).map_err(|source| {
        ProcessError::Imaging {
            name: file.name.clone(),
            source,
        }
    })?;

    send(
        events,
        ProcessEvent::Resized {
            index,
            name: file.name.clone(),
            orientation: resized.orientation,
            source: resized.source,
            canvas: resized.plan.canvas(),
            bytes_in: file.bytes.len(),
            bytes_out: resized.bytes.len(),
        },
    );

    Ok(FileEntry {
        bytes: resized.bytes,
        ..file
    })
}

fn send(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening
        tx.send(event).ok();
    }
}

// ============================================================================
// Filesystem helpers
// ============================================================================

/// Read files and directories into batch entries.
///
/// Directories are walked recursively in file-name order; their entries are
/// named relative to the directory given. Plain files are named by their
/// file name.
pub fn load_entries(paths: &[PathBuf]) -> Result<Vec<FileEntry>, ProcessError> {
    let mut entries = Vec::new();
    for path in paths {
        if path.is_dir() {
            for dir_entry in WalkDir::new(path).sort_by_file_name() {
                let dir_entry = dir_entry?;
                if !dir_entry.file_type().is_file() {
                    continue;
                }
                let relative = dir_entry
                    .path()
                    .strip_prefix(path)
                    .unwrap_or(dir_entry.path());
                entries.push(read_entry(dir_entry.path(), relative)?);
            }
        } else {
            let name = path.file_name().map(Path::new).unwrap_or(path.as_path());
            entries.push(read_entry(path, name)?);
        }
    }
    check_unique_names(&entries)?;
    Ok(entries)
}

/// Fail when two entries would be written to the same output path.
pub fn check_unique_names(entries: &[FileEntry]) -> Result<(), ProcessError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            return Err(ProcessError::DuplicateName(entry.name.clone()));
        }
    }
    Ok(())
}

fn read_entry(path: &Path, name: &Path) -> Result<FileEntry, ProcessError> {
    let bytes = std::fs::read(path)?;
    Ok(FileEntry::new(
        name.to_string_lossy().replace('\\', "/"),
        mime_for_path(path),
        bytes,
    ))
}

/// Write entries under `output_dir`, creating subdirectories as needed.
/// Returns the written paths in entry order. Nothing is written when two
/// entries share a name.
pub fn write_entries(
    output_dir: &Path,
    entries: &[FileEntry],
) -> Result<Vec<PathBuf>, ProcessError> {
    check_unique_names(entries)?;
    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let target = output_dir.join(&entry.name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &entry.bytes)?;
        written.push(target);
    }
    Ok(written)
}
