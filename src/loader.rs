//! Loading feature records from signature files.
//!
//! Each file holds one vector, one floating-point value per line. Metadata comes from the
//! filename: `s05n007.e34` is class `05`, sample `07`, computed with the `E34` descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::FeatureRecord;

/// Descriptor families recognized in filenames.
pub const METHODS: [&str; 5] = ["ART", "ZRK", "E34", "GFD", "YNG"];

/// Read a single record from `path`.
///
/// Lines that do not parse as `f64` are skipped with a warning.
pub fn extract_from_file(path: impl AsRef<Path>) -> Result<FeatureRecord> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => warn!(line, path = %path.display(), "could not parse value, skipping"),
        }
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let method = method_used(&filename);
    let label = label_code(&filename);
    let sample = sample_number(&filename);
    debug!(
        path = %path.display(),
        method = method.as_deref(),
        label = label.as_deref(),
        sample = sample.as_deref(),
        values = values.len(),
        "extracted feature record"
    );

    Ok(FeatureRecord::new(values, label, method, sample))
}

/// Read every regular file in `dir`, in filename order.
pub fn extract_from_folder(dir: impl AsRef<Path>) -> Result<Vec<FeatureRecord>> {
    let dir = dir.as_ref();
    let io_err = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let records = files
        .iter()
        .map(extract_from_file)
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), files = records.len(), "finished extraction from folder");
    Ok(records)
}

fn method_used(filename: &str) -> Option<String> {
    let lower = filename.to_ascii_lowercase();
    let found = METHODS
        .iter()
        .find(|m| lower.contains(&m.to_ascii_lowercase()))
        .map(|m| m.to_string());
    if found.is_none() {
        warn!(filename, "descriptor method not identified in filename");
    }
    found
}

/// Characters `[start, end)` of a filename starting with `s`.
fn filename_field(filename: &str, start: usize, end: usize, what: &str) -> Option<String> {
    let field = filename
        .strip_prefix('s')
        .and_then(|_| filename.get(start..end))
        .map(str::to_string);
    if field.is_none() {
        warn!(filename, field = what, "not identified in filename");
    }
    field
}

fn label_code(filename: &str) -> Option<String> {
    filename_field(filename, 1, 3, "label")
}

fn sample_number(filename: &str) -> Option<String> {
    filename_field(filename, 5, 7, "sample")
}
