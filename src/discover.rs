use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tracing::{debug, info};

use crate::error::{GifstitchError, GifstitchResult};

/// Extensions the tool treats as input frames.
pub const VALID_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// List all image files in `dir`, unordered.
///
/// Non-image entries are skipped and reported at debug level. An empty result
/// is an error: the tool refuses to produce an empty animation.
pub fn list_images(dir: &Path) -> GifstitchResult<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read input directory '{}'", dir.display()))?;

    let mut images = Vec::new();
    let mut skipped = 0usize;
    let mut total_bytes = 0u64;

    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            skipped += 1;
            debug!("skipping non-file entry {}", path.display());
            continue;
        }
        if !has_image_extension(&path) {
            skipped += 1;
            debug!("skipping non-image file {}", path.display());
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            total_bytes += meta.len();
        }
        images.push(path);
    }

    if images.is_empty() {
        return Err(GifstitchError::discovery(format!(
            "no images found in directory: {}",
            dir.display()
        )));
    }

    info!(
        "found {} images ({:.2} MiB), skipped {} other entries",
        images.len(),
        total_bytes as f64 / (1024.0 * 1024.0),
        skipped
    );

    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| VALID_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
}

/// Order image files by the numeric component of their file names, so that
/// `2.png` sorts before `10.png`.
pub fn order_numerically(images: Vec<PathBuf>) -> GifstitchResult<Vec<PathBuf>> {
    let mut keyed = Vec::with_capacity(images.len());
    for path in images {
        let number = frame_number(&path)?;
        keyed.push((number, path));
    }
    keyed.sort_by_key(|(n, _)| *n);

    for pair in keyed.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(GifstitchError::discovery(format!(
                "duplicate frame number {} in '{}' and '{}'",
                pair[0].0,
                pair[0].1.display(),
                pair[1].1.display()
            )));
        }
    }

    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

/// Extract the numeric run from a file stem.
///
/// Only the stem is inspected, so digits in parent directory names never
/// affect ordering. Exactly one digit run is required; anything else makes
/// the ordering ambiguous.
fn frame_number(path: &Path) -> GifstitchResult<u64> {
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        GifstitchError::discovery(format!("file name '{}' is not valid UTF-8", path.display()))
    })?;

    let mut runs = Vec::new();
    let mut current: Option<String> = None;
    for ch in stem.chars() {
        if ch.is_ascii_digit() {
            current.get_or_insert_with(String::new).push(ch);
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    if let Some(run) = current.take() {
        runs.push(run);
    }

    match runs.as_slice() {
        [] => Err(GifstitchError::discovery(format!(
            "file name '{}' has no numeric component",
            path.display()
        ))),
        [run] => run.parse::<u64>().map_err(|_| {
            GifstitchError::discovery(format!(
                "frame number '{run}' in '{}' is out of range",
                path.display()
            ))
        }),
        _ => Err(GifstitchError::discovery(format!(
            "file name numbering in '{}' is ambiguous",
            path.display()
        ))),
    }
}
