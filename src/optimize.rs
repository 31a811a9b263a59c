use std::{
    path::Path,
    process::{Command, Stdio},
};

use crate::error::{GifstitchError, GifstitchResult};

/// Probe for a usable `gifsicle` binary on PATH.
pub fn is_gifsicle_on_path() -> bool {
    Command::new("gifsicle")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Recompress the GIF at `path` in place with gifsicle.
///
/// Callers treat failure as non-fatal: on error the uncompressed GIF is left
/// untouched on disk.
pub fn optimize_gif(path: &Path) -> GifstitchResult<()> {
    let output = Command::new("gifsicle")
        .args(["--optimize", "--colors", "256", "-o"])
        .arg(path)
        .arg(path)
        .stdout(Stdio::null())
        .output()
        .map_err(|e| {
            GifstitchError::compress(format!(
                "failed to spawn gifsicle (is it installed and on PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GifstitchError::compress(format!(
            "gifsicle exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
