use std::path::PathBuf;

use anyhow::Context as _;
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use tracing::debug;

use crate::error::{GifstitchError, GifstitchResult};

/// Per-frame preprocessing applied between decode and encode.
#[derive(Clone, Copy, Debug, Default)]
pub struct Preprocess {
    /// Longest-edge bound in pixels; frames within the bound pass through.
    pub max_size: Option<u32>,
}

impl Preprocess {
    pub fn validate(&self) -> GifstitchResult<()> {
        if self.max_size == Some(0) {
            return Err(GifstitchError::validation("--max-size must be > 0"));
        }
        Ok(())
    }

    /// Downsize a frame to the longest-edge bound and normalize to RGBA8.
    pub fn apply(&self, img: DynamicImage) -> RgbaImage {
        let img = match self.max_size {
            Some(max) if img.width().max(img.height()) > max => {
                img.resize(max, max, FilterType::Lanczos3)
            }
            _ => img,
        };
        img.to_rgba8()
    }
}

/// Decode every image in order and normalize to RGBA8 frames.
pub fn read_frames(paths: &[PathBuf], pre: &Preprocess) -> GifstitchResult<Vec<RgbaImage>> {
    pre.validate()?;

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::ImageReader::open(path)
            .with_context(|| format!("open image '{}'", path.display()))?
            .decode()
            .with_context(|| format!("decode image '{}'", path.display()))?;
        debug!(
            "decoded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        frames.push(pre.apply(img));
    }
    Ok(frames)
}
