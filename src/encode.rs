use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{
    Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};
use tracing::info;

use crate::{
    error::{GifstitchError, GifstitchResult},
    timing::FrameTiming,
};

/// Where and how the output GIF is written.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Input directory; the GIF is written alongside the frames.
    pub dir: PathBuf,
    /// Output file name override. Defaults to the directory's basename.
    pub name: Option<String>,
    pub timing: FrameTiming,
}

impl EncodeConfig {
    pub fn validate(&self) -> GifstitchResult<()> {
        if !self.dir.is_dir() {
            return Err(GifstitchError::validation(format!(
                "'{}' is not a valid directory",
                self.dir.display()
            )));
        }
        self.out_path().map(|_| ())
    }

    /// Resolved output path: `dir/name`, with `.gif` appended to bare names.
    pub fn out_path(&self) -> GifstitchResult<PathBuf> {
        let base = match &self.name {
            Some(name) => name.clone(),
            None => self
                .dir
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    GifstitchError::validation(format!(
                        "cannot derive an output name from '{}'; pass --name",
                        self.dir.display()
                    ))
                })?,
        };

        let name = match Path::new(&base).extension() {
            None => format!("{base}.gif"),
            Some(ext) if ext.eq_ignore_ascii_case("gif") => base,
            Some(ext) => {
                return Err(GifstitchError::validation(format!(
                    "'.{}' is not a valid output extension (expected .gif)",
                    ext.to_string_lossy()
                )));
            }
        };

        Ok(self.dir.join(name))
    }
}

/// Encode `frames` into an animated GIF at the configured path.
///
/// The animation loops forever and every frame carries the same delay. A
/// failed encode removes the partial output file.
pub fn write_gif(cfg: &EncodeConfig, frames: Vec<RgbaImage>) -> GifstitchResult<PathBuf> {
    cfg.validate()?;
    if frames.is_empty() {
        return Err(GifstitchError::encode("no frames to encode"));
    }

    let (width, height) = frames[0].dimensions();
    for (i, frame) in frames.iter().enumerate() {
        if frame.dimensions() != (width, height) {
            return Err(GifstitchError::encode(format!(
                "frame size mismatch: frame {} is {}x{}, expected {}x{}",
                i,
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }
    }

    let delay = cfg.timing.frame_delay(frames.len())?;
    let out_path = cfg.out_path()?;

    if let Err(err) = encode_frames(&out_path, frames, delay) {
        let _ = std::fs::remove_file(&out_path);
        return Err(err);
    }

    info!("gif written to {}", out_path.display());
    Ok(out_path)
}

fn encode_frames(
    out_path: &Path,
    frames: Vec<RgbaImage>,
    delay: image::Delay,
) -> GifstitchResult<()> {
    let file = File::create(out_path)
        .with_context(|| format!("create output file '{}'", out_path.display()))?;

    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder
        .set_repeat(Repeat::Infinite)
        .context("set gif repeat")?;

    for (i, frame) in frames.into_iter().enumerate() {
        encoder
            .encode_frame(Frame::from_parts(frame, 0, 0, delay))
            .with_context(|| format!("encode frame {i}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;
    use std::time::Duration;

    use image::{AnimationDecoder, Rgba, codecs::gif::GifDecoder};

    use super::*;

    #[test]
    fn default_name_comes_from_the_directory_basename() {
        let cfg = EncodeConfig {
            dir: PathBuf::from("captures/party"),
            name: None,
            timing: FrameTiming::Fps(30),
        };
        assert_eq!(cfg.out_path().unwrap(), PathBuf::from("captures/party/party.gif"));
    }

    #[test]
    fn bare_names_get_a_gif_extension() {
        let cfg = EncodeConfig {
            dir: PathBuf::from("captures/party"),
            name: Some("test".to_string()),
            timing: FrameTiming::Fps(30),
        };
        assert_eq!(cfg.out_path().unwrap(), PathBuf::from("captures/party/test.gif"));
    }

    #[test]
    fn explicit_gif_extension_is_kept() {
        let cfg = EncodeConfig {
            dir: PathBuf::from("captures/party"),
            name: Some("out.GIF".to_string()),
            timing: FrameTiming::Fps(30),
        };
        assert_eq!(cfg.out_path().unwrap(), PathBuf::from("captures/party/out.GIF"));
    }

    #[test]
    fn non_gif_extensions_are_rejected() {
        let cfg = EncodeConfig {
            dir: PathBuf::from("captures/party"),
            name: Some("test.blah".to_string()),
            timing: FrameTiming::Fps(30),
        };
        assert!(cfg.out_path().is_err());
    }

    #[test]
    fn writes_all_frames_in_order_with_the_requested_delay() {
        let dir = PathBuf::from("target").join("encode_roundtrip_test");
        std::fs::create_dir_all(&dir).unwrap();

        let colors = [
            Rgba([255u8, 0, 0, 255]),
            Rgba([0u8, 255, 0, 255]),
            Rgba([0u8, 0, 255, 255]),
        ];
        let frames: Vec<RgbaImage> = colors
            .iter()
            .map(|c| RgbaImage::from_pixel(8, 8, *c))
            .collect();

        let cfg = EncodeConfig {
            dir: dir.clone(),
            name: Some("out".to_string()),
            timing: FrameTiming::Fps(10),
        };
        let out_path = write_gif(&cfg, frames).unwrap();
        assert_eq!(out_path, dir.join("out.gif"));

        let decoder = GifDecoder::new(BufReader::new(File::open(&out_path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);

        for (frame, expected) in decoded.iter().zip(colors) {
            assert_eq!(Duration::from(frame.delay()), Duration::from_millis(100));
            let px = frame.buffer().get_pixel(0, 0);
            // Palette quantization may nudge channel values; the dominant
            // channel still identifies the frame.
            let dominant = (0..3).max_by_key(|&i| px.0[i]).unwrap();
            let expected_dominant = (0..3).max_by_key(|&i| expected.0[i]).unwrap();
            assert_eq!(dominant, expected_dominant);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_frame_sizes_are_rejected() {
        let dir = PathBuf::from("target").join("encode_mismatch_test");
        std::fs::create_dir_all(&dir).unwrap();

        let frames = vec![
            RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])),
            RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])),
        ];
        let cfg = EncodeConfig {
            dir: dir.clone(),
            name: Some("out".to_string()),
            timing: FrameTiming::Fps(10),
        };
        let err = write_gif(&cfg, frames).unwrap_err();
        assert!(err.to_string().contains("frame size mismatch"));
        assert!(!dir.join("out.gif").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_frame_list_is_rejected() {
        let dir = PathBuf::from("target").join("encode_empty_test");
        std::fs::create_dir_all(&dir).unwrap();

        let cfg = EncodeConfig {
            dir: dir.clone(),
            name: Some("out".to_string()),
            timing: FrameTiming::Fps(10),
        };
        assert!(write_gif(&cfg, Vec::new()).is_err());
        assert!(!dir.join("out.gif").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
