use image::Delay;

use crate::error::{GifstitchError, GifstitchResult};

/// Frame rate used when neither `--fps` nor `--duration` is given.
pub const DEFAULT_FPS: u32 = 30;

/// How the per-frame delay of the output animation is determined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTiming {
    /// Fixed frame rate; every frame is shown for `1/fps` seconds.
    Fps(u32),
    /// Fixed total runtime in seconds, split evenly across all frames.
    TotalDuration(f64),
}

impl FrameTiming {
    /// Build a timing spec from the two optional user inputs.
    ///
    /// The inputs are mutually exclusive; with neither given, the animation
    /// runs at [`DEFAULT_FPS`].
    pub fn from_flags(fps: Option<u32>, duration: Option<f64>) -> GifstitchResult<Self> {
        match (fps, duration) {
            (Some(_), Some(_)) => Err(GifstitchError::validation(
                "cannot specify both --fps and --duration",
            )),
            (Some(0), None) => Err(GifstitchError::validation("--fps must be > 0")),
            (Some(fps), None) => Ok(Self::Fps(fps)),
            (None, Some(d)) if !d.is_finite() || d <= 0.0 => {
                Err(GifstitchError::validation("--duration must be > 0 seconds"))
            }
            (None, Some(d)) => Ok(Self::TotalDuration(d)),
            (None, None) => Ok(Self::Fps(DEFAULT_FPS)),
        }
    }

    /// Per-frame delay for an animation of `frame_count` frames.
    pub fn frame_delay(self, frame_count: usize) -> GifstitchResult<Delay> {
        if frame_count == 0 {
            return Err(GifstitchError::validation(
                "cannot compute a frame delay for zero frames",
            ));
        }
        match self {
            Self::Fps(fps) => Ok(Delay::from_numer_denom_ms(1000, fps)),
            Self::TotalDuration(secs) => {
                // Saturating cast keeps absurd durations finite rather than panicking.
                let total_ms = (secs * 1000.0).round() as u32;
                Ok(Delay::from_numer_denom_ms(
                    total_ms.max(1),
                    frame_count as u32,
                ))
            }
        }
    }
}
