use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use gifstitch::{EncodeConfig, FrameTiming, Preprocess};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "gifstitch",
    version,
    about = "Create an animated GIF from a directory of numbered images."
)]
struct Cli {
    /// Directory containing the numbered input images.
    directory: PathBuf,

    /// Output file name (defaults to the directory's basename).
    #[arg(short, long)]
    name: Option<String>,

    /// Frames per second. Specify either an fps or a duration.
    #[arg(long)]
    fps: Option<u32>,

    /// Total animation length in seconds. Specify either an fps or a duration.
    #[arg(long)]
    duration: Option<f64>,

    /// Downscale frames whose longest edge exceeds this many pixels.
    #[arg(long)]
    max_size: Option<u32>,

    /// Compress the output with gifsicle.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    optimize: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Flag validation happens before any file I/O.
    let timing = FrameTiming::from_flags(cli.fps, cli.duration)?;

    let directory = cli
        .directory
        .canonicalize()
        .with_context(|| format!("read input directory '{}'", cli.directory.display()))?;

    let optimize = if cli.optimize {
        let found = gifstitch::is_gifsicle_on_path();
        if !found {
            warn!(
                "no gifsicle installation found; the output will not be compressed \
                 (install it via your package manager, https://www.lcdf.org/gifsicle/)"
            );
        }
        found
    } else {
        false
    };

    let images = gifstitch::order_numerically(gifstitch::list_images(&directory)?)?;
    let frames = gifstitch::read_frames(
        &images,
        &Preprocess {
            max_size: cli.max_size,
        },
    )?;

    let cfg = EncodeConfig {
        dir: directory,
        name: cli.name,
        timing,
    };
    let out_path = gifstitch::write_gif(&cfg, frames)?;

    if optimize {
        info!("optimizing with gifsicle");
        if let Err(err) = gifstitch::optimize_gif(&out_path) {
            warn!("gifsicle failed, keeping the uncompressed output: {err}");
        }
    }

    eprintln!("wrote {}", out_path.display());
    Ok(())
}
