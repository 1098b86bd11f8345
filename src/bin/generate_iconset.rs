//! Synthesize a reference iconset from upright glyph samples.
//!
//! Takes a directory of images named `<symbol>.<ext>` (e.g. `7.png`) and
//! writes `<output>/<symbol>/<n>.png` rotated variants for each, covering
//! the range of tilts the captcha generator applies to its characters.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tra_captcha::iconset;

#[derive(Parser, Debug)]
#[command(name = "generate-iconset")]
#[command(about = "Generate rotated reference icons from upright glyph samples")]
#[command(version)]
struct Args {
    /// Directory of upright samples, one image per symbol named <symbol>.<ext>
    source: PathBuf,

    /// Iconset directory to write, one subdirectory per symbol
    #[arg(long, default_value = "iconset")]
    output: PathBuf,

    /// Largest rotation in degrees, applied in both directions
    #[arg(long, default_value = "60")]
    max_angle: u32,

    /// Degrees between consecutive rotated variants
    #[arg(long, default_value = "5")]
    step: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("info"))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let step = args.step.max(1) as i32;
    let max_angle = args.max_angle as i32;

    for entry in fs::read_dir(&args.source)
        .with_context(|| format!("failed to read {}", args.source.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let symbol = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };

        let image = match image::open(&path) {
            Ok(image) => image.to_luma8(),
            Err(err) => {
                tracing::warn!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        let out_dir = args.output.join(&symbol);
        fs::create_dir_all(&out_dir)?;

        let mut angles: Vec<i32> = (0..=max_angle).step_by(step as usize).collect();
        angles.extend((step..=max_angle).step_by(step as usize).map(|a| -a));

        for (n, angle) in angles.iter().enumerate() {
            let sample = iconset::rotate(&image, *angle as f32);
            let out = out_dir.join(format!("{n}.png"));
            sample
                .save(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }
        tracing::info!("{}: wrote {} samples", symbol, angles.len());
    }

    Ok(())
}
