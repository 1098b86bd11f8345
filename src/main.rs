use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tra_captcha::{Decoder, DecoderConfig, FlattenPolicy, IconSet};

#[derive(Parser, Debug)]
#[command(name = "tra-captcha")]
#[command(about = "Decode a TRA ticketing captcha image")]
#[command(version)]
struct Args {
    /// Path to the captcha image to decode
    image: PathBuf,

    /// Directory containing reference icons, one subdirectory per symbol
    #[arg(long, env = "TRA_CAPTCHA_ICONSET", default_value = "iconset")]
    iconset: PathBuf,

    /// Print the full ranked guess list as JSON instead of a flat string
    #[arg(long)]
    json: bool,

    /// What to emit for characters with no guess above the threshold
    #[arg(long, value_enum, default_value = "omit")]
    on_empty: OnEmpty,

    /// Write intermediate pipeline frames to this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Maximum length of captcha to decode
    #[arg(long, env = "TRA_CAPTCHA_MAX_CHARS", default_value = "6")]
    max_chars: usize,

    /// Minimum similarity required for a character match, from 0 to 1
    #[arg(long, env = "TRA_CAPTCHA_MIN_SIMILARITY", default_value = "0")]
    min_similarity: f64,

    /// Maximum number of guesses to return for each character
    #[arg(long, env = "TRA_CAPTCHA_MAX_GUESSES", default_value = "2")]
    max_guesses: usize,

    /// Minimum number of pixels for a region to count as a character
    #[arg(long, env = "TRA_CAPTCHA_MIN_FEATURE_PIXELS", default_value = "50")]
    min_feature_pixels: u32,

    /// Number of prominent colors to preserve
    #[arg(long, env = "TRA_CAPTCHA_CHANNELS", default_value = "50")]
    channels: usize,

    /// Intensities at or below this value are filtered out
    #[arg(long, env = "TRA_CAPTCHA_MIN_COLOR", default_value = "10")]
    min_color: u8,

    /// Intensities at or above this value are filtered out
    #[arg(long, env = "TRA_CAPTCHA_MAX_COLOR", default_value = "100")]
    max_color: u8,

    /// Rank filter kernel size, 0 to skip filtering
    #[arg(long, env = "TRA_CAPTCHA_RANK_SIZE", default_value = "3")]
    rank_size: u32,

    /// Rank filter pixel index within the sorted kernel window
    #[arg(long, env = "TRA_CAPTCHA_RANK_VALUE", default_value = "2")]
    rank_value: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OnEmpty {
    /// Drop the character position
    Omit,
    /// Emit '?' in its place
    Placeholder,
    /// Fail the decode
    Fail,
}

impl From<OnEmpty> for FlattenPolicy {
    fn from(value: OnEmpty) -> Self {
        match value {
            OnEmpty::Omit => FlattenPolicy::Omit,
            OnEmpty::Placeholder => FlattenPolicy::Placeholder('?'),
            OnEmpty::Fail => FlattenPolicy::Fail,
        }
    }
}

impl Args {
    fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            max_chars: self.max_chars,
            min_similarity: self.min_similarity,
            max_guesses: self.max_guesses,
            min_feature_pixels: self.min_feature_pixels,
            channels: self.channels,
            min_color: self.min_color,
            max_color: self.max_color,
            rank_size: self.rank_size,
            rank_value: self.rank_value,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let icons = Arc::new(IconSet::load(&args.iconset)?);
    let decoder = Decoder::new(icons, args.decoder_config());

    let image = image::open(&args.image)
        .map_err(|source| tra_captcha::CaptchaError::Acquisition {
            path: args.image.clone(),
            source,
        })?;

    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)?;
        let trace = decoder.trace(&image);
        trace.reduced.save(dir.join("reduced.png"))?;
        trace.filtered.save(dir.join("filtered.png"))?;
        for (i, feature) in trace.features.iter().enumerate() {
            feature.image.save(dir.join(format!("feature{i}.png")))?;
        }
    }

    let result = decoder.decode(&image);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.guesses)?);
    } else {
        println!("{}", result.flatten(args.on_empty.into())?);
    }

    Ok(())
}
