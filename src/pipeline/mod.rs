//! The decoding pipeline: palette reduction, rank filtering,
//! segmentation, and per-character matching.

pub mod palette;
pub mod rank;
pub mod segment;

pub use segment::Feature;

use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{DecoderConfig, FlattenPolicy};
use crate::error::CaptchaError;
use crate::iconset::IconSet;
use crate::matcher::{self, Guess};

/// Pixel value for character strokes in a binary mask.
pub const INK: u8 = 0;
/// Pixel value for everything else.
pub const BACKGROUND: u8 = 255;

/// Ranked guesses for each segmented character, left to right.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResult {
    pub guesses: Vec<Vec<Guess>>,
}

impl DecodeResult {
    /// Number of segmented characters.
    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    /// Collapse to a plain string using each character's best guess.
    ///
    /// `policy` decides what happens at positions where no guess met the
    /// similarity threshold.
    pub fn flatten(&self, policy: FlattenPolicy) -> Result<String, CaptchaError> {
        let mut out = String::new();
        for (position, guesses) in self.guesses.iter().enumerate() {
            match guesses.first() {
                Some(best) => out.push_str(&best.symbol),
                None => match policy {
                    FlattenPolicy::Omit => {}
                    FlattenPolicy::Placeholder(c) => out.push(c),
                    FlattenPolicy::Fail => return Err(CaptchaError::NoGuess { position }),
                },
            }
        }
        Ok(out)
    }
}

/// Intermediate frames captured during a decode, for debugging.
pub struct PipelineTrace {
    /// After palette reduction
    pub reduced: GrayImage,
    /// After rank filtering
    pub filtered: GrayImage,
    pub features: Vec<Feature>,
}

/// Wires the pipeline stages together against a shared reference set.
pub struct Decoder {
    config: DecoderConfig,
    icons: Arc<IconSet>,
}

impl Decoder {
    pub fn new(icons: Arc<IconSet>, config: DecoderConfig) -> Self {
        Self { config, icons }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a captcha image from disk.
    ///
    /// An unreadable or undecodable file is fatal; everything past
    /// acquisition degrades locally instead of failing.
    pub fn decode_path(&self, path: &Path) -> Result<DecodeResult, CaptchaError> {
        let image = image::open(path).map_err(|source| CaptchaError::Acquisition {
            path: path.into(),
            source,
        })?;
        Ok(self.decode(&image))
    }

    /// Decode an already-loaded captcha image.
    pub fn decode(&self, image: &DynamicImage) -> DecodeResult {
        let features = self.trace(image).features;

        let start = Instant::now();
        let guesses: Vec<Vec<Guess>> = features
            .iter()
            .map(|f| {
                matcher::guess_symbol(
                    &f.image,
                    &self.icons,
                    self.config.min_similarity,
                    self.config.max_guesses,
                )
            })
            .collect();
        tracing::debug!(
            "match: {} characters in {}ms",
            guesses.len(),
            start.elapsed().as_millis()
        );

        DecodeResult { guesses }
    }

    /// Segment an image into character features.
    pub fn features(&self, image: &DynamicImage) -> Vec<Feature> {
        self.trace(image).features
    }

    /// Run the segmentation stages, keeping each intermediate frame.
    pub fn trace(&self, image: &DynamicImage) -> PipelineTrace {
        let gray = image.to_luma8();

        let start = Instant::now();
        let reduced = palette::apply(
            &gray,
            self.config.channels,
            self.config.min_color,
            self.config.max_color,
        );
        tracing::debug!("palette: {}ms", start.elapsed().as_millis());

        let start = Instant::now();
        let filtered = rank::apply(&reduced, self.config.rank_size, self.config.rank_value);
        tracing::debug!("rank: {}ms", start.elapsed().as_millis());

        let start = Instant::now();
        let features = segment::apply(
            &filtered,
            self.config.max_chars,
            self.config.min_feature_pixels,
        );
        tracing::debug!(
            "segment: {} features in {}ms",
            features.len(),
            start.elapsed().as_millis()
        );

        PipelineTrace {
            reduced,
            filtered,
            features,
        }
    }
}
