//! Captcha decoder for the Taiwan Railways Administration online
//! ticketing system.
//!
//! Decoding reduces the input image to its dominant ink colors, splits
//! the resulting mask into connected character regions, and matches each
//! region against a labeled reference iconset using cosine similarity:
//!
//! ```no_run
//! use std::sync::Arc;
//! use tra_captcha::{Decoder, DecoderConfig, FlattenPolicy, IconSet};
//!
//! # fn main() -> Result<(), tra_captcha::CaptchaError> {
//! let icons = Arc::new(IconSet::load("iconset".as_ref())?);
//! let decoder = Decoder::new(icons, DecoderConfig::default());
//! let result = decoder.decode_path("captcha.jpeg".as_ref())?;
//! println!("{}", result.flatten(FlattenPolicy::Omit)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod iconset;
pub mod matcher;
pub mod pipeline;

pub use config::{DecoderConfig, FlattenPolicy};
pub use error::CaptchaError;
pub use iconset::{Icon, IconSet};
pub use matcher::Guess;
pub use pipeline::{DecodeResult, Decoder, Feature, PipelineTrace};
