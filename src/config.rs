/// Decoder tuning parameters
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum number of characters (features) to decode
    pub max_chars: usize,
    /// Minimum similarity required for a character match, from 0 to 1
    pub min_similarity: f64,
    /// Maximum number of guesses to return for each character
    pub max_guesses: usize,
    /// Minimum number of contiguous ink pixels for a region to count as a
    /// character
    pub min_feature_pixels: u32,
    /// Number of prominent colors to preserve during quantization
    pub channels: usize,
    /// Intensities at or below this value are filtered out before ranking
    pub min_color: u8,
    /// Intensities at or above this value are filtered out before ranking
    pub max_color: u8,
    /// Rank filter kernel size, 0 to skip filtering
    pub rank_size: u32,
    /// Rank filter pixel index within the sorted kernel window
    pub rank_value: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_chars: 6,
            min_similarity: 0.0,
            max_guesses: 2,
            min_feature_pixels: 50,
            channels: 50,
            min_color: 10,
            max_color: 100,
            rank_size: 3,
            rank_value: 2,
        }
    }
}

/// What to do when a character position has no guess at all while
/// flattening a decode result into a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlattenPolicy {
    /// Drop the position, shortening the output string
    #[default]
    Omit,
    /// Emit the given sentinel character in place of a guess
    Placeholder(char),
    /// Fail the whole decode with `CaptchaError::NoGuess`
    Fail,
}
