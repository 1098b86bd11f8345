use image::{imageops, imageops::FilterType, GrayImage};
use serde::Serialize;

use crate::iconset::IconSet;

/// One candidate match for a segmented character.
#[derive(Debug, Clone, Serialize)]
pub struct Guess {
    pub symbol: String,
    pub score: f64,
}

/// Scale whichever image is taller down to the other's dimensions.
///
/// Down-scaling only, with Lanczos resampling; equal heights leave both
/// images untouched.
pub fn scale_pair(a: &GrayImage, b: &GrayImage) -> (GrayImage, GrayImage) {
    if a.height() > b.height() {
        let scaled = imageops::resize(a, b.width(), b.height(), FilterType::Lanczos3);
        (scaled, b.clone())
    } else if a.height() < b.height() {
        let scaled = imageops::resize(b, a.width(), a.height(), FilterType::Lanczos3);
        (a.clone(), scaled)
    } else {
        (a.clone(), b.clone())
    }
}

/// Cosine similarity between the two images' pixel-intensity vectors.
///
/// The taller image is scaled down first so the vectors line up. A
/// zero-norm vector (an all-black image) has no defined angle; that case
/// scores 0 rather than erroring.
pub fn cosine_similarity(a: &GrayImage, b: &GrayImage) -> f64 {
    let (a, b) = scale_pair(a, b);

    let dot: f64 = a
        .pixels()
        .zip(b.pixels())
        .map(|(p, q)| p.0[0] as f64 * q.0[0] as f64)
        .sum();
    let norm_a = a
        .pixels()
        .map(|p| (p.0[0] as f64) * (p.0[0] as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b = b
        .pixels()
        .map(|p| (p.0[0] as f64) * (p.0[0] as f64))
        .sum::<f64>()
        .sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score one segmented character against every reference icon.
///
/// Returns at most `max_guesses` candidates scoring at least
/// `min_similarity`, best first. Equal scores keep icon load order.
pub fn guess_symbol(
    feature: &GrayImage,
    icons: &IconSet,
    min_similarity: f64,
    max_guesses: usize,
) -> Vec<Guess> {
    let mut guesses: Vec<Guess> = icons
        .iter()
        .filter_map(|icon| {
            let score = cosine_similarity(feature, &icon.image);
            (score >= min_similarity).then(|| Guess {
                symbol: icon.symbol.clone(),
                score,
            })
        })
        .collect();

    guesses.sort_by(|a, b| b.score.total_cmp(&a.score));
    guesses.truncate(max_guesses);
    guesses
}
