#![allow(dead_code)]

//! Shared helpers for end-to-end tests: a synthetic 5x7 digit font, a
//! captcha composer, and an on-disk iconset builder.
//!
//! Icons are produced by running a single-glyph image through the same
//! pipeline stages a real decode uses, so a template and the feature
//! segmented from a clean captcha agree pixel for pixel.

use image::{GrayImage, Luma};
use std::fs;
use std::path::Path;
use tra_captcha::pipeline::{palette, rank, segment};
use tra_captcha::DecoderConfig;

/// In-range stroke intensity for rendered glyphs
pub const GLYPH_COLOR: u8 = 60;
/// In-range intensity for injected noise
pub const NOISE_COLOR: u8 = 40;
/// Out-of-range background intensity
pub const BACKGROUND_COLOR: u8 = 230;

const SCALE: u32 = 4;
const CELL_W: u32 = 5 * SCALE;
const CELL_H: u32 = 7 * SCALE;
const GAP: u32 = 12;
const MARGIN: u32 = 10;

#[rustfmt::skip]
const FONT: [[&str; 7]; 10] = [
    ["01110", "10001", "10011", "10101", "11001", "10001", "01110"], // 0
    ["00100", "01100", "00100", "00100", "00100", "00100", "01110"], // 1
    ["01110", "10001", "00001", "00010", "00100", "01000", "11111"], // 2
    ["11111", "00010", "00100", "00010", "00001", "10001", "01110"], // 3
    ["00010", "00110", "01010", "10010", "11111", "00010", "00010"], // 4
    ["11111", "10000", "11110", "00001", "00001", "10001", "01110"], // 5
    ["00110", "01000", "10000", "11110", "10001", "10001", "01110"], // 6
    ["11111", "00001", "00010", "00100", "01000", "01000", "01000"], // 7
    ["01110", "10001", "10001", "01110", "10001", "10001", "01110"], // 8
    ["01110", "10001", "10001", "01111", "00001", "00010", "01100"], // 9
];

fn draw_digit(img: &mut GrayImage, digit: usize, x0: u32, y0: u32) {
    for (row, line) in FONT[digit].iter().enumerate() {
        for (col, cell) in line.bytes().enumerate() {
            if cell != b'1' {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    img.put_pixel(
                        x0 + col as u32 * SCALE + dx,
                        y0 + row as u32 * SCALE + dy,
                        Luma([GLYPH_COLOR]),
                    );
                }
            }
        }
    }
}

/// Render `digits` as well-separated glyphs on an out-of-range background.
pub fn captcha_image(digits: &str) -> GrayImage {
    let n = digits.len() as u32;
    let width = 2 * MARGIN + n * CELL_W + n.saturating_sub(1) * GAP;
    let height = 2 * MARGIN + CELL_H;
    let mut img = GrayImage::from_pixel(width, height, Luma([BACKGROUND_COLOR]));

    for (i, c) in digits.chars().enumerate() {
        let digit = c.to_digit(10).expect("digits only") as usize;
        draw_digit(&mut img, digit, MARGIN + i as u32 * (CELL_W + GAP), MARGIN);
    }
    img
}

/// Scatter isolated in-range noise pixels plus one sub-threshold cluster
/// into the top margin, away from any glyph.
pub fn add_noise(img: &mut GrayImage, seed: u32) {
    let width = img.width();
    let mut x = 1 + seed % 5;
    while x + 1 < width {
        img.put_pixel(x, 2, Luma([NOISE_COLOR]));
        img.put_pixel(x, 5, Luma([NOISE_COLOR]));
        x += 7;
    }
    // A 2x2 cluster survives the rank filter but stays far below the
    // minimum feature size
    if width > 6 {
        img.put_pixel(width - 4, 1, Luma([NOISE_COLOR]));
        img.put_pixel(width - 3, 1, Luma([NOISE_COLOR]));
        img.put_pixel(width - 4, 2, Luma([NOISE_COLOR]));
        img.put_pixel(width - 3, 2, Luma([NOISE_COLOR]));
    }
}

/// Segment one rendered glyph the way a real decode would.
pub fn glyph_feature(digit: usize, config: &DecoderConfig) -> GrayImage {
    let img = captcha_image(&digit.to_string());
    let reduced = palette::apply(&img, config.channels, config.min_color, config.max_color);
    let filtered = rank::apply(&reduced, config.rank_size, config.rank_value);
    let mut features = segment::apply(&filtered, config.max_chars, config.min_feature_pixels);
    assert_eq!(features.len(), 1, "glyph {digit} should segment to one feature");
    features.remove(0).image
}

/// Write a complete digit iconset under `root`.
pub fn write_iconset(root: &Path) {
    let config = DecoderConfig::default();
    for digit in 0..10 {
        let dir = root.join(digit.to_string());
        fs::create_dir_all(&dir).unwrap();
        glyph_feature(digit, &config)
            .save(dir.join("0.png"))
            .unwrap();
    }
}
