//! Reference icon storage.
//!
//! An iconset is a directory tree where each immediate subdirectory is
//! named for a symbol and contains one or more sample images of that
//! symbol, typically rotated variants produced by `generate-iconset`.

use image::{imageops, GrayImage, Luma};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CaptchaError;
use crate::pipeline::BACKGROUND;

/// One labeled reference sample.
#[derive(Debug, Clone)]
pub struct Icon {
    pub symbol: String,
    pub image: GrayImage,
}

/// The full reference set, loaded once and shared read-only.
///
/// Wrap in an `Arc` to share across threads; the set is immutable after
/// construction so no further synchronization is needed.
#[derive(Debug, Clone)]
pub struct IconSet {
    icons: Vec<Icon>,
}

impl IconSet {
    /// Build a set from already-loaded icons.
    pub fn from_icons(icons: Vec<Icon>) -> Self {
        Self { icons }
    }

    /// Load every readable sample under `root`.
    ///
    /// Subdirectories and files are visited in name order so icon order,
    /// and with it equal-score guess order, is stable across platforms.
    /// Files that cannot be decoded are skipped with a warning; a set
    /// with zero icons is an error.
    pub fn load(root: &Path) -> Result<Self, CaptchaError> {
        tracing::info!("Loading iconset from {}", root.display());

        let symbol_dirs: Vec<PathBuf> = read_dir_sorted(root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        let mut icons = Vec::new();
        for dir in symbol_dirs {
            let symbol = match dir.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            for file in read_dir_sorted(&dir)? {
                match image::open(&file) {
                    Ok(img) => icons.push(Icon {
                        symbol: symbol.clone(),
                        image: img.to_luma8(),
                    }),
                    Err(err) => {
                        tracing::warn!("Skipping icon {}: {}", file.display(), err);
                    }
                }
            }
        }

        if icons.is_empty() {
            return Err(CaptchaError::EmptyIconset { path: root.into() });
        }

        let mut symbols: Vec<&str> = icons.iter().map(|i| i.symbol.as_str()).collect();
        symbols.dedup();
        tracing::info!("Loaded {} icons for {} symbols", icons.len(), symbols.len());

        Ok(Self { icons })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Icon> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, CaptchaError> {
    let err = |source| CaptchaError::IconsetDir {
        path: dir.into(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(err)? {
        paths.push(entry.map_err(err)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Rotate a glyph image by `degrees` about its center, expanding the
/// canvas so nothing is clipped, then crop back to the content bounding
/// box.
///
/// Used to synthesize rotated template variants from one upright sample.
pub fn rotate(image: &GrayImage, degrees: f32) -> GrayImage {
    let (width, height) = image.dimensions();

    // Expanded square canvas large enough for any rotation angle
    let diagonal = ((width * width + height * height) as f32).sqrt().ceil() as u32;
    let mut canvas = GrayImage::from_pixel(diagonal, diagonal, Luma([BACKGROUND]));
    imageops::replace(
        &mut canvas,
        image,
        ((diagonal - width) / 2) as i64,
        ((diagonal - height) / 2) as i64,
    );

    let rotated = rotate_about_center(
        &canvas,
        degrees.to_radians(),
        Interpolation::Bilinear,
        Luma([BACKGROUND]),
    );

    crop_to_content(&rotated).unwrap_or_else(|| image.clone())
}

/// Crop to the bounding box of non-background pixels, or `None` if the
/// image is entirely background.
fn crop_to_content(image: &GrayImage) -> Option<GrayImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] != BACKGROUND {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds.map(|(x0, y0, x1, y1)| {
        imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
    })
}
