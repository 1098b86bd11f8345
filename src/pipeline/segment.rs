use image::{imageops, GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

use super::{BACKGROUND, INK};

/// One segmented candidate character region.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Bounding-box crop of the region, ink on background
    pub image: GrayImage,
    /// Number of ink pixels in the region
    pub ink_pixels: u32,
    /// Leftmost column of the region in the source image
    pub left: u32,
    /// Topmost row of the region in the source image
    pub top: u32,
}

#[derive(Debug)]
struct Bounds {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    count: u32,
}

/// Split a binary mask into per-character regions.
///
/// Ink pixels are grouped into 4-connected components. Components with at
/// most `min_pixels` ink pixels are dropped, the `max_features` largest
/// survivors are kept, and the result is ordered left to right by each
/// region's leftmost column. Bounding boxes may overlap; regions are
/// partitioned by pixel connectivity, never by box geometry.
pub fn apply(image: &GrayImage, max_features: usize, min_pixels: u32) -> Vec<Feature> {
    // Treat anything that is not background as ink so upstream stages only
    // have to promise a binary-ish image
    let mask = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] == BACKGROUND {
            Luma([BACKGROUND])
        } else {
            Luma([INK])
        }
    });

    let labels = connected_components(&mask, Connectivity::Four, Luma([BACKGROUND]));

    let mut regions: BTreeMap<u32, Bounds> = BTreeMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0];
        if label == 0 {
            continue;
        }
        regions
            .entry(label)
            .and_modify(|b| {
                b.min_x = b.min_x.min(x);
                b.min_y = b.min_y.min(y);
                b.max_x = b.max_x.max(x);
                b.max_y = b.max_y.max(y);
                b.count += 1;
            })
            .or_insert(Bounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                count: 1,
            });
    }

    let mut features: Vec<Feature> = regions
        .into_values()
        .filter(|b| b.count > min_pixels)
        .map(|b| {
            let width = b.max_x - b.min_x + 1;
            let height = b.max_y - b.min_y + 1;
            Feature {
                image: imageops::crop_imm(&mask, b.min_x, b.min_y, width, height).to_image(),
                ink_pixels: b.count,
                left: b.min_x,
                top: b.min_y,
            }
        })
        .collect();

    // Keep the biggest regions, then restore left-to-right reading order
    features.sort_by(|a, b| b.ink_pixels.cmp(&a.ink_pixels));
    features.truncate(max_features);
    features.sort_by_key(|f| f.left);
    features
}
