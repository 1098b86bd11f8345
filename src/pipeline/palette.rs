use image::{GrayImage, Luma};

use super::{BACKGROUND, INK};

/// Find the `channels` most frequent intensities strictly inside
/// `(min_color, max_color)`, most frequent first.
///
/// Equal-frequency colors keep ascending intensity order so the palette is
/// deterministic across runs.
pub fn dominant_colors(
    image: &GrayImage,
    channels: usize,
    min_color: u8,
    max_color: u8,
) -> Vec<u8> {
    let mut counts = [0u32; 256];
    for pixel in image.pixels() {
        counts[pixel.0[0] as usize] += 1;
    }

    let mut colors: Vec<(u8, u32)> = (0..=255u8)
        .map(|value| (value, counts[value as usize]))
        .filter(|&(value, count)| count > 0 && value > min_color && value < max_color)
        .collect();

    colors.sort_by(|a, b| b.1.cmp(&a.1));
    colors.truncate(channels);
    colors.into_iter().map(|(value, _)| value).collect()
}

/// Reduce `image` to a binary mask keeping only its dominant in-range
/// colors as ink.
///
/// Pixels whose intensity is a palette member become `INK`; everything else
/// becomes `BACKGROUND`. If no intensity qualifies the output is a uniform
/// background image and segmentation will find nothing.
pub fn apply(image: &GrayImage, channels: usize, min_color: u8, max_color: u8) -> GrayImage {
    let palette = dominant_colors(image, channels, min_color, max_color);

    let mut member = [false; 256];
    for value in &palette {
        member[*value as usize] = true;
    }

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if member[image.get_pixel(x, y).0[0] as usize] {
            Luma([INK])
        } else {
            Luma([BACKGROUND])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_never_exceeds_channels() {
        let img = GrayImage::from_fn(16, 16, |x, y| Luma([(20 + (x + y * 16) % 60) as u8]));
        let palette = dominant_colors(&img, 5, 10, 100);
        assert!(palette.len() <= 5);
    }

    #[test]
    fn test_palette_respects_color_range() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([50]));
        img.put_pixel(0, 0, Luma([5])); // below min
        img.put_pixel(1, 0, Luma([200])); // above max
        img.put_pixel(2, 0, Luma([10])); // exactly min, excluded
        img.put_pixel(3, 0, Luma([100])); // exactly max, excluded

        let palette = dominant_colors(&img, 50, 10, 100);
        assert_eq!(palette, vec![50]);
    }

    #[test]
    fn test_palette_orders_by_frequency() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([200]));
        for x in 0..6 {
            img.put_pixel(x, 0, Luma([30]));
        }
        for x in 0..3 {
            img.put_pixel(x, 1, Luma([60]));
        }

        let palette = dominant_colors(&img, 50, 10, 100);
        assert_eq!(palette, vec![30, 60]);
    }

    #[test]
    fn test_palette_ties_keep_ascending_intensity() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([200]));
        img.put_pixel(0, 0, Luma([80]));
        img.put_pixel(1, 0, Luma([20]));

        let palette = dominant_colors(&img, 50, 10, 100);
        assert_eq!(palette, vec![20, 80]);
    }

    #[test]
    fn test_apply_masks_palette_members() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([200]));
        img.put_pixel(3, 3, Luma([50]));
        img.put_pixel(4, 3, Luma([50]));

        let mask = apply(&img, 50, 10, 100);
        assert_eq!(mask.get_pixel(3, 3).0[0], INK);
        assert_eq!(mask.get_pixel(4, 3).0[0], INK);
        assert_eq!(mask.get_pixel(0, 0).0[0], BACKGROUND);
    }

    #[test]
    fn test_apply_no_qualifying_colors_yields_blank_mask() {
        let img = GrayImage::from_pixel(10, 10, Luma([200]));
        let mask = apply(&img, 50, 10, 100);
        assert!(mask.pixels().all(|p| p.0[0] == BACKGROUND));
    }

    #[test]
    fn test_apply_preserves_dimensions() {
        let img = GrayImage::new(31, 17);
        let mask = apply(&img, 50, 10, 100);
        assert_eq!(mask.dimensions(), (31, 17));
    }
}
