use image::{GrayImage, Luma};

/// Apply a rank-order filter to suppress isolated noise pixels.
///
/// Each output pixel is the `rank`-th smallest value (zero-based) within
/// its `size` x `size` neighborhood. Border pixels replicate the nearest
/// edge value. A `size` of 0 disables filtering and returns a copy.
pub fn apply(image: &GrayImage, size: u32, rank: u32) -> GrayImage {
    if size == 0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let half = (size / 2) as i64;
    let mut window = Vec::with_capacity((size * size) as usize);

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            window.clear();
            for dy in -half..=half {
                for dx in -half..=half {
                    let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                    let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                    window.push(image.get_pixel(sx, sy).0[0]);
                }
            }
            window.sort_unstable();
            let index = (rank as usize).min(window.len() - 1);
            out.put_pixel(x, y, Luma([window[index]]));
        }
    }
    out
}
