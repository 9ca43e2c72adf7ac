//! Median-cut palette construction.
//!
//! The image's pixels start in one bounding box. Each round the box with the
//! widest channel span is split at the pixel-count median of that channel,
//! until `count` boxes exist; each box's mean color becomes a palette entry.
//! Ties on span resolve in box creation order, so identical inputs always
//! produce identical palettes.

use crate::color::Color;
use crate::error::Error;
use crate::image::Image;
use crate::palette::Palette;

/// Builds a palette of exactly `count` colors by recursive median cut.
///
/// `count` must be a power of two between 1 and 256; other values return
/// [`Error::NonPowerOfTwoCount`] / [`Error::InvalidColorCount`].
pub fn reduce(image: &Image, count: usize) -> Result<Palette, Error> {
    if count == 0 || count > 256 {
        return Err(Error::InvalidColorCount(count));
    }
    if !count.is_power_of_two() {
        return Err(Error::NonPowerOfTwoCount(count));
    }

    let mut boxes: Vec<Vec<Color>> = vec![image.pixels().to_vec()];

    while boxes.len() < count {
        let Some((box_idx, channel)) = widest_box(&boxes) else {
            break; // nothing left to split
        };

        let mut entries = boxes.remove(box_idx);
        entries.sort_unstable_by(|a, b| {
            a.0[channel]
                .partial_cmp(&b.0[channel])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        // Median split: the two children differ by at most one pixel.
        let split = entries.len() / 2;
        let high = entries.split_off(split);
        boxes.push(entries);
        boxes.push(high);
    }

    let mut means: Vec<Color> = boxes.iter().map(|b| mean_color(b)).collect();

    // Degenerate input: fewer distinct colors than requested. The contract is
    // exactly `count` entries, duplicates allowed.
    let mut i = 0;
    while means.len() < count {
        means.push(means[i]);
        i += 1;
    }

    Palette::new(means, image.space())
}

/// The splittable box with the largest channel span, and that channel.
/// First-created box wins ties; lower channel index wins within a box.
fn widest_box(boxes: &[Vec<Color>]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut best_span = 0.0f32;

    for (i, entries) in boxes.iter().enumerate() {
        if entries.len() < 2 {
            continue;
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for c in entries {
            for ch in 0..3 {
                min[ch] = min[ch].min(c.0[ch]);
                max[ch] = max[ch].max(c.0[ch]);
            }
        }

        for ch in 0..3 {
            let span = max[ch] - min[ch];
            if span > best_span {
                best_span = span;
                best = Some((i, ch));
            }
        }
    }

    // A box of identical pixels has zero span in every channel; splitting it
    // would only manufacture duplicates, which padding already handles.
    if best_span > 0.0 { best } else { None }
}

fn mean_color(entries: &[Color]) -> Color {
    let mut sum = [0.0f64; 3];
    for c in entries {
        for ch in 0..3 {
            sum[ch] += c.0[ch] as f64;
        }
    }
    let n = entries.len() as f64;
    Color::new(
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of(colors: &[[u8; 3]]) -> Image {
        let pixels: Vec<rgb::RGB<u8>> = colors
            .iter()
            .map(|c| rgb::RGB {
                r: c[0],
                g: c[1],
                b: c[2],
            })
            .collect();
        Image::from_pixels(&pixels, colors.len(), 1).unwrap()
    }

    #[test]
    fn non_power_of_two_rejected() {
        let img = image_of(&[[0, 0, 0], [255, 255, 255]]);
        assert_eq!(reduce(&img, 6).unwrap_err(), Error::NonPowerOfTwoCount(6));
        assert_eq!(reduce(&img, 0).unwrap_err(), Error::InvalidColorCount(0));
    }

    #[test]
    fn single_color_request_returns_average() {
        let img = image_of(&[[0, 0, 0], [100, 100, 100]]);
        let pal = reduce(&img, 1).unwrap();
        assert_eq!(pal.len(), 1);
        let mean = pal.color(0);
        assert!((mean.0[0] - 50.0).abs() < 1e-3);
    }

    #[test]
    fn four_distinct_colors_get_own_entries() {
        let img = image_of(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]]);
        let pal = reduce(&img, 4).unwrap();
        assert_eq!(pal.len(), 4);

        // Every source color must be represented exactly.
        for c in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]] {
            let idx = pal.nearest(Color::from_rgb8(c[0], c[1], c[2]));
            assert_eq!(pal.color(idx).to_rgb8(), c);
        }
    }

    #[test]
    fn pads_when_fewer_distinct_colors_than_requested() {
        let img = image_of(&[[7, 7, 7], [7, 7, 7]]);
        let pal = reduce(&img, 8).unwrap();
        assert_eq!(pal.len(), 8);
        for i in 0..8 {
            assert_eq!(pal.color(i).to_rgb8(), [7, 7, 7]);
        }
    }

    #[test]
    fn deterministic_for_identical_input() {
        let colors: Vec<[u8; 3]> = (0..64)
            .map(|i| [(i * 4) as u8, (255 - i * 3) as u8, (i * 7 % 256) as u8])
            .collect();
        let img = image_of(&colors);
        let a = reduce(&img, 16).unwrap();
        let b = reduce(&img, 16).unwrap();
        assert_eq!(a.entries(), b.entries());
    }
}
