//! Pixel-to-index mapping: threshold, ordered dither, Floyd–Steinberg.
//!
//! Threshold and ordered dithering are independent per pixel and run through
//! the data-parallel backend. Floyd–Steinberg propagates error row to row
//! and is strictly sequential.

use crate::accel;
use crate::color::Color;
use crate::error::Error;
use crate::image::{Image, IndexedImage};
use crate::palette::Palette;

/// Pixel-to-index mapping algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherMode {
    /// Nearest palette entry per pixel, no dithering.
    Threshold,
    /// Fixed 8×8 Bayer pattern perturbation before the nearest lookup.
    Ordered,
    /// Classic error diffusion, left-to-right, top-to-bottom.
    FloydSteinberg,
}

/// 8×8 Bayer threshold matrix. A constant of the ordered-dither algorithm,
/// not configurable.
const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Perturbation amplitude for ordered dithering, in channel units of the
/// active space. Chosen for the 16-color palettes this library targets.
const BAYER_SPREAD: f32 = 48.0;

/// Quantizes with the given mode.
pub fn quantize(image: &Image, palette: &Palette, mode: DitherMode) -> Result<IndexedImage, Error> {
    match mode {
        DitherMode::Threshold => threshold(image, palette),
        DitherMode::Ordered => ordered(image, palette),
        DitherMode::FloydSteinberg => floyd_steinberg(image, palette),
    }
}

/// Maps every pixel to its nearest palette entry (lowest index wins ties).
pub fn threshold(image: &Image, palette: &Palette) -> Result<IndexedImage, Error> {
    validate(image, palette)?;
    let indices = accel::nearest_indices(image.pixels(), palette);
    IndexedImage::new(indices, image.width(), image.height())
}

/// Ordered dithering: each pixel is offset by a position-dependent amount
/// from the Bayer matrix before the nearest lookup. Trades banding for a
/// fixed, repeatable dot pattern.
pub fn ordered(image: &Image, palette: &Palette) -> Result<IndexedImage, Error> {
    validate(image, palette)?;

    let width = image.width();
    let perturbed: Vec<Color> = image
        .pixels()
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let x = i % width;
            let y = i / width;
            let cell = BAYER8[y % 8][x % 8] as f32;
            let offset = (cell + 0.5) / 64.0 - 0.5;
            Color::new(
                p.0[0] + offset * BAYER_SPREAD,
                p.0[1] + offset * BAYER_SPREAD,
                p.0[2] + offset * BAYER_SPREAD,
            )
        })
        .collect();

    let indices = accel::nearest_indices(&perturbed, palette);
    IndexedImage::new(indices, width, image.height())
}

/// Floyd–Steinberg error diffusion with the classic kernel: 7/16 right,
/// 3/16 below-left, 5/16 below, 1/16 below-right. Rows are processed
/// left-to-right, top-to-bottom; there is no serpentine pass, so output is
/// byte-for-byte deterministic.
pub fn floyd_steinberg(image: &Image, palette: &Palette) -> Result<IndexedImage, Error> {
    validate(image, palette)?;

    let width = image.width();
    let height = image.height();

    // Mutable working copy; the input image stays untouched.
    let mut work: Vec<Color> = image.pixels().to_vec();
    let mut indices = vec![0u8; width * height];

    for y in 0..height {
        for x in 0..width {
            let pos = y * width + x;
            let current = work[pos];
            let chosen = palette.nearest(current);
            indices[pos] = chosen;

            let chosen_color = palette.color(chosen);
            let err = [
                current.0[0] - chosen_color.0[0],
                current.0[1] - chosen_color.0[1],
                current.0[2] - chosen_color.0[2],
            ];

            if x + 1 < width {
                spread(&mut work[pos + 1], err, 7.0 / 16.0);
            }
            if y + 1 < height {
                if x > 0 {
                    spread(&mut work[pos + width - 1], err, 3.0 / 16.0);
                }
                spread(&mut work[pos + width], err, 5.0 / 16.0);
                if x + 1 < width {
                    spread(&mut work[pos + width + 1], err, 1.0 / 16.0);
                }
            }
        }
    }

    IndexedImage::new(indices, width, height)
}

fn spread(target: &mut Color, err: [f32; 3], fraction: f32) {
    target.0[0] += err[0] * fraction;
    target.0[1] += err[1] * fraction;
    target.0[2] += err[2] * fraction;
}

fn validate(image: &Image, palette: &Palette) -> Result<(), Error> {
    if image.space() != palette.space() {
        return Err(Error::ColorSpaceMismatch {
            image: image.space(),
            palette: palette.space(),
        });
    }
    Ok(())
}
