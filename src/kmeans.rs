//! Deterministic k-means palette construction.
//!
//! Seeding is not randomized: initial centroids are evenly spaced samples of
//! the lexicographically sorted distinct color set, so identical inputs
//! always produce identical palettes. Iteration stops when the assignment is
//! stable or after [`MAX_ITERATIONS`] rounds.

use rayon::prelude::*;

use crate::color::Color;
use crate::error::Error;
use crate::image::Image;
use crate::palette::Palette;

/// Hard cap on k-means rounds; reached only on pathological inputs.
pub const MAX_ITERATIONS: usize = 100;

/// Builds a palette of exactly `count` colors by k-means clustering in the
/// image's color space.
pub fn reduce(image: &Image, count: usize) -> Result<Palette, Error> {
    if count == 0 || count > 256 {
        return Err(Error::InvalidColorCount(count));
    }

    let pixels = image.pixels();
    let mut centroids = seed_centroids(pixels, count);
    let mut assignment: Option<Vec<u8>> = None;

    for round in 0..MAX_ITERATIONS {
        let next: Vec<u8> = pixels
            .par_iter()
            .map(|&p| nearest_centroid(p, &centroids))
            .collect();

        let converged = assignment.as_deref() == Some(next.as_slice());
        update_centroids(&mut centroids, pixels, &next);

        if converged {
            log::debug!("k-means converged after {} rounds", round + 1);
            break;
        }
        assignment = Some(next);
    }

    Palette::new(centroids, image.space())
}

/// Evenly spaced samples of the sorted distinct color set.
fn seed_centroids(pixels: &[Color], count: usize) -> Vec<Color> {
    let mut distinct = pixels.to_vec();
    distinct.sort_unstable_by(|a, b| {
        a.0[0]
            .total_cmp(&b.0[0])
            .then(a.0[1].total_cmp(&b.0[1]))
            .then(a.0[2].total_cmp(&b.0[2]))
    });
    distinct.dedup();

    let n = distinct.len();
    (0..count)
        .map(|i| {
            let idx = if count == 1 {
                n / 2
            } else {
                i * (n - 1) / (count - 1)
            };
            distinct[idx]
        })
        .collect()
}

/// Nearest centroid by squared distance; lowest index wins ties.
fn nearest_centroid(pixel: Color, centroids: &[Color]) -> u8 {
    let mut best = 0usize;
    let mut best_dist = f32::MAX;
    for (i, &c) in centroids.iter().enumerate() {
        let d = pixel.distance_sq(c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best as u8
}

/// Recomputes centroids as assigned-pixel means. Empty clusters are reseeded
/// from the pixel farthest from its assigned centroid (lowest pixel position
/// wins ties) so the palette never collapses below `count` live entries.
fn update_centroids(centroids: &mut [Color], pixels: &[Color], assignment: &[u8]) {
    let k = centroids.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0u64; k];

    for (&p, &a) in pixels.iter().zip(assignment) {
        let a = a as usize;
        counts[a] += 1;
        for ch in 0..3 {
            sums[a][ch] += p.0[ch] as f64;
        }
    }

    for i in 0..k {
        if counts[i] > 0 {
            let n = counts[i] as f64;
            centroids[i] = Color::new(
                (sums[i][0] / n) as f32,
                (sums[i][1] / n) as f32,
                (sums[i][2] / n) as f32,
            );
        }
    }

    // Reseed empties, one farthest point each, never the same point twice
    // within a round.
    let mut taken: Vec<usize> = Vec::new();
    for i in 0..k {
        if counts[i] > 0 {
            continue;
        }
        let far = farthest_pixel(pixels, assignment, centroids, &taken);
        centroids[i] = pixels[far];
        taken.push(far);
    }
}

fn farthest_pixel(
    pixels: &[Color],
    assignment: &[u8],
    centroids: &[Color],
    taken: &[usize],
) -> usize {
    let mut best = 0usize;
    let mut best_dist = f32::MIN;
    for (pos, (&p, &a)) in pixels.iter().zip(assignment).enumerate() {
        if taken.contains(&pos) {
            continue;
        }
        let d = p.distance_sq(centroids[a as usize]);
        if d > best_dist {
            best_dist = d;
            best = pos;
        }
    }
    best
}
