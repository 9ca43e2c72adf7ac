//! Octree palette construction.
//!
//! Pixels are bucketed to depth 8 over the color cube — one level per bit of
//! each channel, interleaved — with counts and color sums accumulated per
//! leaf. The two lowest-weight leaves are then merged repeatedly until
//! exactly `count` leaves remain, and each leaf's mean color becomes a
//! palette entry. Faster than median cut or k-means, at some palette
//! quality cost.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::color::{Color, ColorSpace};
use crate::error::Error;
use crate::image::Image;
use crate::palette::Palette;

#[derive(Clone)]
struct Leaf {
    weight: u64,
    sum: [f64; 3],
}

impl Leaf {
    fn mean(&self) -> Color {
        let n = self.weight as f64;
        Color::new(
            (self.sum[0] / n) as f32,
            (self.sum[1] / n) as f32,
            (self.sum[2] / n) as f32,
        )
    }
}

/// Builds a palette of exactly `count` colors via octree bucketing and
/// lowest-weight leaf merging.
pub fn reduce(image: &Image, count: usize) -> Result<Palette, Error> {
    if count == 0 || count > 256 {
        return Err(Error::InvalidColorCount(count));
    }

    // Bucket pixels by interleaved-bit key, accumulating true color sums.
    let mut buckets: HashMap<u32, Leaf> = HashMap::new();
    for &p in image.pixels() {
        let leaf = buckets.entry(branch_key(p, image.space())).or_insert(Leaf {
            weight: 0,
            sum: [0.0; 3],
        });
        leaf.weight += 1;
        for ch in 0..3 {
            leaf.sum[ch] += p.0[ch] as f64;
        }
    }

    // Hash iteration order is unspecified; key order makes merging
    // deterministic.
    let mut keyed: Vec<(u32, Leaf)> = buckets.into_iter().collect();
    keyed.sort_unstable_by_key(|(key, _)| *key);

    let mut means = merge_leaves(keyed.into_iter().map(|(_, leaf)| leaf).collect(), count);

    // Fewer distinct buckets than requested: duplicate entries, never error.
    let mut i = 0;
    while means.len() < count {
        means.push(means[i]);
        i += 1;
    }

    Palette::new(means, image.space())
}

/// Merges the two lowest-weight leaves until `count` remain. Ties resolve in
/// creation order (original leaves in key order, merged leaves after).
fn merge_leaves(leaves: Vec<Leaf>, count: usize) -> Vec<Color> {
    let mut slots: Vec<Option<Leaf>> = leaves.into_iter().map(Some).collect();
    let mut live = slots.len();

    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = slots
        .iter()
        .enumerate()
        .map(|(i, slot)| Reverse((slot.as_ref().map(|l| l.weight).unwrap_or(0), i)))
        .collect();

    while live > count {
        let a = pop_live(&mut heap, &slots);
        let b = pop_live(&mut heap, &slots);

        let la = slots[a].take().expect("popped leaf is live");
        let lb = slots[b].take().expect("popped leaf is live");
        let merged = Leaf {
            weight: la.weight + lb.weight,
            sum: [
                la.sum[0] + lb.sum[0],
                la.sum[1] + lb.sum[1],
                la.sum[2] + lb.sum[2],
            ],
        };

        let slot = slots.len();
        heap.push(Reverse((merged.weight, slot)));
        slots.push(Some(merged));
        live -= 1;
    }

    slots.into_iter().flatten().map(|l| l.mean()).collect()
}

/// Pops heap entries until one refers to a still-live slot.
fn pop_live(heap: &mut BinaryHeap<Reverse<(u64, usize)>>, slots: &[Option<Leaf>]) -> usize {
    loop {
        let Reverse((_, idx)) = heap.pop().expect("heap holds all live leaves");
        if slots[idx].is_some() {
            return idx;
        }
    }
}

/// Depth-8 octree path: one level per bit, channels interleaved within each
/// level. Lab channels are rescaled onto the 8-bit cube for bucketing only;
/// the accumulated sums keep their real values.
fn branch_key(color: Color, space: ColorSpace) -> u32 {
    let c = match space {
        ColorSpace::Srgb => [
            color.0[0].round().clamp(0.0, 255.0) as u32,
            color.0[1].round().clamp(0.0, 255.0) as u32,
            color.0[2].round().clamp(0.0, 255.0) as u32,
        ],
        ColorSpace::Lab => [
            (color.0[0] * 2.55).round().clamp(0.0, 255.0) as u32,
            (color.0[1] + 128.0).round().clamp(0.0, 255.0) as u32,
            (color.0[2] + 128.0).round().clamp(0.0, 255.0) as u32,
        ],
    };

    let mut key = 0u32;
    for bit in (0..8).rev() {
        key = (key << 3)
            | (((c[0] >> bit) & 1) << 2)
            | (((c[1] >> bit) & 1) << 1)
            | ((c[2] >> bit) & 1);
    }
    key
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
    fn exact_count_returned() {
        let colors: Vec<[u8; 3]> = (0..200)
            .map(|i| [(i % 256) as u8, (i * 5 % 256) as u8, (i * 11 % 256) as u8])
            .collect();
        let img = image_of(&colors);
        for count in [1, 2, 16, 100] {
            let pal = reduce(&img, count).unwrap();
            assert_eq!(pal.len(), count);
        }
    }

    #[test]
    fn single_color_request_returns_average() {
        let img = image_of(&[[0, 0, 0], [200, 100, 50]]);
        let pal = reduce(&img, 1).unwrap();
        assert_eq!(pal.color(0).to_rgb8(), [100, 50, 25]);
    }

    #[test]
    fn low_weight_leaves_merge_first() {
        // 30 dark pixels, 30 bright pixels, one stray mid-gray. With two
        // entries the stray must fold into a neighbor instead of keeping a
        // slot for itself.
        let mut colors = vec![[10u8, 10, 10]; 30];
        colors.extend_from_slice(&[[240u8, 240, 240]; 30]);
        colors.push([128, 128, 128]);
        let img = image_of(&colors);
        let pal = reduce(&img, 2).unwrap();

        let weights_ok = (0..2).all(|i| {
            let c = pal.color(i).to_rgb8();
            c[0] < 32 || c[0] > 120
        });
        assert!(weights_ok, "stray pixel kept its own entry: {pal:?}");
    }

    #[test]
    fn deterministic_for_identical_input() {
        let colors: Vec<[u8; 3]> = (0..300)
            .map(|i| [(i * 3 % 256) as u8, (i * 7 % 256) as u8, (i % 256) as u8])
            .collect();
        let img = image_of(&colors);
        let a = reduce(&img, 24).unwrap();
        let b = reduce(&img, 24).unwrap();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn branch_key_interleaves_bits() {
        // Pure red: every level gets the r-bit slot.
        let key = branch_key(Color::new(255.0, 0.0, 0.0), ColorSpace::Srgb);
        assert_eq!(key, 0b100_100_100_100_100_100_100_100);
        let key = branch_key(Color::new(0.0, 0.0, 255.0), ColorSpace::Srgb);
        assert_eq!(key, 0b001_001_001_001_001_001_001_001);
    }
}
