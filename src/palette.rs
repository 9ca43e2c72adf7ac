use crate::color::{Color, ColorSpace};
use crate::error::Error;
use crate::image::Image;
use crate::{kmeans, median_cut, octree};

/// An ordered, fixed-size list of representative colors.
///
/// Order matters: index `i` in an [`IndexedImage`](crate::IndexedImage)
/// refers to entry `i`. Length is 1..=256 so every entry is addressable by a
/// one-byte index.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<Color>,
    space: ColorSpace,
}

impl Palette {
    /// Builds a palette from explicit entries.
    ///
    /// Returns [`Error::EmptyPalette`] for zero entries and
    /// [`Error::InvalidColorCount`] for more than 256.
    pub fn new(entries: Vec<Color>, space: ColorSpace) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::EmptyPalette);
        }
        if entries.len() > 256 {
            return Err(Error::InvalidColorCount(entries.len()));
        }
        Ok(Self { entries, space })
    }

    pub fn entries(&self) -> &[Color] {
        &self.entries
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn color(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    /// Nearest entry by squared Euclidean distance in the palette's space.
    /// Ties resolve to the lowest index.
    pub fn nearest(&self, color: Color) -> u8 {
        let mut best = 0usize;
        let mut best_dist = f32::MAX;
        for (i, &entry) in self.entries.iter().enumerate() {
            let d = color.distance_sq(entry);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best as u8
    }
}

/// Palette construction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAlgorithm {
    /// Recursive bounding-box subdivision. Requires a power-of-two count.
    MedianCut,
    /// Deterministically seeded k-means clustering.
    KMeans,
    /// Depth-8 color-cube bucketing with lowest-weight leaf merging.
    Octree,
}

/// Builds a palette of exactly `count` colors in the image's color space.
pub fn build_palette(
    image: &Image,
    count: usize,
    algorithm: PaletteAlgorithm,
) -> Result<Palette, Error> {
    match algorithm {
        PaletteAlgorithm::MedianCut => median_cut::reduce(image, count),
        PaletteAlgorithm::KMeans => kmeans::reduce(image, count),
        PaletteAlgorithm::Octree => octree::reduce(image, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized() {
        assert_eq!(
            Palette::new(Vec::new(), ColorSpace::Srgb).unwrap_err(),
            Error::EmptyPalette
        );
        let too_many = vec![Color::default(); 257];
        assert_eq!(
            Palette::new(too_many, ColorSpace::Srgb).unwrap_err(),
            Error::InvalidColorCount(257)
        );
    }

    #[test]
    fn nearest_breaks_ties_toward_lowest_index() {
        let pal = Palette::new(
            vec![
                Color::new(10.0, 0.0, 0.0),
                Color::new(30.0, 0.0, 0.0),
                Color::new(30.0, 0.0, 0.0),
            ],
            ColorSpace::Srgb,
        )
        .unwrap();
        // Equidistant between entries 0 and 1; entry 2 duplicates entry 1.
        assert_eq!(pal.nearest(Color::new(20.0, 0.0, 0.0)), 0);
        assert_eq!(pal.nearest(Color::new(29.0, 0.0, 0.0)), 1);
    }

    #[test]
    fn nearest_finds_closest() {
        let pal = Palette::new(
            vec![
                Color::new(0.0, 0.0, 0.0),
                Color::new(128.0, 128.0, 128.0),
                Color::new(255.0, 255.0, 255.0),
            ],
            ColorSpace::Srgb,
        )
        .unwrap();
        assert_eq!(pal.nearest(Color::new(5.0, 10.0, 0.0)), 0);
        assert_eq!(pal.nearest(Color::new(250.0, 250.0, 250.0)), 2);
    }
}
