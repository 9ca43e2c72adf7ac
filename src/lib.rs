//! Palette quantization and frame encoding for character-cell terminal
//! displays.
//!
//! The pipeline: an [`Image`] (sRGB, or converted to CIELAB via [`lab`]) is
//! reduced to a [`Palette`] by one of three builders (median cut, k-means,
//! octree), mapped to an [`IndexedImage`] by one of three quantizers
//! (threshold, ordered dither, Floyd–Steinberg), and serialized by the
//! [`codec`] into one of three frame formats (raw, cmp, ans) for playback.
//!
//! ```
//! use termquant::{convert, ConvertOptions, Image};
//!
//! let pixels: Vec<rgb::RGB<u8>> = (0..64)
//!     .map(|i| rgb::RGB { r: (i * 4) as u8, g: 0, b: 255 - (i * 4) as u8 })
//!     .collect();
//! let image = Image::from_pixels(&pixels, 8, 8).unwrap();
//!
//! let (palette, indexed) = convert(&image, &ConvertOptions::default()).unwrap();
//! let (frame, _state) = termquant::codec::encode(
//!     &indexed,
//!     &palette,
//!     termquant::codec::Format::Cmp,
//!     None,
//! ).unwrap();
//! assert!(!frame.is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod accel;
pub mod codec;
pub mod color;
pub mod dither;
pub mod error;
pub mod image;
pub mod kmeans;
pub mod lab;
pub mod median_cut;
pub mod octree;
pub mod palette;

pub use accel::{init_accelerator, DeviceSelector};
pub use color::{Color, ColorSpace};
pub use dither::DitherMode;
pub use error::Error;
pub use image::{ByteOrder, Image, IndexedImage, PackedOrder};
pub use palette::{build_palette, Palette, PaletteAlgorithm};

/// Options for the [`convert`] pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Number of palette colors. Median cut requires a power of two.
    pub colors: usize,
    /// Palette construction algorithm.
    pub palette: PaletteAlgorithm,
    /// Pixel-to-index mapping algorithm.
    pub dither: DitherMode,
    /// Build the palette and dither in CIELAB instead of sRGB. Perceptually
    /// better clustering at the cost of the conversion pass; the returned
    /// palette is converted back to sRGB either way.
    pub perceptual: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            colors: 16,
            palette: PaletteAlgorithm::MedianCut,
            dither: DitherMode::FloydSteinberg,
            perceptual: false,
        }
    }
}

/// Runs the full quantization pipeline on one image.
///
/// Returns the palette (always in sRGB, ready for the codec) and the
/// indexed image quantized against it.
pub fn convert(image: &Image, options: &ConvertOptions) -> Result<(Palette, IndexedImage), Error> {
    let work;
    let source = if options.perceptual && image.space() == ColorSpace::Srgb {
        work = lab::image_to_lab(image)?;
        &work
    } else {
        image
    };

    let palette = build_palette(source, options.colors, options.palette)?;
    let indexed = dither::quantize(source, &palette, options.dither)?;

    let palette = if palette.space() == ColorSpace::Lab {
        lab::palette_to_srgb(&palette)?
    } else {
        palette
    };

    Ok((palette, indexed))
}
