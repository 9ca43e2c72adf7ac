use crate::color::{Color, ColorSpace};
use crate::error::Error;

/// Channel order of a byte buffer passed to [`Image::from_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Rgb,
    Rgba,
    Bgr,
    Bgra,
    Argb,
    Abgr,
}

impl ByteOrder {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr => 4,
        }
    }

    /// Byte offsets of the (r, g, b) channels within one pixel.
    fn rgb_offsets(self) -> (usize, usize, usize) {
        match self {
            Self::Rgb | Self::Rgba => (0, 1, 2),
            Self::Bgr | Self::Bgra => (2, 1, 0),
            Self::Argb => (1, 2, 3),
            Self::Abgr => (3, 2, 1),
        }
    }
}

/// Channel order of a packed 32-bit buffer passed to [`Image::from_packed`].
/// Names list channels from the most significant byte down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedOrder {
    Rgba,
    Bgra,
    Argb,
    Abgr,
}

impl PackedOrder {
    /// Right-shift amounts for the (r, g, b) channels.
    fn rgb_shifts(self) -> (u32, u32, u32) {
        match self {
            Self::Rgba => (24, 16, 8),
            Self::Bgra => (8, 16, 24),
            Self::Argb => (16, 8, 0),
            Self::Abgr => (0, 8, 16),
        }
    }
}

/// A dense row-major RGB or Lab image. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Image {
    width: usize,
    height: usize,
    space: ColorSpace,
    data: Vec<Color>,
}

impl Image {
    /// Creates an sRGB image from a slice of RGB pixels.
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless `pixels.len()` equals
    /// `width * height`.
    pub fn from_pixels(pixels: &[rgb::RGB<u8>], width: usize, height: usize) -> Result<Self, Error> {
        check_dims(width, height)?;
        if pixels.len() != width * height {
            return Err(Error::BufferSizeMismatch {
                len: pixels.len(),
                width,
                height,
                bytes_per_pixel: 1,
            });
        }

        let data = pixels
            .iter()
            .map(|p| Color::from_rgb8(p.r, p.g, p.b))
            .collect();

        Ok(Self {
            width,
            height,
            space: ColorSpace::Srgb,
            data,
        })
    }

    /// Creates an sRGB image from a raw byte buffer in the given channel order.
    /// Alpha channels are ignored.
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless `data.len()` equals
    /// `width * height * order.bytes_per_pixel()`.
    pub fn from_bytes(
        data: &[u8],
        width: usize,
        height: usize,
        order: ByteOrder,
    ) -> Result<Self, Error> {
        check_dims(width, height)?;
        let bpp = order.bytes_per_pixel();
        if data.len() != width * height * bpp {
            return Err(Error::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
                bytes_per_pixel: bpp,
            });
        }

        let (ro, go, bo) = order.rgb_offsets();
        let pixels = data
            .chunks_exact(bpp)
            .map(|px| Color::from_rgb8(px[ro], px[go], px[bo]))
            .collect();

        Ok(Self {
            width,
            height,
            space: ColorSpace::Srgb,
            data: pixels,
        })
    }

    /// Creates an sRGB image from a packed 32-bit buffer. Alpha is ignored.
    pub fn from_packed(
        data: &[u32],
        width: usize,
        height: usize,
        order: PackedOrder,
    ) -> Result<Self, Error> {
        check_dims(width, height)?;
        if data.len() != width * height {
            return Err(Error::BufferSizeMismatch {
                len: data.len() * 4,
                width,
                height,
                bytes_per_pixel: 4,
            });
        }

        let (rs, gs, bs) = order.rgb_shifts();
        let pixels = data
            .iter()
            .map(|&v| {
                Color::from_rgb8(
                    (v >> rs) as u8,
                    (v >> gs) as u8,
                    (v >> bs) as u8,
                )
            })
            .collect();

        Ok(Self {
            width,
            height,
            space: ColorSpace::Srgb,
            data: pixels,
        })
    }

    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        space: ColorSpace,
        data: Vec<Color>,
    ) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            space,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Color] {
        &self.data
    }

    /// Pixel at (x, y). Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y * self.width + x]
    }
}

/// An image whose pixels are palette indices. Conceptually paired with the
/// [`Palette`](crate::Palette) it was quantized against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl IndexedImage {
    /// Creates an indexed image from a row-major index buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, Error> {
        check_dims(width, height)?;
        if data.len() != width * height {
            return Err(Error::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
                bytes_per_pixel: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major palette indices.
    pub fn indices(&self) -> &[u8] {
        &self.data
    }

    /// Index at (x, y). Panics when out of bounds, like slice indexing.
    pub fn index(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y * self.width + x]
    }
}

fn check_dims(width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroDimension);
    }
    Ok(())
}
