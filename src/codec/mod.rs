//! Video frame codec for sequences of indexed images.
//!
//! Three mutually exclusive frame formats share one header layout:
//!
//! ```text
//! [u16 width] [u16 height] [u8 palette length] [palette length x (r, g, b)]
//! ```
//!
//! All scalars are little-endian; a palette-length byte of 0 means 256.
//! After the header:
//!
//! - [`Format::Raw`] — one index byte per pixel, row-major.
//! - [`Format::Cmp`] — literal-run / previous-frame-copy chunks.
//! - [`Format::Ans`] — a frequency table (palette length × u16) and an
//!   entropy-coded payload with a u32 byte-length prefix.
//!
//! Inter-frame state is an explicit [`FrameState`] session object held by
//! the caller, one per stream, so independent streams never interfere.
//! Encoding without the prior state produces a self-contained keyframe.
//! Decoding is lossless at the index level: the exact indices and palette
//! come back for every format.

mod ans;
mod bitio;
mod cmp;
mod raw;

use crate::color::{Color, ColorSpace};
use crate::error::Error;
use crate::image::IndexedImage;
use crate::palette::Palette;
use bitio::{write_u16, Reader};

/// Frame encoding format. A stream must not mix formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Uncompressed baseline.
    Raw,
    /// Run-length / previous-frame-delta compression.
    Cmp,
    /// Adaptive entropy coding (range-ANS).
    Ans,
}

/// Previous-frame state for one encode or decode session.
///
/// Callers thread this through a stream: the state returned by one frame is
/// passed into the next. Dropping it (or passing `None`) forces the next
/// frame to be encoded as a keyframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameState {
    width: usize,
    height: usize,
    indices: Vec<u8>,
}

impl FrameState {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Encodes one frame, returning the bytes and the state for the next frame.
///
/// The palette must be in sRGB space (entries are serialized as 8-bit RGB
/// triples) and every pixel index must be inside it. For [`Format::Cmp`] a
/// prior state enables previous-frame-copy chunks; without one the frame is
/// a keyframe.
pub fn encode(
    image: &IndexedImage,
    palette: &Palette,
    format: Format,
    prior: Option<&FrameState>,
) -> Result<(Vec<u8>, FrameState), Error> {
    validate_frame(image, palette)?;
    if let Some(state) = prior {
        check_state(image.width(), image.height(), state)?;
    }

    let mut out = Vec::with_capacity(image.indices().len() / 2 + 64);
    write_header(&mut out, image, palette);

    match format {
        Format::Raw => raw::encode_body(&mut out, image.indices()),
        Format::Cmp => cmp::encode_body(
            &mut out,
            image.indices(),
            image.width(),
            prior.map(|s| s.indices.as_slice()),
        ),
        Format::Ans => ans::encode_body(&mut out, image.indices(), palette.len()),
    }

    let state = FrameState {
        width: image.width(),
        height: image.height(),
        indices: image.indices().to_vec(),
    };
    Ok((out, state))
}

/// Decodes one frame, returning the indexed image, its palette, and the
/// state for the next frame.
///
/// `prior` must be the state produced by decoding the stream's previous
/// frame; a state from a different stream fails with
/// [`Error::StateMismatch`], and [`Format::Cmp`] copy chunks without any
/// state fail with [`Error::MissingState`].
pub fn decode(
    data: &[u8],
    format: Format,
    prior: Option<&FrameState>,
) -> Result<(IndexedImage, Palette, FrameState), Error> {
    let mut reader = Reader::new(data);
    let (width, height, palette) = read_header(&mut reader)?;
    if let Some(state) = prior {
        check_state(width, height, state)?;
    }

    let pixel_count = width * height;
    let indices = match format {
        Format::Raw => raw::decode_body(&mut reader, pixel_count)?,
        Format::Cmp => cmp::decode_body(
            &mut reader,
            pixel_count,
            prior.map(|s| s.indices.as_slice()),
        )?,
        Format::Ans => ans::decode_body(&mut reader, pixel_count, palette.len())?,
    };

    if let Some(&bad) = indices.iter().find(|&&i| (i as usize) >= palette.len()) {
        return Err(Error::IndexOutOfRange {
            index: bad,
            palette_len: palette.len(),
        });
    }

    let image = IndexedImage::new(indices, width, height)?;
    let state = FrameState {
        width,
        height,
        indices: image.indices().to_vec(),
    };
    Ok((image, palette, state))
}

fn validate_frame(image: &IndexedImage, palette: &Palette) -> Result<(), Error> {
    if palette.space() != ColorSpace::Srgb {
        return Err(Error::WrongColorSpace {
            expected: ColorSpace::Srgb,
            found: palette.space(),
        });
    }
    if image.width() > u16::MAX as usize || image.height() > u16::MAX as usize {
        return Err(Error::FrameTooLarge {
            width: image.width(),
            height: image.height(),
        });
    }
    if let Some(&bad) = image
        .indices()
        .iter()
        .find(|&&i| (i as usize) >= palette.len())
    {
        return Err(Error::IndexOutOfRange {
            index: bad,
            palette_len: palette.len(),
        });
    }
    Ok(())
}

fn check_state(width: usize, height: usize, state: &FrameState) -> Result<(), Error> {
    if state.width != width || state.height != height {
        return Err(Error::StateMismatch {
            width,
            height,
            state_width: state.width,
            state_height: state.height,
        });
    }
    Ok(())
}

fn write_header(out: &mut Vec<u8>, image: &IndexedImage, palette: &Palette) {
    write_u16(out, image.width() as u16);
    write_u16(out, image.height() as u16);
    out.push((palette.len() & 0xff) as u8); // 256 wraps to 0
    for &entry in palette.entries() {
        out.extend_from_slice(&entry.to_rgb8());
    }
}

fn read_header(reader: &mut Reader<'_>) -> Result<(usize, usize, Palette), Error> {
    let width = reader.read_u16()? as usize;
    let height = reader.read_u16()? as usize;
    if width == 0 || height == 0 {
        return Err(Error::ZeroDimension);
    }

    let palette_len = match reader.read_u8()? {
        0 => 256usize,
        n => n as usize,
    };
    let mut entries = Vec::with_capacity(palette_len);
    for _ in 0..palette_len {
        let rgb = reader.read_bytes(3)?;
        entries.push(Color::from_rgb8(rgb[0], rgb[1], rgb[2]));
    }
    let palette = Palette::new(entries, ColorSpace::Srgb)?;

    Ok((width, height, palette))
}
