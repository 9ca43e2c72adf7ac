use thiserror::Error;

use crate::color::ColorSpace;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("buffer length {len} does not match {width}x{height} at {bytes_per_pixel} bytes per pixel")]
    BufferSizeMismatch {
        len: usize,
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
    },

    #[error("expected a {expected:?} input, got {found:?}")]
    WrongColorSpace {
        expected: ColorSpace,
        found: ColorSpace,
    },

    #[error("image is in {image:?} space but palette is in {palette:?} space")]
    ColorSpaceMismatch {
        image: ColorSpace,
        palette: ColorSpace,
    },

    #[error("palette cannot be empty")]
    EmptyPalette,

    #[error("color count must be between 1 and 256, got {0}")]
    InvalidColorCount(usize),

    #[error("median cut requires a power-of-two color count, got {0}")]
    NonPowerOfTwoCount(usize),

    #[error("frame dimensions {width}x{height} exceed the 16-bit header limit")]
    FrameTooLarge { width: usize, height: usize },

    #[error("pixel index {index} is out of range for a {palette_len}-color palette")]
    IndexOutOfRange { index: u8, palette_len: usize },

    #[error("frame is {width}x{height} but stream state is {state_width}x{state_height}")]
    StateMismatch {
        width: usize,
        height: usize,
        state_width: usize,
        state_height: usize,
    },

    #[error("copy chunk requires previous-frame state")]
    MissingState,

    #[error("copy chunk at offset {offset} with length {len} exceeds the previous frame")]
    CopyOutOfRange { offset: usize, len: usize },

    #[error("truncated frame: needed {needed} bytes, had {have}")]
    TruncatedFrame { needed: usize, have: usize },

    #[error("invalid chunk tag {0}")]
    InvalidChunkTag(u8),

    #[error("chunk produces {want} pixels but only {have} remain in the frame")]
    ChunkOverrun { have: usize, want: usize },

    #[error("frequency table does not sum to the coder scale")]
    BadFrequencyTable,
}
