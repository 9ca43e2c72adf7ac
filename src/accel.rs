//! Optional compute-backend bridge for the pixel-parallel inner loops.
//!
//! Nearest-palette search is a strategy behind the [`Backend`] trait. The
//! CPU implementation is always available and data-parallel over pixels; a
//! GPU backend could be installed at initialization without changing any
//! caller-visible contract. This build links no GPU runtime, so
//! [`init_accelerator`] always reports failure and the CPU path stays
//! active — accelerator loss is never an error, only a `false` status.

use std::sync::OnceLock;

use rayon::prelude::*;

use crate::color::Color;
use crate::palette::Palette;

/// How to pick a compute device at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSelector {
    /// An explicit platform device index.
    Index(usize),
    /// The device with the most compute throughput.
    BestFlops,
    /// The device with the most memory capacity.
    BestMemory,
}

/// A compute backend for the quantization inner loops.
pub(crate) trait Backend: Send + Sync {
    /// Nearest palette index for every pixel, in order.
    fn nearest_indices(&self, pixels: &[Color], palette: &Palette) -> Vec<u8>;
}

struct Cpu;

impl Backend for Cpu {
    fn nearest_indices(&self, pixels: &[Color], palette: &Palette) -> Vec<u8> {
        pixels.par_iter().map(|&p| palette.nearest(p)).collect()
    }
}

static ACTIVE: OnceLock<Box<dyn Backend>> = OnceLock::new();

fn active() -> &'static dyn Backend {
    ACTIVE.get_or_init(|| Box::new(Cpu)).as_ref()
}

/// Attempts to initialize an accelerator device.
///
/// Returns whether initialization succeeded. On failure (always, in this
/// build) the library keeps working on the CPU path with identical results.
pub fn init_accelerator(selector: DeviceSelector) -> bool {
    log::debug!("accelerator init requested ({selector:?}): no device backend linked, staying on CPU");
    false
}

/// Nearest-index search through the active backend.
pub(crate) fn nearest_indices(pixels: &[Color], palette: &Palette) -> Vec<u8> {
    active().nearest_indices(pixels, palette)
}
