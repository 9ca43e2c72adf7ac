//! Entropy-coded frame body ("ans").
//!
//! A static range-ANS coder with byte-wise renormalization and a 12-bit
//! frequency scale. The model is rebuilt from each frame's own index stream
//! (per-frame reset), so every ans frame decodes without model state from
//! earlier frames; the stream session still enforces dimension consistency.
//! Encoding is fully deterministic: the same index stream always yields the
//! same bytes, and correctness is exact round-trip, not approximate.

use crate::codec::bitio::{write_u16, write_u32, Reader};
use crate::error::Error;

const SCALE_BITS: u32 = 12;
const SCALE: u32 = 1 << SCALE_BITS;

/// Lower bound of the coder state interval.
const RANS_L: u32 = 1 << 23;

pub(crate) fn encode_body(out: &mut Vec<u8>, indices: &[u8], palette_len: usize) {
    let freqs = normalized_freqs(indices, palette_len);
    let cum = cumulative(&freqs);

    for &f in &freqs {
        write_u16(out, f as u16);
    }

    // rANS encodes back to front; the byte stream is reversed once at the
    // end so the decoder reads forward.
    let mut payload: Vec<u8> = Vec::with_capacity(indices.len() / 2 + 4);
    let mut x: u32 = RANS_L;

    for &sym in indices.iter().rev() {
        let f = freqs[sym as usize];
        let start = cum[sym as usize];
        let x_max = ((RANS_L >> SCALE_BITS) << 8) * f;
        while x >= x_max {
            payload.push(x as u8);
            x >>= 8;
        }
        x = ((x / f) << SCALE_BITS) + (x % f) + start;
    }

    payload.push(x as u8);
    payload.push((x >> 8) as u8);
    payload.push((x >> 16) as u8);
    payload.push((x >> 24) as u8);
    payload.reverse();

    write_u32(out, payload.len() as u32);
    out.extend_from_slice(&payload);

    log::debug!(
        "ans frame: {} pixels -> {} payload bytes",
        indices.len(),
        payload.len()
    );
}

pub(crate) fn decode_body(
    reader: &mut Reader<'_>,
    pixel_count: usize,
    palette_len: usize,
) -> Result<Vec<u8>, Error> {
    let mut freqs = vec![0u32; palette_len];
    for f in freqs.iter_mut() {
        *f = u32::from(reader.read_u16()?);
    }
    if freqs.iter().sum::<u32>() != SCALE {
        return Err(Error::BadFrequencyTable);
    }
    let cum = cumulative(&freqs);

    // Slot -> symbol lookup across the full scale.
    let mut slot_sym = vec![0u8; SCALE as usize];
    for (sym, (&f, &c)) in freqs.iter().zip(&cum).enumerate() {
        for slot in c..c + f {
            slot_sym[slot as usize] = sym as u8;
        }
    }

    let payload_len = reader.read_u32()? as usize;
    let payload = reader.read_bytes(payload_len)?;
    if payload.len() < 4 {
        return Err(Error::TruncatedFrame {
            needed: 4,
            have: payload.len(),
        });
    }

    let mut x = (u32::from(payload[0]) << 24)
        | (u32::from(payload[1]) << 16)
        | (u32::from(payload[2]) << 8)
        | u32::from(payload[3]);
    let mut pos = 4;

    let mut out = Vec::with_capacity(pixel_count);
    for _ in 0..pixel_count {
        let slot = x & (SCALE - 1);
        let sym = slot_sym[slot as usize];
        out.push(sym);

        x = freqs[sym as usize] * (x >> SCALE_BITS) + slot - cum[sym as usize];
        while x < RANS_L {
            if pos >= payload.len() {
                return Err(Error::TruncatedFrame {
                    needed: pos + 1,
                    have: payload.len(),
                });
            }
            x = (x << 8) | u32::from(payload[pos]);
            pos += 1;
        }
    }

    Ok(out)
}

/// Per-symbol frequencies scaled to sum to exactly [`SCALE`], with every
/// occurring symbol kept above zero.
fn normalized_freqs(indices: &[u8], palette_len: usize) -> Vec<u32> {
    let mut counts = vec![0u64; palette_len];
    for &i in indices {
        counts[i as usize] += 1;
    }
    let total = indices.len() as u64;

    let mut freqs: Vec<u32> = counts
        .iter()
        .map(|&c| {
            if c == 0 {
                0
            } else {
                ((c * u64::from(SCALE) / total) as u32).max(1)
            }
        })
        .collect();

    // Flooring plus the minimum clamp can leave the sum slightly off; settle
    // the difference on the most frequent symbol, which can absorb it.
    let mut sum: u32 = freqs.iter().sum();
    while sum > SCALE {
        let i = argmax(&freqs);
        freqs[i] -= 1;
        sum -= 1;
    }
    if sum < SCALE {
        let i = argmax(&freqs);
        freqs[i] += SCALE - sum;
    }

    freqs
}

fn argmax(freqs: &[u32]) -> usize {
    let mut best = 0;
    for (i, &f) in freqs.iter().enumerate() {
        if f > freqs[best] {
            best = i;
        }
    }
    best
}

fn cumulative(freqs: &[u32]) -> Vec<u32> {
    let mut cum = Vec::with_capacity(freqs.len());
    let mut acc = 0u32;
    for &f in freqs {
        cum.push(acc);
        acc += f;
    }
    cum
}
