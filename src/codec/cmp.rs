//! Delta/run frame body ("cmp").
//!
//! The index stream is emitted as chunks. A literal-run chunk repeats one
//! index; a copy chunk replays a span of the previous frame's indices.
//! Neither kind crosses a row boundary, and a copy is only chosen when it
//! covers more pixels than the literal run at the same position and more
//! than its own header, so a static scene collapses to one chunk per row
//! while noisy content degrades to plain runs.

use crate::codec::bitio::{varint_len, write_varint, Reader};
use crate::error::Error;

const TAG_LITERAL: u8 = 0;
const TAG_COPY: u8 = 1;

/// Encodes one frame against the optional previous frame's indices.
/// Without a previous frame every chunk is a literal run (a keyframe).
pub(crate) fn encode_body(out: &mut Vec<u8>, indices: &[u8], width: usize, prev: Option<&[u8]>) {
    let start_len = out.len();
    let height = indices.len() / width;

    for y in 0..height {
        let row = &indices[y * width..(y + 1) * width];
        let mut x = 0;
        while x < width {
            let pos = y * width + x;
            let run_len = run_length(&row[x..]);
            let copy_len = match prev {
                Some(prev) => match_length(&row[x..], &prev[pos..]),
                None => 0,
            };

            let copy_cost = 1 + varint_len(pos as u64) + varint_len(copy_len as u64);
            if copy_len > run_len && copy_len > copy_cost {
                out.push(TAG_COPY);
                write_varint(out, pos as u64);
                write_varint(out, copy_len as u64);
                x += copy_len;
            } else {
                out.push(TAG_LITERAL);
                out.push(row[x]);
                write_varint(out, run_len as u64);
                x += run_len;
            }
        }
    }

    log::debug!(
        "cmp frame: {} pixels -> {} chunk bytes",
        indices.len(),
        out.len() - start_len
    );
}

/// Decodes chunks until the frame is full. Copy chunks require the previous
/// frame; without one the stream state does not match and decoding fails.
pub(crate) fn decode_body(
    reader: &mut Reader<'_>,
    pixel_count: usize,
    prev: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(pixel_count);

    while out.len() < pixel_count {
        let tag = reader.read_u8()?;
        match tag {
            TAG_LITERAL => {
                let index = reader.read_u8()?;
                let len = reader.read_varint()? as usize;
                check_room(&out, pixel_count, len)?;
                out.resize(out.len() + len, index);
            }
            TAG_COPY => {
                let offset = reader.read_varint()? as usize;
                let len = reader.read_varint()? as usize;
                check_room(&out, pixel_count, len)?;
                let prev = prev.ok_or(Error::MissingState)?;
                if offset.checked_add(len).map_or(true, |end| end > prev.len()) {
                    return Err(Error::CopyOutOfRange { offset, len });
                }
                out.extend_from_slice(&prev[offset..offset + len]);
            }
            other => return Err(Error::InvalidChunkTag(other)),
        }
    }

    Ok(out)
}

fn check_room(out: &[u8], pixel_count: usize, len: usize) -> Result<(), Error> {
    let have = pixel_count - out.len();
    if len > have {
        return Err(Error::ChunkOverrun { have, want: len });
    }
    Ok(())
}

/// Length of the run of identical bytes at the start of `row`.
fn run_length(row: &[u8]) -> usize {
    let first = row[0];
    row.iter().take_while(|&&b| b == first).count()
}

/// Length of the common prefix of `cur` and `prev`.
fn match_length(cur: &[u8], prev: &[u8]) -> usize {
    cur.iter().zip(prev).take_while(|(a, b)| a == b).count()
}
