//! Raw frame body: one index byte per pixel, row-major. The baseline the
//! compressed formats are verified against.

use crate::codec::bitio::Reader;
use crate::error::Error;

pub(crate) fn encode_body(out: &mut Vec<u8>, indices: &[u8]) {
    out.extend_from_slice(indices);
}

pub(crate) fn decode_body(reader: &mut Reader<'_>, pixel_count: usize) -> Result<Vec<u8>, Error> {
    Ok(reader.read_bytes(pixel_count)?.to_vec())
}
