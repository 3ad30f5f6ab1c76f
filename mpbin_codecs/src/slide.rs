use std::io::Read;

use mpbin_core::codec::Codec;
use mpbin_core::reader::ReadBinExt;

/// Masked-window "slide" decoder (method tags 2, 3 and 4).
///
/// Unlike [`LzssCodec`](crate::LzssCodec)'s fixed ring buffer, slide
/// back-references are relative to the output produced so far: a 12-bit
/// distance reaches up to 4 KB back into the destination itself. Control
/// bits come 32 at a time from a big-endian mask word, consumed MSB-first.
///
/// A reference may reach before the start of the output (the encoder leans
/// on an implicit zero-filled prefix); each out-of-range byte of such a copy
/// yields 0x00. That is defined behavior of the format, not corruption.
pub struct SlideCodec;

impl Codec for SlideCodec {
    fn name(&self) -> &'static str {
        "slide"
    }

    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>> {
        // Leading length word, present in the stream but unused by the
        // decode. Read (not seeked past) to keep the cursor arithmetic
        // identical for non-seekable sources.
        let _stored_len = src.read_u32_be()?;

        let mut out = Vec::with_capacity(raw_size);
        let mut mask: u32 = 0;
        let mut bits_left: u32 = 0;

        while out.len() < raw_size {
            if bits_left == 0 {
                mask = src.read_u32_be()?;
                bits_left = 32;
            }

            if mask & 0x8000_0000 != 0 {
                out.push(src.read_u8()?);
            } else {
                let hi = src.read_u8()? as usize;
                let lo = src.read_u8()? as usize;
                let v = (hi << 8) | lo;
                let distance = v & 0xFFF;
                let field = v >> 12;

                let copy_len = if field == 0 {
                    // Extended encoding for long matches: 18..=273.
                    src.read_u8()? as usize + 18
                } else {
                    field + 2
                };
                let copy_len = copy_len.min(raw_size - out.len());

                // Each byte reads from `pos - distance - 1` at the moment it
                // is written, so the effective lookback distance stays
                // constant while source and destination advance together and
                // overlapping copies expand correctly.
                for _ in 0..copy_len {
                    let pos = out.len();
                    let byte = match pos.checked_sub(distance + 1) {
                        Some(read_idx) => out[read_idx],
                        // Reference reaches before the stream start.
                        None => 0,
                    };
                    out.push(byte);
                }
            }

            mask <<= 1;
            bits_left -= 1;
        }

        Ok(out)
    }
}
