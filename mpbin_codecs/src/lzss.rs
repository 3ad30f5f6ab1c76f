use std::io::Read;

use mpbin_core::codec::Codec;
use mpbin_core::reader::ReadBinExt;

/// Size of the circular history window in bytes.
const WINDOW_SIZE: usize = 1024;

/// Initial write-cursor position inside the window. This matches the
/// encoder's seed position and must not be normalized to 0: early
/// back-references resolve against the zero-filled region between 958 and
/// the bytes written so far.
const WINDOW_SEED: usize = 958;

/// Windowed LZSS decoder (method tag 1).
///
/// The encoded stream interleaves flag bytes with data: each flag byte
/// supplies 8 control bits, consumed LSB-first. A set bit means one literal
/// byte follows; a clear bit means a two-byte back-reference into a 1024-byte
/// circular window of recent output. Every output byte is also mirrored into
/// the window at the current cursor, so a back-reference may legally overlap
/// the region being written (classic self-referential run expansion).
pub struct LzssCodec;

impl Codec for LzssCodec {
    fn name(&self) -> &'static str {
        "lzss"
    }

    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(raw_size);
        let mut window = [0u8; WINDOW_SIZE];
        let mut cursor = WINDOW_SEED;

        // Flag register: 8 usable bits plus a 9th sentinel bit. After the
        // refill `0xFF00 | byte` the sentinel survives exactly 8 right
        // shifts, so `reg & 0x100 == 0` means all 8 control bits are spent.
        let mut reg: u32 = 0;

        while out.len() < raw_size {
            reg >>= 1;
            if reg & 0x100 == 0 {
                reg = 0xFF00 | src.read_u8()? as u32;
            }

            if reg & 1 != 0 {
                let byte = src.read_u8()?;
                out.push(byte);
                window[cursor] = byte;
                cursor = (cursor + 1) % WINDOW_SIZE;
            } else {
                let b1 = src.read_u8()? as usize;
                let b2 = src.read_u8()? as usize;
                let ofs = ((b2 & 0xC0) << 2) | b1;
                let copy_len = (b2 & 0x3F) + 3;

                // A trailing reference may claim more than the block has
                // left; clamp to the declared length rather than overrun.
                let copy_len = copy_len.min(raw_size - out.len());

                for i in 0..copy_len {
                    let byte = window[(ofs + i) % WINDOW_SIZE];
                    out.push(byte);
                    window[cursor] = byte;
                    cursor = (cursor + 1) % WINDOW_SIZE;
                }
            }
        }

        Ok(out)
    }
}
