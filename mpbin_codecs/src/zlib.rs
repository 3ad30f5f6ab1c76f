use std::io::Read;

use flate2::read::{MultiGzDecoder, ZlibDecoder};
use mpbin_core::codec::Codec;
use mpbin_core::reader::ReadBinExt;

/// Deflate bridge (method tag 7).
///
/// The payload is self-describing: a big-endian `decoded_size` and
/// `packed_size` pair, then `packed_size` bytes of a zlib or gzip stream.
/// The inner `decoded_size` duplicates the outer block header's `raw_size`
/// in every container observed so far, but the format carries both and both
/// are read — the outer field sizes the destination, the inner field is what
/// the deflate stream is checked against.
///
/// Framing is auto-detected the way the original tool configured zlib
/// (`inflateInit2` with windowBits 15 + 32): a gzip magic prefix selects the
/// gzip wrapper, anything else is treated as zlib.
pub struct ZlibCodec;

/// Two-byte gzip stream magic.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

impl Codec for ZlibCodec {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>> {
        let decoded_size = src.read_u32_be()? as usize;
        let packed_size = src.read_u32_be()? as usize;

        let mut packed = vec![0u8; packed_size];
        src.read_exact(&mut packed)?;

        let mut out = Vec::with_capacity(decoded_size);
        let produced = if packed.starts_with(&GZIP_MAGIC) {
            MultiGzDecoder::new(packed.as_slice()).read_to_end(&mut out)
        } else {
            ZlibDecoder::new(packed.as_slice()).read_to_end(&mut out)
        }
        .map_err(|e| anyhow::anyhow!("inflate failed: {}", e))?;

        if produced != decoded_size {
            anyhow::bail!(
                "deflate stream produced {} bytes but sub-block header says {}",
                produced,
                decoded_size
            );
        }

        // Fit to the outer header's length: the destination buffer is sized
        // by `raw_size` no matter what the sub-block claims.
        out.truncate(raw_size);
        out.resize(raw_size, 0);

        Ok(out)
    }
}
