use std::io::Read;

use mpbin_core::codec::Codec;
use mpbin_core::reader::ReadBinExt;

/// Zero-length steps (length byte 0 or 128) are legal no-ops. A stream made
/// of nothing else would never finish, so after this many consecutive empty
/// steps the decode fails instead of reading forever.
const STALL_LIMIT: u32 = 4096;

/// Byte-oriented run-length decoder (method tag 5).
///
/// Each step starts with one length byte `n`. The top bit picks the step
/// kind: `n < 128` emits one following value byte `n` times, `n >= 128`
/// emits the next `n - 128` source bytes verbatim.
pub struct RleCodec;

impl Codec for RleCodec {
    fn name(&self) -> &'static str {
        "rle"
    }

    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(raw_size);
        let mut stalled = 0u32;

        while out.len() < raw_size {
            let n = src.read_u8()?;

            let emitted = if n < 128 {
                let run = (n as usize).min(raw_size - out.len());
                let value = src.read_u8()?;
                out.resize(out.len() + run, value);
                run
            } else {
                let span = ((n - 128) as usize).min(raw_size - out.len());
                let start = out.len();
                out.resize(start + span, 0);
                src.read_exact(&mut out[start..])?;
                span
            };

            if emitted == 0 {
                stalled += 1;
                if stalled >= STALL_LIMIT {
                    anyhow::bail!(
                        "rle stream made no progress for {} steps ({} of {} bytes decoded)",
                        STALL_LIMIT,
                        out.len(),
                        raw_size
                    );
                }
            } else {
                stalled = 0;
            }
        }

        Ok(out)
    }
}
