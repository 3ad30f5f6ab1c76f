use std::io::Read;

use mpbin_core::codec::Codec;

/// Verbatim decoder for blocks stored without compression.
///
/// Any method tag outside the known set means "stored": the container uses
/// unfamiliar tags for data that didn't compress, so this is the dispatcher
/// fallback rather than an error path.
pub struct PassThroughCodec;

impl Codec for PassThroughCodec {
    fn name(&self) -> &'static str {
        "none"
    }

    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>> {
        let mut out = vec![0u8; raw_size];
        src.read_exact(&mut out)?;
        Ok(out)
    }
}
