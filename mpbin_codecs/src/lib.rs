mod lzss;
mod passthrough;
mod rle;
mod slide;
mod zlib;

pub use lzss::LzssCodec;
pub use passthrough::PassThroughCodec;
pub use rle::RleCodec;
pub use slide::SlideCodec;
pub use zlib::ZlibCodec;

use std::io::Read;
use std::sync::Arc;

use mpbin_core::format::{
    METHOD_LZSS, METHOD_RLE, METHOD_SLIDE_A, METHOD_SLIDE_B, METHOD_SLIDE_C, METHOD_ZLIB,
};
use mpbin_core::Codec;

/// Resolve the decoder for a block's method tag.
///
/// Tags 2, 3 and 4 all carry slide-coded payloads. Unknown tags mean the
/// payload is stored verbatim, so unlike most registries this one cannot
/// fail.
pub fn codec_for_tag(tag: u32) -> Arc<dyn Codec> {
    match tag {
        METHOD_LZSS => Arc::new(LzssCodec),
        METHOD_SLIDE_A | METHOD_SLIDE_B | METHOD_SLIDE_C => Arc::new(SlideCodec),
        METHOD_RLE => Arc::new(RleCodec),
        METHOD_ZLIB => Arc::new(ZlibCodec),
        _ => Arc::new(PassThroughCodec),
    }
}

/// Decode one block from `src`: dispatch on `method_tag` and produce exactly
/// `raw_size` bytes.
///
/// Convenience entry point for callers that don't need to hold the codec —
/// the stream must already be positioned at the block's encoded payload
/// (just past its 8-byte header).
pub fn decode_block(
    src: &mut dyn Read,
    method_tag: u32,
    raw_size: usize,
) -> anyhow::Result<Vec<u8>> {
    codec_for_tag(method_tag).decode(src, raw_size)
}
