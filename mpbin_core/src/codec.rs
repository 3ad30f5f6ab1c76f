use std::io::Read;

/// Core decoder abstraction.
///
/// Each `Codec` implementation:
/// - Consumes its encoded payload strictly sequentially from `src`; every
///   payload is self-delimiting, so a correct decode leaves the stream
///   positioned exactly past the block.
/// - Must produce exactly `raw_size` bytes or fail. Decoder state (windows,
///   flag/mask registers) lives only for the duration of one `decode` call;
///   nothing is shared across blocks, which is what makes every block
///   independently decodable.
/// - Must bound every destination write by `raw_size`. A trailing copy or
///   run that would overshoot is clamped to the declared length; writes past
///   the destination are never permitted.
pub trait Codec: Send + Sync {
    /// Decoder name as recorded in the manifest ("lzss", "slide", ...).
    fn name(&self) -> &'static str;

    /// Decode one block's payload into exactly `raw_size` bytes.
    ///
    /// A source stream that runs dry before the block is complete is a
    /// decode failure, not a silent zero-fill.
    fn decode(&self, src: &mut dyn Read, raw_size: usize) -> anyhow::Result<Vec<u8>>;
}
