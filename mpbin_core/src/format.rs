/// Size of the container's leading entry-count field in bytes.
pub const COUNT_SIZE: u64 = 4;

/// Size of one index slot (a single absolute u32 offset) in bytes.
pub const INDEX_ENTRY_SIZE: u64 = 4;

/// Size of the per-block header preceding each payload, in bytes.
///   raw_size:u32 + method_tag:u32 = 8
pub const BLOCK_HEADER_SIZE: u64 = 8;

// ── Method tags ────────────────────────────────────────────────────────────
//
// The tag stored in each block header selects the decoder. Tags 2, 3 and 4
// all select the Slide decoder; the distinction mattered to the original
// encoder but not to decoding. Any tag not listed here means the payload is
// stored verbatim.

pub const METHOD_LZSS: u32 = 1;
pub const METHOD_SLIDE_A: u32 = 2;
pub const METHOD_SLIDE_B: u32 = 3;
pub const METHOD_SLIDE_C: u32 = 4;
pub const METHOD_RLE: u32 = 5;
pub const METHOD_ZLIB: u32 = 7;

/// Human-readable decoder label for a method tag, as recorded in the
/// extraction manifest. Unknown tags are stored verbatim and labelled
/// `"none"`.
pub fn method_label(tag: u32) -> &'static str {
    match tag {
        METHOD_LZSS => "lzss",
        METHOD_SLIDE_A | METHOD_SLIDE_B | METHOD_SLIDE_C => "slide",
        METHOD_RLE => "rle",
        METHOD_ZLIB => "zlib",
        _ => "none",
    }
}

// ── Block header ───────────────────────────────────────────────────────────

/// Decoded representation of the 8-byte header at the start of each block.
///
/// All container fields are big-endian. `raw_size` is the exact number of
/// bytes the selected decoder must produce; the encoded payload that follows
/// is self-delimiting per decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub raw_size: u32,
    pub method_tag: u32,
}

impl BlockHeader {
    /// Serialize to exactly `BLOCK_HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_SIZE as usize] {
        let mut buf = [0u8; BLOCK_HEADER_SIZE as usize];
        buf[..4].copy_from_slice(&self.raw_size.to_be_bytes());
        buf[4..].copy_from_slice(&self.method_tag.to_be_bytes());
        buf
    }

    /// Deserialize from `BLOCK_HEADER_SIZE` bytes.
    pub fn from_bytes(buf: &[u8; BLOCK_HEADER_SIZE as usize]) -> anyhow::Result<Self> {
        Ok(Self {
            raw_size: u32::from_be_bytes(buf[..4].try_into()?),
            method_tag: u32::from_be_bytes(buf[4..].try_into()?),
        })
    }

    /// Decoder label for this block's method tag.
    pub fn label(&self) -> &'static str {
        method_label(self.method_tag)
    }
}
