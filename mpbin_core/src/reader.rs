use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::codec::Codec;
use crate::format::BlockHeader;

/// Big-endian read primitives shared by the index reader and the decoders.
///
/// The container format is big-endian throughout (GameCube heritage), so
/// these are the only two read shapes anything needs. Truncation surfaces
/// as the underlying `io::Error` from `read_exact`.
pub trait ReadBinExt: Read {
    fn read_u8(&mut self) -> std::io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u32_be(&mut self) -> std::io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }
}

impl<R: Read + ?Sized> ReadBinExt for R {}

/// Seek-based reader for mpbin containers.
///
/// # Open sequence
/// 1. Read the leading `u32 entry_count`.
/// 2. Read `entry_count × u32` absolute byte offsets into RAM.
///
/// The whole index is 4 bytes per entry; even pathological containers keep
/// it trivially small.
///
/// # Access pattern
/// [`decode_entry`] seeks directly to one entry's offset, reads its 8-byte
/// block header, and hands the stream to the supplied decoder. No other
/// entries are touched, so entries can be decoded in any order.
pub struct Archive {
    file: File,
    offsets: Vec<u32>,
}

impl Archive {
    /// Open a container and load its offset table.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut file = File::open(path)?;

        let entry_count = file.read_u32_be()?;
        // entry_count is untrusted; cap the preallocation so a corrupt
        // count fails on the short index read below, not on a giant alloc.
        let mut offsets = Vec::with_capacity(entry_count.min(4096) as usize);
        for _ in 0..entry_count {
            offsets.push(file.read_u32_be()?);
        }

        Ok(Self { file, offsets })
    }

    /// Number of entries in the container index.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.offsets.len()
    }

    /// Access the raw offset table (for inspection).
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    fn offset_of(&self, idx: usize) -> anyhow::Result<u64> {
        let off = self.offsets.get(idx).ok_or_else(|| {
            anyhow::anyhow!(
                "entry index {} out of range (container has {} entries)",
                idx,
                self.offsets.len()
            )
        })?;
        Ok(*off as u64)
    }

    /// Seek to entry `idx` and read its `(raw_size, method_tag)` header,
    /// leaving the file cursor at the start of the encoded payload.
    pub fn block_header(&mut self, idx: usize) -> anyhow::Result<BlockHeader> {
        let offset = self.offset_of(idx)?;
        self.file.seek(SeekFrom::Start(offset))?;
        let raw_size = self.file.read_u32_be()?;
        let method_tag = self.file.read_u32_be()?;
        Ok(BlockHeader {
            raw_size,
            method_tag,
        })
    }

    /// Decode entry `idx` with the given decoder and return its raw bytes.
    ///
    /// `codec` must be the decoder selected for this entry's method tag
    /// (resolve it via the header from [`block_header`]). The decoded length
    /// is verified against the header's `raw_size`.
    pub fn decode_entry(&mut self, idx: usize, codec: &dyn Codec) -> anyhow::Result<Vec<u8>> {
        let header = self.block_header(idx)?;

        let raw = codec
            .decode(&mut self.file, header.raw_size as usize)
            .map_err(|e| anyhow::anyhow!("entry {} ({}): {}", idx, codec.name(), e))?;

        if raw.len() != header.raw_size as usize {
            anyhow::bail!(
                "entry {} decoded to {} bytes but header says {}",
                idx,
                raw.len(),
                header.raw_size
            );
        }

        Ok(raw)
    }
}
