//! Classifies decoded payloads by magic signature.
//!
//! The container index carries no type information; the only way to name an
//! extracted file sensibly is to look at what came out of the decoder. Only
//! two signatures are known — HSF scene data and ANIM/ATB animation data —
//! and everything else falls back to `dat`.

/// 4-byte marker found at offset 12 of ATB animation banks.
const ATB_MARKER: [u8; 4] = [0x00, 0x00, 0x00, 0x14];

/// Return the file extension for a decoded payload: `"hsf"`, `"anm"` or
/// `"dat"`.
///
/// The hsf probe runs first; the order is fixed so classification stays
/// deterministic even for byte soup that happens to hit both probes. Short
/// buffers simply miss the probes and classify as `"dat"`.
pub fn sniff_extension(buf: &[u8]) -> &'static str {
    if buf.starts_with(b"HSFV037") {
        return "hsf";
    }
    if buf.starts_with(b"ANIM") || buf.get(12..16) == Some(&ATB_MARKER) {
        return "anm";
    }
    "dat"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsf_signature() {
        assert_eq!(sniff_extension(b"HSFV037\x00rest of header"), "hsf");
    }

    #[test]
    fn anim_prefix() {
        assert_eq!(sniff_extension(b"ANIM and then anything"), "anm");
    }

    #[test]
    fn atb_marker_at_offset_12() {
        let mut buf = vec![0xAAu8; 32];
        buf[12..16].copy_from_slice(&[0x00, 0x00, 0x00, 0x14]);
        assert_eq!(sniff_extension(&buf), "anm");
    }

    #[test]
    fn fallback_is_dat() {
        assert_eq!(sniff_extension(&[0u8; 16]), "dat");
        assert_eq!(sniff_extension(b"HSFV038 wrong version padding"), "dat");
    }

    #[test]
    fn short_buffers_fall_through() {
        assert_eq!(sniff_extension(b""), "dat");
        assert_eq!(sniff_extension(b"ANI"), "dat");
        assert_eq!(sniff_extension(b"ANIM"), "anm");
    }
}
