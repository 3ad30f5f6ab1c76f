//! End-to-end container tests: build a synthetic .bin container on disk,
//! open it through `Archive`, and decode entries through the real decoder
//! registry.
//!
//! Container layout under test (big-endian):
//!   u32 entry_count, entry_count × u32 offsets,
//!   per entry: u32 raw_size, u32 method_tag, payload.
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use mpbin_codecs::codec_for_tag;
use mpbin_core::format::{BlockHeader, METHOD_RLE, METHOD_ZLIB};
use mpbin_core::{sniff_extension, Archive};

/// One container entry: method tag plus already-encoded payload.
struct TestEntry {
    method_tag: u32,
    raw_size: u32,
    payload: Vec<u8>,
}

/// Assemble a container image from entries and write it to a temp file.
fn write_container(name: &str, entries: &[TestEntry]) -> std::path::PathBuf {
    let index_size = 4 + 4 * entries.len() as u32;

    let mut image = Vec::new();
    image.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    let mut offset = index_size;
    for entry in entries {
        image.extend_from_slice(&offset.to_be_bytes());
        offset += 8 + entry.payload.len() as u32;
    }
    for entry in entries {
        let header = BlockHeader {
            raw_size: entry.raw_size,
            method_tag: entry.method_tag,
        };
        image.extend_from_slice(&header.to_bytes());
        image.extend_from_slice(&entry.payload);
    }

    let path = std::env::temp_dir().join(format!("mpbin_test_{}.bin", name));
    std::fs::write(&path, image).unwrap();
    path
}

fn decode_all(archive: &mut Archive) -> Vec<(String, Vec<u8>)> {
    (0..archive.entry_count())
        .map(|i| {
            let header = archive.block_header(i).unwrap();
            let codec = codec_for_tag(header.method_tag);
            let raw = archive.decode_entry(i, codec.as_ref()).unwrap();
            (codec.name().to_string(), raw)
        })
        .collect()
}

#[test]
fn single_rle_entry_end_to_end() {
    // rle payload: run of three 0xFF, then a two-byte literal span.
    let path = write_container(
        "single_rle",
        &[TestEntry {
            method_tag: METHOD_RLE,
            raw_size: 5,
            payload: vec![3, 0xFF, 0x82, 0x41, 0x42],
        }],
    );

    let mut archive = Archive::open(&path).unwrap();
    assert_eq!(archive.entry_count(), 1);
    assert_eq!(archive.offsets(), &[8]);

    let header = archive.block_header(0).unwrap();
    assert_eq!(header.raw_size, 5);
    assert_eq!(header.label(), "rle");

    let raw = archive.decode_entry(0, codec_for_tag(header.method_tag).as_ref()).unwrap();
    assert_eq!(raw, [0xFF, 0xFF, 0xFF, 0x41, 0x42]);
    assert_eq!(sniff_extension(&raw), "dat");
}

#[test]
fn mixed_container_decodes_and_classifies() {
    // Entry 0: stored HSF scene (unknown tag → verbatim).
    let hsf = b"HSFV037\x00scene geometry padding".to_vec();

    // Entry 1: zlib-compressed ANIM bank.
    let anm = b"ANIMxxxxyyyyzzzz animation bank".to_vec();
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&anm).unwrap();
    let packed = enc.finish().unwrap();
    let mut zlib_payload = Vec::new();
    zlib_payload.extend_from_slice(&(anm.len() as u32).to_be_bytes());
    zlib_payload.extend_from_slice(&(packed.len() as u32).to_be_bytes());
    zlib_payload.extend_from_slice(&packed);

    let path = write_container(
        "mixed",
        &[
            TestEntry {
                method_tag: 0,
                raw_size: hsf.len() as u32,
                payload: hsf.clone(),
            },
            TestEntry {
                method_tag: METHOD_ZLIB,
                raw_size: anm.len() as u32,
                payload: zlib_payload,
            },
        ],
    );

    let mut archive = Archive::open(&path).unwrap();
    let decoded = decode_all(&mut archive);

    assert_eq!(decoded[0].0, "none");
    assert_eq!(decoded[0].1, hsf);
    assert_eq!(sniff_extension(&decoded[0].1), "hsf");

    assert_eq!(decoded[1].0, "zlib");
    assert_eq!(decoded[1].1, anm);
    assert_eq!(sniff_extension(&decoded[1].1), "anm");
}

#[test]
fn entries_decode_independently_of_order() {
    let path = write_container(
        "out_of_order",
        &[
            TestEntry {
                method_tag: 0,
                raw_size: 4,
                payload: b"one!".to_vec(),
            },
            TestEntry {
                method_tag: METHOD_RLE,
                raw_size: 6,
                payload: vec![6, 0x2A],
            },
        ],
    );

    // Read entry 1 first: nothing about entry 0 is touched or required.
    let mut archive = Archive::open(&path).unwrap();
    let second = archive
        .decode_entry(1, codec_for_tag(METHOD_RLE).as_ref())
        .unwrap();
    assert_eq!(second, vec![0x2A; 6]);

    let first = archive.decode_entry(0, codec_for_tag(0).as_ref()).unwrap();
    assert_eq!(first, b"one!");
}

#[test]
fn entry_index_out_of_range_is_an_error() {
    let path = write_container(
        "oob",
        &[TestEntry {
            method_tag: 0,
            raw_size: 1,
            payload: vec![0x7F],
        }],
    );

    let mut archive = Archive::open(&path).unwrap();
    let err = archive.block_header(3).unwrap_err();
    assert!(
        err.to_string().contains("out of range"),
        "unexpected error: {err}"
    );
}

#[test]
fn truncated_payload_surfaces_as_decode_failure() {
    // Header promises 32 verbatim bytes; only 4 exist.
    let path = write_container(
        "truncated",
        &[TestEntry {
            method_tag: 0,
            raw_size: 32,
            payload: b"oops".to_vec(),
        }],
    );

    let mut archive = Archive::open(&path).unwrap();
    let err = archive.decode_entry(0, codec_for_tag(0).as_ref());
    assert!(err.is_err(), "short payload must fail, not zero-fill");
}

#[test]
fn absurd_entry_count_fails_cleanly() {
    // Claims ~4 billion entries in a 16-byte file. Open must fail on the
    // short index read without first attempting a matching allocation.
    let mut image = Vec::new();
    image.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
    image.extend_from_slice(&[0u8; 12]);
    let path = std::env::temp_dir().join("mpbin_test_absurd_count.bin");
    std::fs::write(&path, image).unwrap();

    assert!(Archive::open(&path).is_err());
}

#[test]
fn truncated_index_fails_on_open() {
    // entry_count says 4 but only one offset slot follows.
    let mut image = Vec::new();
    image.extend_from_slice(&4u32.to_be_bytes());
    image.extend_from_slice(&20u32.to_be_bytes());
    let path = std::env::temp_dir().join("mpbin_test_truncated_index.bin");
    std::fs::write(&path, image).unwrap();

    assert!(Archive::open(&path).is_err());
}
