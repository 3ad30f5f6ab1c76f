use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use mpbin_codecs::codec_for_tag;
use mpbin_core::{sniff_extension, Archive};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "mpbin",
    about = "Extract and inspect Mario Party GameCube .bin asset containers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every entry to file<N>.<ext> and write a JSON manifest
    Extract {
        /// Source .bin container
        input: PathBuf,
        /// Output directory (default: a directory named after the input,
        /// next to it)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the container index and per-entry metadata
    Inspect {
        /// Container to inspect
        file: PathBuf,
        /// Print the per-entry table
        #[arg(long)]
        entries: bool,
    },
    /// Decode a single entry by index
    Entry {
        /// Container file
        file: PathBuf,
        /// Zero-based entry index to decode
        #[arg(short, long)]
        index: usize,
        /// Write raw bytes to a file instead of printing a hex dump
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ── Manifest ───────────────────────────────────────────────────────────────

/// One manifest record per extracted entry: which decoder ran and where the
/// output landed. Mirrors the fields the original dumper recorded for each
/// file.
#[derive(Serialize)]
struct ManifestEntry {
    id: String,
    compression: &'static str,
    path: String,
}

#[derive(Serialize)]
struct Manifest {
    files: Vec<ManifestEntry>,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn derive_stem(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mpbin_out")
        .to_string()
}

/// Resolve where extraction output lands: the output directory, the
/// relative-path prefix recorded in the manifest, and the manifest file
/// itself.
///
/// By default everything is named after the container: `boards/w01.bin`
/// extracts into `boards/w01/` with a `boards/w01.json` manifest beside it.
/// An explicit `--out-dir` keeps the manifest prefix in step with the
/// directory's final component; when that component is unusable (`.`, `/`)
/// the container stem still names the manifest.
fn output_locations(input: &Path, out_dir: Option<PathBuf>) -> (PathBuf, String, PathBuf) {
    let stem = derive_stem(input);
    let (dir, prefix) = match out_dir {
        Some(dir) => {
            let prefix = dir
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| stem.clone());
            (dir, prefix)
        }
        None => {
            let dir = input.parent().unwrap_or_else(|| Path::new("")).join(&stem);
            (dir, stem)
        }
    };
    let manifest_path = match dir.parent() {
        Some(parent) => parent.join(format!("{}.json", prefix)),
        None => PathBuf::from(format!("{}.json", prefix)),
    };
    (dir, prefix, manifest_path)
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_extract(input: PathBuf, out_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let (dir, prefix, manifest_path) = output_locations(&input, out_dir);
    fs::create_dir_all(&dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let mut archive =
        Archive::open(&input).with_context(|| format!("opening container {:?}", input))?;

    let t0 = Instant::now();
    let mut total_raw = 0u64;
    let mut files = Vec::with_capacity(archive.entry_count());

    for idx in 0..archive.entry_count() {
        let header = archive.block_header(idx)?;
        let codec = codec_for_tag(header.method_tag);
        let raw = archive.decode_entry(idx, codec.as_ref())?;

        let ext = sniff_extension(&raw);
        let file_name = format!("file{}.{}", idx, ext);
        fs::write(dir.join(&file_name), &raw)
            .with_context(|| format!("writing {:?}", dir.join(&file_name)))?;

        total_raw += raw.len() as u64;
        files.push(ManifestEntry {
            id: format!("file{}_{}", idx, ext),
            compression: codec.name(),
            path: format!("{}/{}", prefix, file_name),
        });
    }

    let manifest = serde_json::to_string_pretty(&Manifest { files })?;
    fs::write(&manifest_path, manifest)
        .with_context(|| format!("writing manifest {:?}", manifest_path))?;

    let elapsed = t0.elapsed();
    eprintln!("  entries     : {}", archive.entry_count());
    eprintln!("  raw bytes   : {}", human_bytes(total_raw));
    eprintln!("  output dir  : {:?}", dir);
    eprintln!("  manifest    : {:?}", manifest_path);
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf, show_entries: bool) -> anyhow::Result<()> {
    let mut archive =
        Archive::open(&file).with_context(|| format!("opening container {:?}", file))?;
    let file_size = fs::metadata(&file)?.len();

    println!("=== mpbin container: {:?} ===", file);
    println!();
    println!("  entries        : {}", archive.entry_count());
    println!("  file on disk   : {}", human_bytes(file_size));

    let mut total_raw = 0u64;
    let mut rows = Vec::with_capacity(archive.entry_count());
    for idx in 0..archive.entry_count() {
        let offset = archive.offsets()[idx];
        let header = archive.block_header(idx)?;
        total_raw += header.raw_size as u64;
        rows.push((idx, offset, header));
    }
    println!("  raw total      : {}", human_bytes(total_raw));

    if show_entries {
        println!();
        println!(
            "  {:>6}  {:>12}  {:>12}  {:>6}  method",
            "entry", "offset", "raw", "tag"
        );
        println!("  {}", "-".repeat(52));
        for (idx, offset, header) in rows {
            println!(
                "  {:>6}  {:>12}  {:>12}  {:>6}  {}",
                idx,
                offset,
                human_bytes(header.raw_size as u64),
                header.method_tag,
                header.label()
            );
        }
    }

    Ok(())
}

fn run_entry(file: PathBuf, index: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut archive =
        Archive::open(&file).with_context(|| format!("opening container {:?}", file))?;

    let header = archive.block_header(index)?;
    eprintln!(
        "entry {} at offset {}: {} ({} raw)",
        index,
        archive.offsets()[index],
        header.label(),
        human_bytes(header.raw_size as u64)
    );

    let t0 = Instant::now();
    let raw = archive.decode_entry(index, codec_for_tag(header.method_tag).as_ref())?;
    let elapsed = t0.elapsed();

    eprintln!(
        "  decoded {} ({}) in {:.3}ms",
        human_bytes(raw.len() as u64),
        sniff_extension(&raw),
        elapsed.as_secs_f64() * 1000.0
    );

    match output {
        Some(path) => {
            fs::write(&path, &raw).with_context(|| format!("writing {:?}", path))?;
            eprintln!("  written to {:?}", path);
        }
        None => {
            // Hex dump of the first 256 bytes
            let preview = &raw[..raw.len().min(256)];
            println!(
                "--- entry {} ({} bytes, first {} shown) ---",
                index,
                raw.len(),
                preview.len()
            );
            for (i, chunk) in preview.chunks(16).enumerate() {
                print!("  {:04x}  ", i * 16);
                for b in chunk {
                    print!("{:02x} ", b);
                }
                for _ in chunk.len()..16 {
                    print!("   ");
                }
                print!("  |");
                for b in chunk {
                    if b.is_ascii_graphic() || *b == b' ' {
                        print!("{}", *b as char);
                    } else {
                        print!(".");
                    }
                }
                println!("|");
            }
            if raw.len() > 256 {
                println!("  ... ({} bytes remaining not shown)", raw.len() - 256);
            }
        }
    }

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Extract { input, out_dir } => run_extract(input, out_dir),
        Commands::Inspect { file, entries } => run_inspect(file, entries),
        Commands::Entry {
            file,
            index,
            output,
        } => run_entry(file, index, output),
    }
}
