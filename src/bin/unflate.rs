//! unflate CLI - DEFLATE decompression tool
//!
//! A command-line interface for the unflate library. Decodes a raw
//! DEFLATE stream (RFC 1951, no gzip/zlib wrapper) from a file, or runs
//! the built-in demo stream when no input is given.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

/// A raw DEFLATE stream containing "ABRACADABRA", decoded when no input
/// file is given.
const DEMO_STREAM: &[u8] =
    b"\x15\xC5\x41\x11\x00\x00\x00\x01\xC1\x6C\x87\x04\xFA\x87\x31\x5E\x8B\x8A\xC9\x19";

/// Decode a raw DEFLATE (RFC 1951) stream.
///
/// Without INPUT, decodes a small built-in demo stream and prints the
/// result.
#[derive(Parser, Debug)]
#[command(name = "unflate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file containing a raw DEFLATE stream
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let compressed = match &args.input {
        Some(path) => fs::read(path)?,
        None => DEMO_STREAM.to_vec(),
    };

    let start = Instant::now();
    let decoded = unflate::decode(&compressed)?;
    let decode_time = start.elapsed();

    if args.verbose {
        match &args.input {
            Some(path) => eprintln!("Decoded: {:?}", path),
            None => eprintln!("Decoded built-in demo stream"),
        }
        eprintln!("  Compressed size: {} bytes", compressed.len());
        eprintln!("  Decoded size: {} bytes", decoded.len());
        eprintln!("  Decode time: {:.2?}", decode_time);
    }

    match &args.output {
        Some(path) => fs::write(path, &decoded)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&decoded)?;
            // Keep shell prompts readable after text output.
            if decoded.last() != Some(&b'\n') {
                writeln!(handle)?;
            }
        }
    }

    Ok(())
}
