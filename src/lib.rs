//! # unflate
//!
//! A dependency-free decoder for the raw DEFLATE compressed-data format
//! (RFC 1951), hand-implemented for maximum control over the decode path.
//!
//! The input is the bare DEFLATE bit stream: no gzip or zlib wrapper and
//! no checksum. Decoding is a single synchronous call over an in-memory
//! buffer; nothing escapes it except the output bytes, so independent
//! decodes are safe to run concurrently.
//!
//! Stored (uncompressed) blocks are deliberately unsupported and reported
//! as an error rather than handled.
//!
//! ## Example
//!
//! ```rust
//! // A raw DEFLATE stream containing "ABRACADABRA".
//! let data = b"\x15\xC5\x41\x11\x00\x00\x00\x01\xC1\x6C\x87\x04\xFA\x87\x31\x5E\x8B\x8A\xC9\x19";
//! let decoded = unflate::decode(data).unwrap();
//! assert_eq!(decoded, b"ABRACADABRA");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bit_reader;
pub mod error;
pub mod huffman;
pub mod inflate;
pub mod lz77;

pub use error::{Error, Result};
pub use inflate::decode;
