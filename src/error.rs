//! Error types for the unflate library.

use std::fmt;

/// Result type alias for unflate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a DEFLATE stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stored (uncompressed) block was encountered. Stored blocks are
    /// deliberately unimplemented, so this is permanent rather than a
    /// corruption signal.
    UnsupportedBlockType,
    /// The reserved block type 3 was encountered; the input is corrupt
    /// or not a DEFLATE stream.
    InvalidBlockType,
    /// A dynamic block header could not be parsed: a code-length tree
    /// lookup hit a dead path, the stream ended inside the header, or a
    /// run-length repeat overran the code-length array.
    SymbolDecodeFailure,
    /// The stream ended in the middle of a required field.
    UnexpectedEndOfStream,
    /// A literal/length symbol outside the valid range (286 or 287) was
    /// decoded from the stream.
    InvalidLengthCode(u16),
    /// A distance code outside 0-29 was read from the stream.
    InvalidDistanceCode(u16),
    /// A back-reference reaches behind the start of the decoded output.
    InvalidDistance {
        /// Distance requested by the back-reference.
        distance: usize,
        /// Bytes of history actually available.
        available: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedBlockType => {
                write!(f, "Stored (uncompressed) blocks are not supported")
            }
            Error::InvalidBlockType => {
                write!(f, "Reserved block type 3 encountered")
            }
            Error::SymbolDecodeFailure => {
                write!(f, "Failed to decode a symbol in a dynamic block header")
            }
            Error::UnexpectedEndOfStream => {
                write!(f, "Unexpected end of stream")
            }
            Error::InvalidLengthCode(code) => {
                write!(f, "Invalid literal/length code {}: must be below 286", code)
            }
            Error::InvalidDistanceCode(code) => {
                write!(f, "Invalid distance code {}: must be below 30", code)
            }
            Error::InvalidDistance {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Back-reference distance {} exceeds {} bytes of history",
                    distance, available
                )
            }
        }
    }
}

impl std::error::Error for Error {}
