//! DEFLATE decompression (RFC 1951).
//!
//! Implements the INFLATE algorithm over a raw DEFLATE bit stream: no
//! gzip/zlib wrapper, no checksum. Stored (uncompressed) blocks are
//! deliberately not supported and surface as an error.

use std::sync::LazyLock;

use crate::bit_reader::{BitRead, BitReader};
use crate::error::{Error, Result};
use crate::huffman::PrefixCodeTree;
use crate::lz77::{SlideWindow, WINDOW_SIZE};

/// Length code base values (codes 257-285).
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (codes 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order of code length codes for dynamic Huffman. Rarely-used length
/// classes trail so a header can omit trailing zeros from its count.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// End of block symbol.
const END_OF_BLOCK: u16 = 256;

/// Number of literal/length codes a dynamic header may declare.
const MAX_LITLEN_CODES: usize = 286;

/// Number of distance codes a dynamic header may declare.
const MAX_DIST_CODES: usize = 32;

/// The fixed literal/length tree is the same for every fixed block in
/// every stream, so it is built once and shared.
static FIXED_LITERAL_TREE: LazyLock<PrefixCodeTree> = LazyLock::new(fixed_literal_tree);

/// Build the fixed literal/length tree per RFC 1951 section 3.2.6: the
/// canonical construction over these lengths reproduces the 8-bit codes
/// from 0x30, 9-bit from 0x190, 7-bit from 0x00 and 8-bit from 0xC0.
fn fixed_literal_tree() -> PrefixCodeTree {
    let mut lengths = [0u8; 288];
    // Codes 0-143: 8 bits
    for len in lengths.iter_mut().take(144) {
        *len = 8;
    }
    // Codes 144-255: 9 bits
    for len in lengths.iter_mut().take(256).skip(144) {
        *len = 9;
    }
    // Codes 256-279: 7 bits
    for len in lengths.iter_mut().take(280).skip(256) {
        *len = 7;
    }
    // Codes 280-287: 8 bits
    for len in lengths.iter_mut().take(288).skip(280) {
        *len = 8;
    }
    PrefixCodeTree::from_lengths(&lengths)
}

/// Where a block's distance codes come from.
enum DistanceCodes<'a> {
    /// Fixed blocks store the distance code as a raw 5-bit field packed
    /// MSB-first, the one place RFC 1951 flips the bit order.
    Fixed,
    /// Dynamic blocks Huffman-code distances with a per-block tree.
    Tree(&'a PrefixCodeTree),
}

impl DistanceCodes<'_> {
    /// Read the next distance code, or `None` once the stream has no
    /// more decodable symbols.
    fn next_code<S: BitRead>(&self, reader: &mut S) -> Option<u16> {
        match self {
            DistanceCodes::Fixed => reader.read_code_bits(5).ok().map(|v| v as u16),
            DistanceCodes::Tree(tree) => tree.decode(reader),
        }
    }
}

/// Decode a raw DEFLATE stream into the original byte sequence.
///
/// Returns the fully decoded output, or the first fatal error: stored
/// blocks ([`Error::UnsupportedBlockType`]), the reserved block type 3
/// ([`Error::InvalidBlockType`]), and malformed dynamic headers
/// ([`Error::SymbolDecodeFailure`]) all abort the call with no partial
/// output.
///
/// One deliberate leniency: a block body whose readable symbols end
/// without an end-of-block marker is treated as end of data, not as a
/// format violation, and everything decoded up to that point is returned.
///
/// # Example
///
/// ```rust
/// let data = b"\x15\xC5\x41\x11\x00\x00\x00\x01\xC1\x6C\x87\x04\xFA\x87\x31\x5E\x8B\x8A\xC9\x19";
/// let decoded = unflate::decode(data).unwrap();
/// assert_eq!(decoded, b"ABRACADABRA");
/// ```
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let mut window = SlideWindow::new(WINDOW_SIZE);
    let mut output = Vec::new();

    while !reader.is_eof() {
        let bfinal = reader.read_bits(1)?;
        let btype = reader.read_bits(2)?;

        match btype {
            0 => return Err(Error::UnsupportedBlockType),
            1 => inflate_fixed(&mut reader, &mut window, &mut output)?,
            2 => inflate_dynamic(&mut reader, &mut window, &mut output)?,
            _ => return Err(Error::InvalidBlockType),
        }

        if bfinal == 1 {
            break;
        }
    }

    Ok(output)
}

/// Inflate a block with fixed Huffman codes.
fn inflate_fixed<S: BitRead>(
    reader: &mut S,
    window: &mut SlideWindow,
    output: &mut Vec<u8>,
) -> Result<()> {
    inflate_block(reader, window, output, &FIXED_LITERAL_TREE, DistanceCodes::Fixed)
}

/// Inflate a block with dynamic Huffman codes.
fn inflate_dynamic<S: BitRead>(
    reader: &mut S,
    window: &mut SlideWindow,
    output: &mut Vec<u8>,
) -> Result<()> {
    let (literal_tree, distance_tree) = read_dynamic_trees(reader)?;
    inflate_block(
        reader,
        window,
        output,
        &literal_tree,
        DistanceCodes::Tree(&distance_tree),
    )
}

/// Read a bit field inside a dynamic block header. Truncation here is a
/// hard failure, unlike in the block body.
fn header_bits<S: BitRead>(reader: &mut S, n: u8) -> Result<u32> {
    reader.read_bits(n).map_err(|_| Error::SymbolDecodeFailure)
}

/// Parse a dynamic block header into its literal/length and distance
/// trees.
///
/// The header carries a third, temporary code: 3-bit lengths for the
/// 19-symbol code-length alphabet, stored in [`CODE_LENGTH_ORDER`]. That
/// tree then decodes the two real code-length arrays, with run-length
/// expansion (16 = repeat previous, 17/18 = runs of zero).
fn read_dynamic_trees<S: BitRead>(reader: &mut S) -> Result<(PrefixCodeTree, PrefixCodeTree)> {
    // HLIT: literal/length code count (257-286)
    let hlit = header_bits(reader, 5)? as usize + 257;
    // HDIST: distance code count (1-32)
    let hdist = header_bits(reader, 5)? as usize + 1;
    // HCLEN: code-length code count (4-19)
    let hclen = header_bits(reader, 4)? as usize + 4;

    if hlit > MAX_LITLEN_CODES {
        return Err(Error::SymbolDecodeFailure);
    }

    // Read the code-length code lengths and build their tree.
    let mut cl_lengths = [0u8; 19];
    for &index in CODE_LENGTH_ORDER.iter().take(hclen) {
        cl_lengths[index] = header_bits(reader, 3)? as u8;
    }
    let cl_tree = PrefixCodeTree::from_lengths(&cl_lengths);

    // Decode the two code-length arrays as one run-length coded sequence.
    let total = hlit + hdist;
    let mut lengths = [0u8; MAX_LITLEN_CODES + MAX_DIST_CODES];
    let mut i = 0;
    while i < total {
        let symbol = cl_tree.decode(reader).ok_or(Error::SymbolDecodeFailure)?;
        match symbol {
            0..=15 => {
                lengths[i] = symbol as u8;
                i += 1;
            }
            16 => {
                // Repeat previous length 3-6 times.
                if i == 0 {
                    return Err(Error::SymbolDecodeFailure);
                }
                let repeat = 3 + header_bits(reader, 2)? as usize;
                if i + repeat > total {
                    return Err(Error::SymbolDecodeFailure);
                }
                let previous = lengths[i - 1];
                for _ in 0..repeat {
                    lengths[i] = previous;
                    i += 1;
                }
            }
            17 => {
                // Repeat zero 3-10 times.
                let repeat = 3 + header_bits(reader, 3)? as usize;
                if i + repeat > total {
                    return Err(Error::SymbolDecodeFailure);
                }
                i += repeat;
            }
            18 => {
                // Repeat zero 11-138 times.
                let repeat = 11 + header_bits(reader, 7)? as usize;
                if i + repeat > total {
                    return Err(Error::SymbolDecodeFailure);
                }
                i += repeat;
            }
            _ => return Err(Error::SymbolDecodeFailure),
        }
    }

    let literal_tree = PrefixCodeTree::from_lengths(&lengths[..hlit]);
    let distance_tree = PrefixCodeTree::from_lengths(&lengths[hlit..total]);
    Ok((literal_tree, distance_tree))
}

/// Run the symbol decode loop shared by fixed and dynamic blocks.
///
/// Literals go to the output and the window; an end-of-block symbol ends
/// the block; length symbols resolve into a back-reference through the
/// window. When the stream runs out of decodable symbols the block ends
/// silently with whatever was produced, which truncated streams rely on.
fn inflate_block<S: BitRead>(
    reader: &mut S,
    window: &mut SlideWindow,
    output: &mut Vec<u8>,
    literal_tree: &PrefixCodeTree,
    distances: DistanceCodes<'_>,
) -> Result<()> {
    loop {
        let Some(symbol) = literal_tree.decode(reader) else {
            return Ok(());
        };

        match symbol {
            END_OF_BLOCK => return Ok(()),
            0..=255 => {
                output.push(symbol as u8);
                window.push(symbol as u8);
            }
            257..=285 => match copy_back_reference(reader, window, output, symbol, &distances) {
                // The stream ended inside the reference; treat it like
                // running out of symbols.
                Err(Error::UnexpectedEndOfStream) => return Ok(()),
                other => other?,
            },
            _ => return Err(Error::InvalidLengthCode(symbol)),
        }
    }
}

/// Resolve one back-reference and append the matched run to the output
/// and the window.
fn copy_back_reference<S: BitRead>(
    reader: &mut S,
    window: &mut SlideWindow,
    output: &mut Vec<u8>,
    symbol: u16,
    distances: &DistanceCodes<'_>,
) -> Result<()> {
    let length = read_length(reader, symbol)?;

    let Some(code) = distances.next_code(reader) else {
        return Err(Error::UnexpectedEndOfStream);
    };
    let distance = read_distance(reader, code)?;

    if distance > window.len() {
        return Err(Error::InvalidDistance {
            distance,
            available: window.len(),
        });
    }

    let run = window.pattern(length, distance);
    output.extend_from_slice(&run);
    window.extend(&run);
    Ok(())
}

/// Resolve a length symbol (257-285) into a match length.
fn read_length<S: BitRead>(reader: &mut S, symbol: u16) -> Result<usize> {
    debug_assert!((257..=285).contains(&symbol));
    let index = (symbol - 257) as usize;
    Ok(LENGTH_BASE[index] as usize + reader.read_bits(LENGTH_EXTRA[index])? as usize)
}

/// Resolve a distance code (0-29) into a match distance.
fn read_distance<S: BitRead>(reader: &mut S, code: u16) -> Result<usize> {
    if code as usize >= DISTANCE_BASE.len() {
        return Err(Error::InvalidDistanceCode(code));
    }
    let index = code as usize;
    Ok(DISTANCE_BASE[index] as usize + reader.read_bits(DISTANCE_EXTRA[index])? as usize)
}
