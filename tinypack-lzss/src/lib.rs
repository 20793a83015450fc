//! # TinyPack-LZSS: Bit-Exact Block Compression
//!
//! This crate compresses small fixed-size blocks (pixel rows, sensor frames)
//! where every output bit counts.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Adaptive field widths**: offsets and run lengths take only as many
//!   bits as the current position can need
//! - **Chained blocks**: each block may reference the one before it, giving a
//!   sliding window with constant memory
//! - **LZRW matching**: one hash probe per position on the encoder side
//! - **Adaptive literals**: optional exponential-Golomb codebook whose ranks
//!   follow symbol frequency
//!
//! ## Format
//!
//! A block is a sequence of items, each introduced by one flag bit:
//!
//! - `0` + literal: one byte, coded by the configured [`Codebook`]
//! - `1` + offset + `length - 1`: copy `length` bytes from the dictionary
//!
//! Field widths follow a schedule both sides derive from the position in
//! the block (see [`FieldWidths`]). There is no header and no terminator;
//! the decoder stops after `block_size` bytes.
//!
//! ## Example
//!
//! ```rust
//! use tinypack_lzss::{LzrwEncoder, LzssDecoder, TinyPackConfig};
//!
//! let config = TinyPackConfig::new(16);
//! let mut encoder = LzrwEncoder::new(config).unwrap();
//! let mut decoder = LzssDecoder::new(config).unwrap();
//!
//! let rows = [b"row-0 row-0 row0", b"row-1 row-1 row1"];
//! for row in rows {
//!     let packed = encoder.chain_compress(row).unwrap();
//!     assert_eq!(decoder.chain_expand(&packed).unwrap(), row);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod codebook;
mod config;
mod decoder;
mod encoder;
mod item;
mod lzrw;
mod schedule;

pub use codebook::{Codebook, GolombCodebook};
pub use config::{CodebookKind, DEFAULT_TABLE_SIZE, MAX_BLOCK_SIZE, TinyPackConfig};
pub use decoder::LzssDecoder;
pub use encoder::{LzrwEncoder, LzssEncoder};
pub use item::CodedItem;
pub use lzrw::{LzrwTable, MIN_MATCH};
pub use schedule::FieldWidths;
pub use tinypack_core::{BitPacker, BitUnpacker, Result, TinyPackError};

/// Compress one independent block.
///
/// # Example
///
/// ```rust
/// use tinypack_lzss::{compress_block, expand_block, TinyPackConfig};
///
/// let config = TinyPackConfig::new(12);
/// let block = b"abcabcabcabc";
/// let packed = compress_block(block, config).unwrap();
/// assert!(packed.len() < block.len());
/// assert_eq!(expand_block(&packed, config).unwrap(), block);
/// ```
pub fn compress_block(block: &[u8], config: TinyPackConfig) -> Result<Vec<u8>> {
    LzssEncoder::new(config)?.compress(block)
}

/// Expand one independent block.
pub fn expand_block(data: &[u8], config: TinyPackConfig) -> Result<Vec<u8>> {
    LzssDecoder::new(config)?.expand(data)
}

/// Compress a sequence of blocks as one chain.
///
/// # Example
///
/// ```rust
/// use tinypack_lzss::{compress_chain, expand_chain, TinyPackConfig};
///
/// let config = TinyPackConfig::TINYOS;
/// let rows: Vec<Vec<u8>> = (0..4u8).map(|r| vec![r; 126]).collect();
/// let packed = compress_chain(&rows, config).unwrap();
/// assert_eq!(expand_chain(&packed, config).unwrap(), rows);
/// ```
pub fn compress_chain<B: AsRef<[u8]>>(
    blocks: &[B],
    config: TinyPackConfig,
) -> Result<Vec<Vec<u8>>> {
    let mut encoder = LzrwEncoder::new(config)?;
    blocks
        .iter()
        .map(|block| encoder.chain_compress(block.as_ref()))
        .collect()
}

/// Expand a sequence of bit vectors produced by [`compress_chain`].
pub fn expand_chain<B: AsRef<[u8]>>(
    vectors: &[B],
    config: TinyPackConfig,
) -> Result<Vec<Vec<u8>>> {
    let mut decoder = LzssDecoder::new(config)?;
    vectors
        .iter()
        .map(|data| decoder.chain_expand(data.as_ref()))
        .collect()
}
