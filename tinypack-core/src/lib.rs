//! # TinyPack Core
//!
//! Core components for the TinyPack block codec.
//!
//! - [`bitstream`]: MSB-first bit packer and unpacker for variable-width fields
//! - [`clz`]: Leading-zero counting used to size adaptive fields
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L2: Codec (tinypack-lzss)                               │
//! │     LZSS plain/chained, LZRW match finder, codebooks    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitPacker/BitUnpacker, leading-zero count, errors   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tinypack_core::{BitPacker, BitUnpacker, field_bits};
//!
//! // A field able to hold any offset below 100 needs 7 bits.
//! let width = field_bits(99);
//! assert_eq!(width, 7);
//!
//! let mut packer = BitPacker::new();
//! packer.write(42, width).unwrap();
//! let bytes = packer.into_vec();
//!
//! let mut unpacker = BitUnpacker::new(&bytes);
//! assert_eq!(unpacker.read(width).unwrap(), 42);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod clz;
pub mod error;

pub use bitstream::{BitPacker, BitUnpacker};
pub use clz::{clz, clz8, field_bits};
pub use error::{Result, TinyPackError};
