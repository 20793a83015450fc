//! Position-dependent field widths.
//!
//! Offsets and run lengths are written with the fewest bits that can hold
//! any legal value at the current position:
//!
//! - Plain blocks size the offset by how many bytes are already decoded.
//! - Chained blocks size it once for the whole `prev ++ block` dictionary.
//! - In both modes, once fewer than `block_size / 2` bytes remain (integer
//!   division, so odd sizes round the threshold down), the length field
//!   shrinks to fit the remaining space.
//!
//! Encoder and decoder both derive widths from here, so the schedule is never
//! transmitted.

use tinypack_core::clz::field_bits;

/// Offset and length field widths at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    /// Bits in the offset field.
    pub offset: u8,
    /// Bits in the stored `length - 1` field.
    pub length: u8,
}

impl FieldWidths {
    /// Widths at position `pos` of a plain block.
    pub fn plain(pos: usize, block_size: usize) -> Self {
        let offset = if pos <= 1 {
            0
        } else {
            field_bits((pos - 1) as u32)
        };
        Self::with_shrink(offset, pos, block_size)
    }

    /// Widths at position `pos` of a chained block following a `prev_len`-byte block.
    pub fn chained(prev_len: usize, pos: usize, block_size: usize) -> Self {
        let span = prev_len + block_size;
        let offset = field_bits(span.saturating_sub(1) as u32);
        Self::with_shrink(offset, pos, block_size)
    }

    fn with_shrink(offset: u8, pos: usize, block_size: usize) -> Self {
        let remaining = block_size - pos;
        let length = if remaining < block_size / 2 {
            if remaining > 1 {
                field_bits((remaining - 1) as u32)
            } else {
                0
            }
        } else {
            offset
        };
        Self { offset, length }
    }

    /// Longest run the length field can express.
    #[inline]
    pub fn max_run(&self) -> usize {
        1 << self.length
    }

    /// Bits taken by a back-reference, flag included.
    #[inline]
    pub fn reference_bits(&self) -> u32 {
        1 + self.offset as u32 + self.length as u32
    }
}
