//! MSB-first bit packing for TinyPack bit vectors.
//!
//! A TinyPack bit vector is a plain byte sequence read as one contiguous bit
//! string. Bits fill each byte from the most significant end; a field that
//! straddles a byte boundary leaves its high-order bits in the current byte
//! and carries the rest into the next one. There is no length header: the
//! decoder knows how many fields to read from the block size alone.
//!
//! Zero-width fields are legal and are a no-op on both sides. The adaptive
//! field-width schedule produces them at the start of a block, where there
//! is nothing to point back at.
//!
//! # Example
//!
//! ```
//! use tinypack_core::bitstream::{BitPacker, BitUnpacker};
//!
//! let mut packer = BitPacker::new();
//! packer.write(0b101, 3).unwrap();
//! packer.write(0x1FF, 9).unwrap();
//! assert_eq!(packer.len(), 2);
//! assert_eq!(packer.as_bytes(), &[0b1011_1111, 0b1111_0000]);
//!
//! let bytes = packer.into_vec();
//! let mut unpacker = BitUnpacker::new(&bytes);
//! assert_eq!(unpacker.read(3).unwrap(), 0b101);
//! assert_eq!(unpacker.read(9).unwrap(), 0x1FF);
//! ```

use crate::error::{Result, TinyPackError};

/// Widest field a single read or write may carry.
pub const MAX_FIELD_BITS: u8 = 32;

#[inline]
fn low_mask(count: u8) -> u32 {
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

/// MSB-first bit writer producing a TinyPack bit vector.
#[derive(Debug, Clone, Default)]
pub struct BitPacker {
    /// Bytes touched so far; the last one may be partially filled.
    output: Vec<u8>,
    /// Total bits written.
    bits_written: u64,
    /// Optional cap on `output.len()`.
    limit: Option<usize>,
}

impl BitPacker {
    /// Create an unbounded packer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a packer that refuses to grow past `max_bytes`.
    pub fn with_limit(max_bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(max_bytes),
            bits_written: 0,
            limit: Some(max_bytes),
        }
    }

    /// Byte limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Write the low `count` bits of `value`, most significant bit first.
    ///
    /// Fails with [`TinyPackError::Overflow`] without touching the packer if
    /// the write would exceed the byte limit. Callers must treat an overflow
    /// as the end of that encode attempt.
    pub fn write(&mut self, value: u32, count: u8) -> Result<()> {
        if count > MAX_FIELD_BITS {
            return Err(TinyPackError::InvalidBitWidth(count));
        }
        if count == 0 {
            return Ok(());
        }

        if let Some(limit) = self.limit {
            let needed = (self.bits_written + count as u64).div_ceil(8);
            if needed > limit as u64 {
                return Err(TinyPackError::overflow(limit));
            }
        }

        let value = value & low_mask(count);
        let mut pending = count;
        while pending > 0 {
            let bit_offset = (self.bits_written % 8) as u8;
            if bit_offset == 0 {
                self.output.push(0);
            }
            let space = 8 - bit_offset;
            let take = space.min(pending);
            let chunk = ((value >> (pending - take)) & low_mask(take)) as u8;
            let last = self.output.len() - 1;
            self.output[last] |= chunk << (space - take);

            pending -= take;
            self.bits_written += take as u64;
        }

        Ok(())
    }

    /// Write a single flag bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write(bit as u32, 1)
    }

    /// Number of bytes touched, counting a partially filled trailing byte.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.bits_written == 0
    }

    /// Total bits written.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// The packed bytes so far. Unused low bits of the last byte are zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Consume the packer and return the bit vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.output
    }
}

/// MSB-first bit reader over a TinyPack bit vector.
#[derive(Debug, Clone)]
pub struct BitUnpacker<'a> {
    data: &'a [u8],
    /// Next bit to read.
    bit_pos: u64,
}

impl<'a> BitUnpacker<'a> {
    /// Create an unpacker positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Read a `count`-bit field.
    ///
    /// Reading past the end of the vector means encoder and decoder disagree
    /// on the field schedule; it fails with [`TinyPackError::UnexpectedEof`].
    pub fn read(&mut self, count: u8) -> Result<u32> {
        if count > MAX_FIELD_BITS {
            return Err(TinyPackError::InvalidBitWidth(count));
        }
        if count == 0 {
            return Ok(0);
        }
        if self.bit_pos + count as u64 > self.total_bits() {
            return Err(TinyPackError::unexpected_eof(self.bit_pos));
        }

        let mut value = 0u32;
        let mut pending = count;
        while pending > 0 {
            let byte = self.data[(self.bit_pos / 8) as usize];
            let bit_offset = (self.bit_pos % 8) as u8;
            let available = 8 - bit_offset;
            let take = available.min(pending);
            let chunk = (byte >> (available - take)) as u32 & low_mask(take);
            value = (value << take) | chunk;

            pending -= take;
            self.bit_pos += take as u64;
        }

        Ok(value)
    }

    /// Read a single flag bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Count zero bits up to and including the terminating one bit.
    ///
    /// This is the streaming form of a leading-zero count used by unary
    /// prefixes. Returns `None` once more than `max_zeros` zeros have been
    /// seen, leaving the cursor just past the last zero consumed.
    pub fn read_unary(&mut self, max_zeros: u32) -> Result<Option<u32>> {
        let mut zeros = 0u32;
        while !self.read_bit()? {
            zeros += 1;
            if zeros > max_zeros {
                return Ok(None);
            }
        }
        Ok(Some(zeros))
    }

    /// Total bits consumed.
    pub fn bits_read(&self) -> u64 {
        self.bit_pos
    }

    /// Bits left before the end of the vector, padding included.
    pub fn bits_remaining(&self) -> u64 {
        self.total_bits() - self.bit_pos
    }

    fn total_bits(&self) -> u64 {
        self.data.len() as u64 * 8
    }
}
