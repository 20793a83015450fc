//! Coded items and their bit-level emission.

use tinypack_core::bitstream::BitPacker;
use tinypack_core::error::Result;
use tracing::trace;

use crate::codebook::Codebook;
use crate::schedule::FieldWidths;

/// One step of an LZSS block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedItem {
    /// A literal byte, coded through the codebook.
    Literal(u8),
    /// Copy `length` bytes starting at dictionary position `offset`.
    Reference {
        /// Dictionary position of the first copied byte.
        offset: usize,
        /// Number of bytes copied (written as `length - 1`).
        length: usize,
    },
}

impl CodedItem {
    /// Number of block bytes this item produces.
    pub fn span(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Reference { length, .. } => *length,
        }
    }
}

/// Write `items` as one block, asking `widths_at` for the field widths at
/// every item's starting position.
pub(crate) fn emit_block(
    codebook: &mut Codebook,
    items: &[CodedItem],
    mut widths_at: impl FnMut(usize) -> FieldWidths,
) -> Result<BitPacker> {
    let mut packer = BitPacker::new();
    codebook.init();

    let mut pos = 0usize;
    for item in items {
        match *item {
            CodedItem::Literal(byte) => {
                trace!(pos, byte, "literal");
                packer.write_bit(false)?;
                codebook.encode_next(&mut packer, byte)?;
            }
            CodedItem::Reference { offset, length } => {
                let widths = widths_at(pos);
                trace!(pos, offset, length, "reference");
                debug_assert!((1..=widths.max_run()).contains(&length));
                debug_assert!(offset < 1 << widths.offset);
                packer.write_bit(true)?;
                packer.write(offset as u32, widths.offset)?;
                packer.write((length - 1) as u32, widths.length)?;
            }
        }
        pos += item.span();
    }

    Ok(packer)
}
