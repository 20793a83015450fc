//! Block decoder (decompression).
//!
//! The decoder reads items until the configured block length is reached;
//! the bit vector carries no length of its own. Every back-reference is
//! bounds-checked against the dictionary and the space left in the block,
//! so a corrupt or mismatched vector fails instead of producing garbage.

use tinypack_core::bitstream::BitUnpacker;
use tinypack_core::error::{Result, TinyPackError};
use tracing::{debug, trace};

use crate::codebook::Codebook;
use crate::config::TinyPackConfig;
use crate::schedule::FieldWidths;

/// Decoder for plain and chained blocks.
#[derive(Debug)]
pub struct LzssDecoder {
    config: TinyPackConfig,
    codebook: Codebook,
    /// Previous chained block; empty at the start of a chain.
    prev: Vec<u8>,
}

impl LzssDecoder {
    /// Create a decoder with an empty chain window.
    pub fn new(config: TinyPackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codebook: Codebook::new(config.codebook)?,
            prev: Vec::with_capacity(config.block_size),
        })
    }

    /// The decoder's configuration.
    pub fn config(&self) -> &TinyPackConfig {
        &self.config
    }

    /// The block the next chained call may reference.
    pub fn previous_block(&self) -> &[u8] {
        &self.prev
    }

    /// Start a new chain.
    pub fn reset(&mut self) {
        debug!("resetting chained decoder");
        self.prev.clear();
    }

    /// Decode one independent block.
    ///
    /// Offsets index the bytes decoded so far in this block. The chain
    /// window is neither used nor updated.
    pub fn expand(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.config.block_size;
        decode_block(&mut self.codebook, data, &[], block_size, |pos| {
            FieldWidths::plain(pos, block_size)
        })
    }

    /// Decode the next block of a chain.
    ///
    /// Offsets index `prev ++ decoded`. On success the decoded block becomes
    /// the window for the next call; on error the window is unchanged.
    pub fn chain_expand(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.config.block_size;
        let prev_len = self.prev.len();
        let block = decode_block(&mut self.codebook, data, &self.prev, block_size, |pos| {
            FieldWidths::chained(prev_len, pos, block_size)
        })?;

        self.prev.clear();
        self.prev.extend_from_slice(&block);
        Ok(block)
    }
}

fn decode_block(
    codebook: &mut Codebook,
    data: &[u8],
    prev: &[u8],
    block_size: usize,
    widths_at: impl Fn(usize) -> FieldWidths,
) -> Result<Vec<u8>> {
    let mut reader = BitUnpacker::new(data);
    let mut decoded = Vec::with_capacity(block_size);
    codebook.init();

    while decoded.len() < block_size {
        let pos = decoded.len();
        let widths = widths_at(pos);

        if !reader.read_bit()? {
            let byte = codebook.decode_next(&mut reader)?;
            trace!(pos, byte, "literal");
            decoded.push(byte);
            continue;
        }

        let offset = reader.read(widths.offset)? as usize;
        let length = reader.read(widths.length)? as usize + 1;
        trace!(pos, offset, length, "reference");

        let remaining = block_size - pos;
        if length > remaining {
            return Err(TinyPackError::length_overrun(length, remaining));
        }
        let dictionary_len = prev.len() + pos;
        if offset >= dictionary_len {
            return Err(TinyPackError::invalid_reference(offset, dictionary_len));
        }

        // Byte at a time: a run may read bytes it has just written.
        for idx in offset..offset + length {
            let byte = if idx < prev.len() {
                prev[idx]
            } else {
                decoded[idx - prev.len()]
            };
            decoded.push(byte);
        }
    }

    debug!(
        bits = reader.bits_read(),
        prev_len = prev.len(),
        "expanded block"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodebookKind;
    use tinypack_core::bitstream::BitPacker;

    #[test]
    fn test_expand_hand_built_vector() {
        // Block of 8: literal 'A', literal 'B', then two runs from offset 0.
        // The second run overlaps its own output.
        let mut packer = BitPacker::new();
        packer.write(0, 1).unwrap();
        packer.write(b'A' as u32, 8).unwrap();
        packer.write(0, 1).unwrap();
        packer.write(b'B' as u32, 8).unwrap();
        // pos 2: offset 1 bit, length 1 bit -> run of at most 2.
        packer.write(1, 1).unwrap();
        packer.write(0, 1).unwrap();
        packer.write(1, 1).unwrap();
        // pos 4: offset 2 bits, remaining 4 -> length 2 bits.
        packer.write(1, 1).unwrap();
        packer.write(0, 2).unwrap();
        packer.write(3, 2).unwrap();
        let bytes = packer.into_vec();

        let mut decoder = LzssDecoder::new(TinyPackConfig::new(8)).unwrap();
        assert_eq!(decoder.expand(&bytes).unwrap(), b"ABABABAB");
        assert!(decoder.previous_block().is_empty());
    }

    #[test]
    fn test_expand_rejects_forward_reference() {
        let mut packer = BitPacker::new();
        packer.write(0, 1).unwrap();
        packer.write(7, 8).unwrap();
        packer.write(0, 1).unwrap();
        packer.write(7, 8).unwrap();
        packer.write(0, 1).unwrap();
        packer.write(7, 8).unwrap();
        // pos 3: 2-bit offset 3 points at the byte being decoded.
        packer.write(1, 1).unwrap();
        packer.write(3, 2).unwrap();
        packer.write(0, 2).unwrap();
        let bytes = packer.into_vec();

        let mut decoder = LzssDecoder::new(TinyPackConfig::new(8)).unwrap();
        assert_eq!(
            decoder.expand(&bytes),
            Err(TinyPackError::InvalidReference {
                offset: 3,
                dictionary_len: 3
            })
        );
    }

    #[test]
    fn test_expand_rejects_overrun() {
        // Block of 4 chained: 2-bit fields. Literal, then a run of 4.
        let mut packer = BitPacker::new();
        packer.write(0, 1).unwrap();
        packer.write(1, 8).unwrap();
        packer.write(1, 1).unwrap();
        packer.write(0, 2).unwrap();
        packer.write(3, 2).unwrap();
        let bytes = packer.into_vec();

        let mut decoder = LzssDecoder::new(TinyPackConfig::new(4)).unwrap();
        assert_eq!(
            decoder.chain_expand(&bytes),
            Err(TinyPackError::LengthOverrun {
                length: 4,
                remaining: 3
            })
        );
        assert!(decoder.previous_block().is_empty());
    }

    #[test]
    fn test_expand_truncated() {
        let mut decoder = LzssDecoder::new(TinyPackConfig::new(8)).unwrap();
        assert!(matches!(
            decoder.expand(&[0x20]),
            Err(TinyPackError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_chain_reads_previous_block() {
        let mut decoder = LzssDecoder::new(TinyPackConfig::new(4)).unwrap();

        // First block: four literals, 2-bit fields unused.
        let mut packer = BitPacker::new();
        for byte in *b"WXYZ" {
            packer.write(0, 1).unwrap();
            packer.write(byte as u32, 8).unwrap();
        }
        assert_eq!(decoder.chain_expand(packer.as_bytes()).unwrap(), b"WXYZ");

        // Second block: dictionary is 8 bytes -> 3-bit offset and length.
        // One run copying prev[1..4] then the first decoded byte.
        let mut packer = BitPacker::new();
        packer.write(1, 1).unwrap();
        packer.write(1, 3).unwrap();
        packer.write(3, 3).unwrap();
        assert_eq!(decoder.chain_expand(packer.as_bytes()).unwrap(), b"XYZX");
        assert_eq!(decoder.previous_block(), b"XYZX");

        decoder.reset();
        assert!(decoder.previous_block().is_empty());
    }

    #[test]
    fn test_golomb_literals() {
        let config = TinyPackConfig::new(3).with_codebook(CodebookKind::GOLOMB);
        let mut packer = BitPacker::new();
        // Three literal zeros: flag + "100" each.
        for _ in 0..3 {
            packer.write(0, 1).unwrap();
            packer.write(0b100, 3).unwrap();
        }
        let mut decoder = LzssDecoder::new(config).unwrap();
        assert_eq!(decoder.expand(packer.as_bytes()).unwrap(), vec![0, 0, 0]);
    }
}
