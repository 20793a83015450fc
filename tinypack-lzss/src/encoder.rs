//! Block encoders.
//!
//! [`LzrwEncoder`] is the production encoder: chained blocks, one hash probe
//! per position. [`LzssEncoder`] codes independent blocks with an exhaustive
//! longest-match search and is the counterpart of [`LzssDecoder::expand`].
//!
//! [`LzssDecoder::expand`]: crate::decoder::LzssDecoder::expand

use tinypack_core::error::{Result, TinyPackError};
use tracing::debug;

use crate::codebook::Codebook;
use crate::config::TinyPackConfig;
use crate::item::{CodedItem, emit_block};
use crate::lzrw::{LzrwTable, MIN_MATCH};
use crate::schedule::FieldWidths;

fn check_block(config: &TinyPackConfig, block: &[u8]) -> Result<()> {
    if block.len() != config.block_size {
        return Err(TinyPackError::invalid_block_length(
            config.block_size,
            block.len(),
        ));
    }
    Ok(())
}

/// Encoder for independent (plain) blocks.
#[derive(Debug)]
pub struct LzssEncoder {
    config: TinyPackConfig,
    codebook: Codebook,
    items: Vec<CodedItem>,
}

impl LzssEncoder {
    /// Create a plain-block encoder.
    pub fn new(config: TinyPackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codebook: Codebook::new(config.codebook)?,
            items: Vec::new(),
        })
    }

    /// The encoder's configuration.
    pub fn config(&self) -> &TinyPackConfig {
        &self.config
    }

    /// Items chosen for the most recent block.
    pub fn last_items(&self) -> &[CodedItem] {
        &self.items
    }

    /// Compress one block of exactly `block_size` bytes.
    ///
    /// # Algorithm
    ///
    /// Greedy parse. At every position, every earlier start is tried and the
    /// longest run wins, bounded by the bytes left and by the length field
    /// width at that position. Runs shorter than three bytes become literals.
    pub fn compress(&mut self, block: &[u8]) -> Result<Vec<u8>> {
        check_block(&self.config, block)?;
        let block_size = self.config.block_size;

        self.items.clear();
        let mut pos = 0;
        while pos < block_size {
            let widths = FieldWidths::plain(pos, block_size);
            let max_len = (block_size - pos).min(widths.max_run());
            let item = match longest_match(block, pos, max_len) {
                Some((offset, length)) => CodedItem::Reference { offset, length },
                None => CodedItem::Literal(block[pos]),
            };
            pos += item.span();
            self.items.push(item);
        }

        let packer = emit_block(&mut self.codebook, &self.items, |pos| {
            FieldWidths::plain(pos, block_size)
        })?;
        debug!(
            items = self.items.len(),
            bits = packer.bits_written(),
            "compressed plain block"
        );
        Ok(packer.into_vec())
    }
}

/// Exhaustive search for the longest earlier run matching `block[pos..]`.
fn longest_match(block: &[u8], pos: usize, max_len: usize) -> Option<(usize, usize)> {
    if max_len < MIN_MATCH {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for start in 0..pos {
        let mut length = 0;
        while length < max_len && block[start + length] == block[pos + length] {
            length += 1;
        }
        if length >= MIN_MATCH && best.is_none_or(|(_, best_len)| length > best_len) {
            best = Some((start, length));
            if length == max_len {
                break;
            }
        }
    }
    best
}

/// Chained encoder: every block may reference the block before it.
///
/// Holds the previous block and the LZRW table across calls. Pair it with
/// an [`LzssDecoder`](crate::decoder::LzssDecoder) that sees the same block
/// sequence through [`chain_expand`](crate::decoder::LzssDecoder::chain_expand).
#[derive(Debug)]
pub struct LzrwEncoder {
    config: TinyPackConfig,
    codebook: Codebook,
    table: LzrwTable,
    /// Previous block; empty at the start of a chain.
    prev: Vec<u8>,
    /// Length of the block before `prev`.
    prev_prev_len: usize,
    items: Vec<CodedItem>,
}

impl LzrwEncoder {
    /// Create a chained encoder with an empty window.
    pub fn new(config: TinyPackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codebook: Codebook::new(config.codebook)?,
            table: LzrwTable::new(config.lzrw_table_size),
            prev: Vec::with_capacity(config.block_size),
            prev_prev_len: 0,
            items: Vec::new(),
        })
    }

    /// The encoder's configuration.
    pub fn config(&self) -> &TinyPackConfig {
        &self.config
    }

    /// Items chosen for the most recent block.
    pub fn last_items(&self) -> &[CodedItem] {
        &self.items
    }

    /// The block the next call may reference.
    pub fn previous_block(&self) -> &[u8] {
        &self.prev
    }

    /// Start a new chain.
    pub fn reset(&mut self) {
        debug!("resetting chained encoder");
        self.table.clear();
        self.prev.clear();
        self.prev_prev_len = 0;
        self.items.clear();
    }

    /// Compress the next block of the chain.
    ///
    /// A block of the wrong length is rejected before any state changes.
    pub fn chain_compress(&mut self, block: &[u8]) -> Result<Vec<u8>> {
        check_block(&self.config, block)?;
        let block_size = block.len();
        let prev_len = self.prev.len();

        self.table.age(self.prev_prev_len);

        self.items.clear();
        let mut pos = 0;
        while pos < block_size {
            let widths = FieldWidths::chained(prev_len, pos, block_size);
            let max_len = (block_size - pos).min(widths.max_run());
            let item = match self.table.find_match(&self.prev, block, pos, max_len) {
                Some((offset, length)) => CodedItem::Reference { offset, length },
                None => CodedItem::Literal(block[pos]),
            };
            pos += item.span();
            self.items.push(item);
        }

        let packer = emit_block(&mut self.codebook, &self.items, |pos| {
            FieldWidths::chained(prev_len, pos, block_size)
        })?;
        debug!(
            items = self.items.len(),
            bits = packer.bits_written(),
            prev_len,
            "compressed chained block"
        );

        self.prev_prev_len = prev_len;
        self.prev.clear();
        self.prev.extend_from_slice(block);
        Ok(packer.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodebookKind;

    #[test]
    fn test_rejects_wrong_length() {
        let mut encoder = LzrwEncoder::new(TinyPackConfig::new(8)).unwrap();
        assert_eq!(
            encoder.chain_compress(&[1, 2, 3]),
            Err(TinyPackError::InvalidBlockLength {
                expected: 8,
                found: 3
            })
        );
        assert!(encoder.previous_block().is_empty());

        let mut encoder = LzssEncoder::new(TinyPackConfig::new(8)).unwrap();
        assert!(encoder.compress(&[0; 9]).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(LzrwEncoder::new(TinyPackConfig::new(0)).is_err());
        assert!(LzssEncoder::new(TinyPackConfig::new(8).with_table_size(0)).is_err());
    }

    #[test]
    fn test_chained_items_for_run() {
        let mut encoder = LzrwEncoder::new(TinyPackConfig::new(8)).unwrap();
        let bits = encoder
            .chain_compress(&[65, 65, 65, 65, 66, 67, 68, 69])
            .unwrap();
        assert_eq!(
            encoder.last_items(),
            &[
                CodedItem::Literal(65),
                CodedItem::Reference {
                    offset: 0,
                    length: 3
                },
                CodedItem::Literal(66),
                CodedItem::Literal(67),
                CodedItem::Literal(68),
                CodedItem::Literal(69),
            ]
        );
        // 0 01000001 | 1 000 010 | four 9-bit literals = 52 bits.
        assert_eq!(bits, vec![0x20, 0xC2, 0x21, 0x10, 0xC8, 0x84, 0x50]);
    }

    #[test]
    fn test_odd_block_bit_layout() {
        let mut encoder = LzrwEncoder::new(TinyPackConfig::new(9)).unwrap();
        let bits = encoder
            .chain_compress(&[1, 2, 3, 4, 5, 1, 2, 3, 4])
            .unwrap();
        assert_eq!(
            encoder.last_items().last(),
            Some(&CodedItem::Reference {
                offset: 0,
                length: 4
            })
        );
        // Five 9-bit literals, then 1 | 0000 | 0011: the length field keeps
        // its full 4 bits with 4 of 9 bytes left.
        assert_eq!(bits, vec![0, 128, 128, 96, 64, 44, 12]);
    }

    #[test]
    fn test_plain_search_prefers_longest() {
        let mut encoder = LzssEncoder::new(TinyPackConfig::new(16)).unwrap();
        encoder.compress(b"abcXabcdYabcdefZ").unwrap();
        let refs: Vec<_> = encoder
            .last_items()
            .iter()
            .filter(|item| matches!(item, CodedItem::Reference { .. }))
            .copied()
            .collect();
        assert_eq!(
            refs,
            vec![
                CodedItem::Reference {
                    offset: 0,
                    length: 3
                },
                CodedItem::Reference {
                    offset: 4,
                    length: 4
                },
            ]
        );
    }

    #[test]
    fn test_plain_items_cover_block() {
        let block: Vec<u8> = (0..126u32).map(|i| (i % 7) as u8).collect();
        let mut encoder = LzssEncoder::new(TinyPackConfig::TINYOS).unwrap();
        encoder.compress(&block).unwrap();
        let covered: usize = encoder.last_items().iter().map(CodedItem::span).sum();
        assert_eq!(covered, 126);
        assert!(encoder.last_items().len() < 40);
    }

    #[test]
    fn test_runs_never_exceed_remaining() {
        let config = TinyPackConfig::new(40).with_codebook(CodebookKind::GOLOMB);
        let mut encoder = LzrwEncoder::new(config).unwrap();
        for seed in 0..6u8 {
            let block: Vec<u8> = (0..40u8).map(|i| (i / 4).wrapping_add(seed)).collect();
            encoder.chain_compress(&block).unwrap();
            let mut pos = 0;
            for item in encoder.last_items() {
                let widths = FieldWidths::chained(if seed == 0 { 0 } else { 40 }, pos, 40);
                if let CodedItem::Reference { offset, length } = *item {
                    assert!(length <= 40 - pos);
                    assert!(length <= widths.max_run());
                    assert!(offset < 1 << widths.offset);
                }
                pos += item.span();
            }
        }
    }

    #[test]
    fn test_reset_forgets_window() {
        let block = [9u8; 8];
        let mut encoder = LzrwEncoder::new(TinyPackConfig::new(8)).unwrap();
        let first = encoder.chain_compress(&block).unwrap();
        let second = encoder.chain_compress(&block).unwrap();
        assert_ne!(first, second);

        encoder.reset();
        assert!(encoder.previous_block().is_empty());
        assert_eq!(encoder.chain_compress(&block).unwrap(), first);
    }
}
