//! Literal codebooks.
//!
//! A codebook turns one literal byte into bits and back. Two variants exist:
//!
//! - [`Codebook::Literal`] writes the byte as a raw 8-bit field.
//! - [`Codebook::AdaptiveGolomb`] keeps a rank for every symbol and writes
//!   the rank as an order-`k` exponential-Golomb code. After each symbol
//!   the rank is halved by swapping it with the symbol at `rank / 2`, so
//!   frequent bytes drift toward the short codes.
//!
//! Encoder and decoder apply the same rank update after every symbol. If
//! they ever disagree the rest of the stream is unreadable, so the update is
//! one shared function used by both directions.

use tinypack_core::bitstream::{BitPacker, BitUnpacker};
use tinypack_core::clz::{clz, field_bits};
use tinypack_core::error::{Result, TinyPackError};

use crate::config::{CodebookKind, MAX_GOLOMB_ORDER};

/// Number of literal symbols.
pub const SYMBOLS: usize = 256;

/// Adaptive exponential-Golomb codebook.
#[derive(Debug, Clone)]
pub struct GolombCodebook {
    /// Golomb order `k`.
    order: u8,
    /// Rank currently assigned to each symbol.
    code_of: [u8; SYMBOLS],
    /// Symbol currently holding each rank.
    symbol_of: [u8; SYMBOLS],
}

impl GolombCodebook {
    /// Create a codebook of order `order` with identity ranks.
    pub fn new(order: u8) -> Result<Self> {
        if order > MAX_GOLOMB_ORDER {
            return Err(TinyPackError::invalid_config(format!(
                "Golomb order {order} exceeds {MAX_GOLOMB_ORDER}"
            )));
        }
        let mut codebook = Self {
            order,
            code_of: [0; SYMBOLS],
            symbol_of: [0; SYMBOLS],
        };
        codebook.init();
        Ok(codebook)
    }

    /// Reset every symbol to its identity rank.
    pub fn init(&mut self) {
        for i in 0..SYMBOLS {
            self.code_of[i] = i as u8;
            self.symbol_of[i] = i as u8;
        }
    }

    /// Golomb order.
    pub fn order(&self) -> u8 {
        self.order
    }

    /// Rank currently assigned to `symbol`.
    pub fn code_of(&self, symbol: u8) -> u8 {
        self.code_of[symbol as usize]
    }

    /// Symbol currently holding `code`.
    pub fn symbol_of(&self, code: u8) -> u8 {
        self.symbol_of[code as usize]
    }

    /// Bits the next encode of `symbol` would take.
    pub fn code_len(&self, symbol: u8) -> u8 {
        self.rank_len(self.code_of(symbol) as u32)
    }

    fn rank_len(&self, rank: u32) -> u8 {
        let code = rank + (1 << self.order);
        let significant = 16 - clz(code, 16);
        (2 * significant - (self.order as u32 + 1)) as u8
    }

    /// Longest unary prefix a valid code can carry.
    fn max_prefix(&self) -> u32 {
        let widest = (SYMBOLS as u32 - 1) + (1 << self.order);
        field_bits(widest) as u32 - self.order as u32 - 1
    }

    /// Encode one symbol and update its rank.
    pub fn encode_next(&mut self, packer: &mut BitPacker, symbol: u8) -> Result<()> {
        let rank = self.code_of(symbol);
        let code = rank as u32 + (1 << self.order);
        packer.write(code, self.rank_len(rank as u32))?;
        self.promote(rank);
        Ok(())
    }

    /// Decode one symbol and update its rank.
    pub fn decode_next(&mut self, unpacker: &mut BitUnpacker<'_>) -> Result<u8> {
        let max_prefix = self.max_prefix();
        let Some(zeros) = unpacker.read_unary(max_prefix)? else {
            return Err(TinyPackError::invalid_code(1 << (max_prefix + 1)));
        };

        let width = zeros + self.order as u32;
        let remainder = unpacker.read(width as u8)?;
        let rank = remainder + (1 << width) - (1 << self.order);
        if rank as usize >= SYMBOLS {
            return Err(TinyPackError::invalid_code(rank));
        }

        let rank = rank as u8;
        let symbol = self.symbol_of(rank);
        self.promote(rank);
        Ok(symbol)
    }

    /// Swap the symbol at `rank` with the one at `rank / 2`.
    fn promote(&mut self, rank: u8) {
        let swap = rank / 2;
        let cleared = self.symbol_of[rank as usize];
        let swapped = self.symbol_of[swap as usize];

        self.code_of[cleared as usize] = swap;
        self.code_of[swapped as usize] = rank;
        self.symbol_of[rank as usize] = swapped;
        self.symbol_of[swap as usize] = cleared;
    }
}

/// Literal coder selected by [`CodebookKind`].
#[derive(Debug, Clone)]
pub enum Codebook {
    /// Raw 8-bit literals.
    Literal,
    /// Adaptive exponential-Golomb literals.
    AdaptiveGolomb(GolombCodebook),
}

impl Codebook {
    /// Build the codebook described by `kind`.
    pub fn new(kind: CodebookKind) -> Result<Self> {
        match kind {
            CodebookKind::Literal => Ok(Self::Literal),
            CodebookKind::AdaptiveGolomb { k } => Ok(Self::AdaptiveGolomb(GolombCodebook::new(k)?)),
        }
    }

    /// The kind this codebook was built from.
    pub fn kind(&self) -> CodebookKind {
        match self {
            Self::Literal => CodebookKind::Literal,
            Self::AdaptiveGolomb(golomb) => CodebookKind::AdaptiveGolomb { k: golomb.order() },
        }
    }

    /// Reset adaptive state. Called at the start of every block.
    pub fn init(&mut self) {
        if let Self::AdaptiveGolomb(golomb) = self {
            golomb.init();
        }
    }

    /// Encode one literal.
    pub fn encode_next(&mut self, packer: &mut BitPacker, symbol: u8) -> Result<()> {
        match self {
            Self::Literal => packer.write(symbol as u32, 8),
            Self::AdaptiveGolomb(golomb) => golomb.encode_next(packer, symbol),
        }
    }

    /// Decode one literal.
    pub fn decode_next(&mut self, unpacker: &mut BitUnpacker<'_>) -> Result<u8> {
        match self {
            Self::Literal => Ok(unpacker.read(8)? as u8),
            Self::AdaptiveGolomb(golomb) => golomb.decode_next(unpacker),
        }
    }

    /// Code a byte sequence on its own, without LZSS framing.
    pub fn compress(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.compress_into(BitPacker::new(), bytes)
    }

    /// Like [`compress`](Self::compress), but fail with
    /// [`TinyPackError::Overflow`] if the output exceeds `max_len` bytes.
    pub fn compress_bounded(&mut self, bytes: &[u8], max_len: usize) -> Result<Vec<u8>> {
        self.compress_into(BitPacker::with_limit(max_len), bytes)
    }

    fn compress_into(&mut self, mut packer: BitPacker, bytes: &[u8]) -> Result<Vec<u8>> {
        self.init();
        for &byte in bytes {
            self.encode_next(&mut packer, byte)?;
        }
        Ok(packer.into_vec())
    }

    /// Decode exactly `length` literals from `data`.
    pub fn expand(&mut self, data: &[u8], length: usize) -> Result<Vec<u8>> {
        self.init();
        let mut unpacker = BitUnpacker::new(data);
        let mut output = Vec::with_capacity(length);
        for _ in 0..length {
            output.push(self.decode_next(&mut unpacker)?);
        }
        Ok(output)
    }
}
