//! TinyPack configuration.

use tinypack_core::error::{Result, TinyPackError};

/// Largest supported block, in bytes.
///
/// Plain-mode fields are sized from 8-bit leading-zero counts, so every
/// in-block offset and run length must stay below 256.
pub const MAX_BLOCK_SIZE: usize = 256;

/// Default number of LZRW hash slots.
pub const DEFAULT_TABLE_SIZE: usize = 128;

/// Default exponential-Golomb order.
pub const DEFAULT_GOLOMB_ORDER: u8 = 2;

/// Largest exponential-Golomb order. Keeps every code within 16 significant bits.
pub const MAX_GOLOMB_ORDER: u8 = 15;

/// How literal bytes are coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodebookKind {
    /// Raw 8-bit literals.
    #[default]
    Literal,
    /// Order-`k` exponential-Golomb code over an adaptive rank table.
    AdaptiveGolomb {
        /// Golomb order.
        k: u8,
    },
}

impl CodebookKind {
    /// Adaptive Golomb codebook with the default order.
    pub const GOLOMB: Self = Self::AdaptiveGolomb {
        k: DEFAULT_GOLOMB_ORDER,
    };
}

/// Codec configuration shared by encoder and decoder.
///
/// Both ends of a stream must use the same configuration; nothing about it
/// is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TinyPackConfig {
    /// Bytes per block.
    pub block_size: usize,
    /// Literal coder.
    pub codebook: CodebookKind,
    /// Number of LZRW hash slots (encoder only).
    pub lzrw_table_size: usize,
}

impl TinyPackConfig {
    /// The TinyOS pixel-row configuration.
    ///
    /// - 126-byte blocks
    /// - Raw literals
    /// - 128-slot LZRW table
    pub const TINYOS: Self = Self {
        block_size: 126,
        codebook: CodebookKind::Literal,
        lzrw_table_size: DEFAULT_TABLE_SIZE,
    };

    /// Create a configuration for `block_size`-byte blocks with raw literals.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            ..Self::TINYOS
        }
    }

    /// Use a different literal coder.
    pub fn with_codebook(mut self, codebook: CodebookKind) -> Self {
        self.codebook = codebook;
        self
    }

    /// Use a different LZRW table size.
    pub fn with_table_size(mut self, lzrw_table_size: usize) -> Self {
        self.lzrw_table_size = lzrw_table_size;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(TinyPackError::invalid_config(format!(
                "block size {} outside 1..={MAX_BLOCK_SIZE}",
                self.block_size
            )));
        }
        if self.lzrw_table_size == 0 {
            return Err(TinyPackError::invalid_config(
                "LZRW table needs at least one slot",
            ));
        }
        match self.codebook {
            CodebookKind::AdaptiveGolomb { k } if k > MAX_GOLOMB_ORDER => {
                Err(TinyPackError::invalid_config(format!(
                    "Golomb order {k} exceeds {MAX_GOLOMB_ORDER}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for TinyPackConfig {
    fn default() -> Self {
        Self::TINYOS
    }
}
