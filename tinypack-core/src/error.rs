//! Error types for TinyPack operations.
//!
//! Two families of failure exist. [`TinyPackError::Overflow`] is the only
//! recoverable one: a bounded packer ran out of room and the caller must
//! abandon that encode. Everything else signals a bit vector that does not
//! match the field-width schedule the decoder is following (truncated input,
//! a back-reference outside the dictionary, a run overshooting the block).
//! Those are reported eagerly so a decoder never emits garbage.

use thiserror::Error;

/// The main error type for TinyPack operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TinyPackError {
    /// A bounded bit packer has no room for the requested write.
    #[error("Bit packer overflow: write exceeds limit of {limit} bytes")]
    Overflow {
        /// Maximum number of bytes the packer may touch.
        limit: usize,
    },

    /// Requested field width is outside the supported range.
    #[error("Invalid bit width: {0} (must be 0-32)")]
    InvalidBitWidth(u8),

    /// Read past the end of the supplied bit vector.
    #[error("Unexpected end of bit vector at bit position {position}")]
    UnexpectedEof {
        /// Bit position where the read was attempted.
        position: u64,
    },

    /// Back-reference points outside the addressable dictionary.
    #[error("Invalid back-reference: offset {offset} outside dictionary of {dictionary_len} bytes")]
    InvalidReference {
        /// Decoded offset.
        offset: usize,
        /// Number of bytes addressable at that point.
        dictionary_len: usize,
    },

    /// Back-reference run is longer than the space left in the block.
    #[error("Back-reference of {length} bytes overruns block ({remaining} bytes remaining)")]
    LengthOverrun {
        /// Decoded run length.
        length: usize,
        /// Bytes left in the block.
        remaining: usize,
    },

    /// Literal code outside the 256-symbol alphabet.
    #[error("Invalid literal code: {code}")]
    InvalidCode {
        /// Decoded code rank.
        code: u32,
    },

    /// Input block does not have the configured length.
    #[error("Invalid block length: expected {expected} bytes, found {found}")]
    InvalidBlockLength {
        /// Configured block size.
        expected: usize,
        /// Length of the supplied block.
        found: usize,
    },

    /// Rejected configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for TinyPack operations.
pub type Result<T> = std::result::Result<T, TinyPackError>;

impl TinyPackError {
    /// Create an overflow error.
    pub fn overflow(limit: usize) -> Self {
        Self::Overflow { limit }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(position: u64) -> Self {
        Self::UnexpectedEof { position }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_reference(offset: usize, dictionary_len: usize) -> Self {
        Self::InvalidReference {
            offset,
            dictionary_len,
        }
    }

    /// Create a length overrun error.
    pub fn length_overrun(length: usize, remaining: usize) -> Self {
        Self::LengthOverrun { length, remaining }
    }

    /// Create an invalid code error.
    pub fn invalid_code(code: u32) -> Self {
        Self::InvalidCode { code }
    }

    /// Create an invalid block length error.
    pub fn invalid_block_length(expected: usize, found: usize) -> Self {
        Self::InvalidBlockLength { expected, found }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether the caller can recover by retrying with more room.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TinyPackError::invalid_reference(12, 7);
        assert_eq!(
            err.to_string(),
            "Invalid back-reference: offset 12 outside dictionary of 7 bytes"
        );

        let err = TinyPackError::overflow(4);
        assert!(err.is_overflow());
        assert!(err.to_string().contains("4 bytes"));
    }

    #[test]
    fn test_only_overflow_is_recoverable() {
        assert!(!TinyPackError::unexpected_eof(9).is_overflow());
        assert!(!TinyPackError::length_overrun(5, 2).is_overflow());
        assert!(!TinyPackError::invalid_config("x").is_overflow());
    }
}
