//! Leading-zero counting within a fixed field width.
//!
//! Every adaptive field in the TinyPack format is sized by the same rule:
//! a field able to hold any value in `[0, max]` needs
//! `width - clz(max, width)` bits. The exponential-Golomb coder uses the
//! same primitive to measure the significant length of a code.

/// Number of leading zero bits of `value` represented in exactly `width` bits.
///
/// `value` must be below `2^width` and `width` must be at most 32. A zero
/// value has `width` leading zeros.
///
/// # Example
///
/// ```
/// use tinypack_core::clz::clz;
///
/// assert_eq!(clz(1, 8), 7);
/// assert_eq!(clz(0x80, 8), 0);
/// assert_eq!(clz(125, 16), 9);
/// ```
#[inline]
pub fn clz(value: u32, width: u32) -> u32 {
    debug_assert!(width <= 32, "width {width} exceeds 32 bits");
    debug_assert!(
        width == 32 || value < (1u32 << width),
        "value {value} does not fit in {width} bits"
    );
    value.leading_zeros() - (32 - width)
}

/// Leading zeros of a single byte.
#[inline]
pub fn clz8(byte: u8) -> u8 {
    byte.leading_zeros() as u8
}

/// Minimum number of bits able to represent every value in `[0, max_value]`.
///
/// `field_bits(0)` is 0: a field that can only hold zero is not transmitted.
#[inline]
pub fn field_bits(max_value: u32) -> u8 {
    (32 - clz(max_value, 32)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clz_widths() {
        assert_eq!(clz(0, 8), 8);
        assert_eq!(clz(0, 16), 16);
        assert_eq!(clz(1, 16), 15);
        assert_eq!(clz(0xFFFF, 16), 0);
        assert_eq!(clz(255, 8), 0);
        assert_eq!(clz(4, 8), 5);
    }

    #[test]
    fn test_clz8_matches_generic() {
        for byte in 0..=255u8 {
            assert_eq!(clz8(byte) as u32, clz(byte as u32, 8));
        }
    }

    #[test]
    fn test_field_bits_is_width_independent() {
        for max in 0..256u32 {
            let bits = field_bits(max);
            assert_eq!(bits as u32, 8 - clz(max, 8));
            assert_eq!(bits as u32, 16 - clz(max, 16));
        }
    }

    #[test]
    fn test_field_bits_covers_range() {
        assert_eq!(field_bits(0), 0);
        assert_eq!(field_bits(1), 1);
        assert_eq!(field_bits(2), 2);
        assert_eq!(field_bits(3), 2);
        assert_eq!(field_bits(4), 3);
        assert_eq!(field_bits(125), 7);
        assert_eq!(field_bits(251), 8);
        for max in 1..1024u32 {
            let bits = field_bits(max);
            assert!(max < (1 << bits));
            assert!(max >= (1 << (bits - 1)));
        }
    }
}
