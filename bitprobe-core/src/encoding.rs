//! Byte-to-bit-string encoding of fuzz inputs.
//!
//! Each byte is rendered as eight `'0'`/`'1'` characters, most significant
//! bit first, so that arbitrary binary input can travel as a single
//! printable command-line argument.

use crate::CoreError;

/// Number of characters produced per input byte.
pub const BITS_PER_BYTE: usize = 8;

/// Encode `data` as an MSB-first binary digit string.
///
/// Byte `i` occupies characters `[8i, 8i + 8)` of the result. An empty
/// slice produces an empty string.
///
/// # Complexity
/// O(n) where n = `data.len()`; allocates exactly `8 * n` bytes.
#[must_use]
pub fn encode_bits(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * BITS_PER_BYTE);
    for byte in data {
        for shift in (0..BITS_PER_BYTE).rev() {
            out.push(if (byte >> shift) & 1 == 1 { '1' } else { '0' });
        }
    }
    out
}

/// Decode a string produced by [`encode_bits`] back into raw bytes.
///
/// Used when replaying an input copied from a logged command line.
///
/// # Errors
/// Returns [`CoreError::BitStringLength`] if the length is not a multiple
/// of 8, or [`CoreError::InvalidBitDigit`] on any character other than
/// `'0'` or `'1'`.
pub fn decode_bits(bits: &str) -> Result<Vec<u8>, CoreError> {
    let raw = bits.as_bytes();
    if raw.len() % BITS_PER_BYTE != 0 {
        return Err(CoreError::BitStringLength { len: raw.len() });
    }

    let mut out = Vec::with_capacity(raw.len() / BITS_PER_BYTE);
    for (chunk_index, chunk) in raw.chunks_exact(BITS_PER_BYTE).enumerate() {
        let mut byte = 0u8;
        for (offset, digit) in chunk.iter().enumerate() {
            let bit = match digit {
                b'0' => 0,
                b'1' => 1,
                _ => {
                    let position = chunk_index * BITS_PER_BYTE + offset;
                    // Report the full char, not a UTF-8 continuation byte.
                    let found = bits
                        .get(position..)
                        .and_then(|rest| rest.chars().next())
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Err(CoreError::InvalidBitDigit { position, found });
                }
            };
            byte = (byte << 1) | bit;
        }
        out.push(byte);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_bytes() {
        assert_eq!(encode_bits(&[0x00]), "00000000");
        assert_eq!(encode_bits(&[0xff]), "11111111");
        assert_eq!(encode_bits(&[0x41]), "01000001");
        assert_eq!(encode_bits(&[0x80, 0x01]), "1000000000000001");
    }

    #[test]
    fn encode_empty_is_empty() {
        assert_eq!(encode_bits(&[]), "");
    }

    #[test]
    fn decode_known_string() {
        let bytes = match decode_bits("0100000111111111") {
            Ok(b) => b,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(bytes, vec![0x41, 0xff]);
    }

    #[test]
    fn decode_rejects_partial_byte() {
        let result = decode_bits("0101");
        assert!(
            matches!(result, Err(CoreError::BitStringLength { len: 4 })),
            "4 digits is not a whole byte, got {result:?}"
        );
    }

    #[test]
    fn decode_reports_position_of_bad_digit() {
        let result = decode_bits("00000000000x0000");
        match result {
            Err(CoreError::InvalidBitDigit { position, found }) => {
                assert_eq!(position, 11);
                assert_eq!(found, 'x');
            }
            other => panic!("expected InvalidBitDigit, got {other:?}"),
        }
    }

    #[test]
    fn decode_reports_multibyte_char() {
        // 'é' is two bytes, so the string is 8 bytes long.
        let result = decode_bits("000000é");
        assert!(
            matches!(result, Err(CoreError::InvalidBitDigit { position: 6, found: 'é' })),
            "got {result:?}"
        );
    }

    proptest::proptest! {
        #[test]
        fn proptest_encoded_length_is_eight_per_byte(
            data in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..256usize),
        ) {
            let bits = encode_bits(&data);
            proptest::prop_assert_eq!(bits.len(), data.len() * 8);
            proptest::prop_assert!(
                bits.chars().all(|c| c == '0' || c == '1'),
                "encoding must contain only binary digits"
            );
        }

        #[test]
        fn proptest_encoding_is_order_preserving(
            a in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64usize),
            b in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64usize),
        ) {
            let mut joined = a.clone();
            joined.extend_from_slice(&b);
            proptest::prop_assert_eq!(
                encode_bits(&joined),
                format!("{}{}", encode_bits(&a), encode_bits(&b)),
                "encode(a ++ b) must equal encode(a) ++ encode(b)"
            );
        }

        #[test]
        fn proptest_each_byte_matches_std_formatting(byte in proptest::prelude::any::<u8>()) {
            proptest::prop_assert_eq!(encode_bits(&[byte]), format!("{byte:08b}"));
        }

        #[test]
        fn proptest_decode_inverts_encode(
            data in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..128usize),
        ) {
            let decoded = decode_bits(&encode_bits(&data));
            proptest::prop_assert!(decoded.is_ok());
            proptest::prop_assert_eq!(decoded.unwrap_or_default(), data);
        }
    }
}
