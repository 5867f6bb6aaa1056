//! Fuzz target: bit string encoding.
//!
//! Verifies that `encode_bits` never panics, always yields 8 binary digits
//! per byte, and that `decode_bits` recovers the input.
#![no_main]

use bitprobe_core::{decode_bits, encode_bits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let bits = encode_bits(data);
    assert_eq!(bits.len(), data.len() * 8, "encoding must be 8 chars per byte");
    assert!(
        bits.bytes().all(|b| b == b'0' || b == b'1'),
        "encoding must contain only binary digits"
    );

    let decoded = decode_bits(&bits).expect("encoded bits must decode");
    assert_eq!(decoded, data);

    // Arbitrary text must be rejected cleanly, never panic.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_bits(text);
    }
});
