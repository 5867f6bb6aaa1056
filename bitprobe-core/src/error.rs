/// Errors produced by the `bitprobe-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A bit string's length is not a whole number of bytes.
    #[error("bit string length {len} is not a multiple of 8")]
    BitStringLength { len: usize },

    /// A bit string contained something other than `'0'` or `'1'`.
    #[error("invalid bit digit {found:?} at position {position}")]
    InvalidBitDigit { position: usize, found: char },
}
