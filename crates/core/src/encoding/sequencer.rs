//! Byte sequencing: the first stage of both training and encoding.

/// Convert a byte sequence into one token ID per byte.
///
/// Element `i` of the result is the numeric value of byte `i`. Empty input
/// yields an empty sequence.
#[inline]
pub fn byte_sequence(bytes: &[u8]) -> Vec<u32> {
    bytes.iter().map(|&b| b as u32).collect()
}
