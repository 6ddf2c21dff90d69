use crate::{Error, Result};

/// XOR two buffers of equal length.
pub fn fixed_xor(buf_a: &[u8], buf_b: &[u8]) -> Result<Vec<u8>> {
    if buf_a.len() != buf_b.len() {
        return Err(Error::LengthMismatch {
            left: buf_a.len(),
            right: buf_b.len(),
        });
    }
    Ok(buf_a.iter().zip(buf_b.iter()).map(|(a, b)| a ^ b).collect())
}

/// XOR `data` with `key`, stopping at whichever runs out first.
///
/// Used to apply a recovered keystream, which may be shorter than some of the
/// ciphertexts it was recovered from.
pub fn repeating_xor(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter().zip(key.iter()).map(|(d, k)| d ^ k).collect()
}
