use super::ensure_block_aligned;
use crate::{add_padding, remove_padding, BlockCipher, Result};

/// Encrypt each block independently, padding with PKCS#7 first if `pad` is set.
///
/// Without padding the plaintext must already be block aligned.
pub fn encrypt_ecb<C: BlockCipher>(plaintext: &[u8], cipher: &C, pad: bool) -> Result<Vec<u8>> {
    let block_size = cipher.block_size();
    let mut buf = if pad {
        add_padding(plaintext, block_size)?
    } else {
        ensure_block_aligned(plaintext.len(), block_size)?;
        plaintext.to_vec()
    };
    buf.chunks_mut(block_size)
        .for_each(|block| cipher.encrypt_block(block));
    Ok(buf)
}

pub fn decrypt_ecb<C: BlockCipher>(
    ciphertext: &[u8],
    cipher: &C,
    unpad: bool,
) -> Result<Vec<u8>> {
    let block_size = cipher.block_size();
    ensure_block_aligned(ciphertext.len(), block_size)?;
    let mut buf = ciphertext.to_vec();
    buf.chunks_mut(block_size)
        .for_each(|block| cipher.decrypt_block(block));
    if unpad {
        remove_padding(&mut buf, block_size)?;
    }
    Ok(buf)
}
