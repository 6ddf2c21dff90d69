// CBC mode
//
//     C_i = E(P_i ⊕ C_{i-1}),    P_i = D(C_i) ⊕ C_{i-1},    C_{-1} = IV
use super::ensure_block_aligned;
use crate::{add_padding, fixed_xor, remove_padding, BlockCipher, Result};

pub fn encrypt_cbc<C: BlockCipher>(
    plaintext: &[u8],
    cipher: &C,
    iv: &[u8],
    pad: bool,
) -> Result<Vec<u8>> {
    let block_size = cipher.block_size();
    let plaintext = if pad {
        add_padding(plaintext, block_size)?
    } else {
        ensure_block_aligned(plaintext.len(), block_size)?;
        plaintext.to_vec()
    };

    let mut ciphertext = Vec::with_capacity(plaintext.len());
    let mut last_block = iv.to_vec();
    for plaintext_block in plaintext.chunks(block_size) {
        let mut block = fixed_xor(plaintext_block, &last_block)?;
        cipher.encrypt_block(&mut block);
        ciphertext.extend_from_slice(&block);
        last_block = block;
    }
    Ok(ciphertext)
}

pub fn decrypt_cbc<C: BlockCipher>(
    ciphertext: &[u8],
    cipher: &C,
    iv: &[u8],
    unpad: bool,
) -> Result<Vec<u8>> {
    let block_size = cipher.block_size();
    ensure_block_aligned(ciphertext.len(), block_size)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut last_block = iv;
    for ciphertext_block in ciphertext.chunks(block_size) {
        let mut block = ciphertext_block.to_vec();
        cipher.decrypt_block(&mut block);
        plaintext.extend(fixed_xor(&block, last_block)?);
        // Chain on the ciphertext block, not the decrypted one.
        last_block = ciphertext_block;
    }
    if unpad {
        remove_padding(&mut plaintext, block_size)?;
    }
    Ok(plaintext)
}
