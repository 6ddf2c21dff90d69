// CBC padding oracle attack.
//
// CBC decryption computes P_i = D(C_i) ⊕ C_{i-1}. Sending the pair
// (X, C_i) to the oracle decrypts to D(C_i) ⊕ X, and X is ours to choose.
//
// To find the last byte of D(C_i) we vary the last byte of X until the oracle
// reports valid padding; the decrypted byte is then (almost certainly) 0x01,
// so D(C_i)[15] = 0x01 ⊕ X[15]. Knowing that, we set X[15] to force 0x02 and
// vary X[14] until the padding is valid again, and so on down the block.
// The real plaintext byte is D(C_i)[k] ⊕ C_{i-1}[k].
//
// The first block is chained to an IV we never see, so it stays unknown.
// Prepend the IV to the ciphertext if it is available.
//
// A last byte of 0x01 is not the only way to get valid padding: the forged
// block may happen to end in 0x02 0x02, and so on. The unmodified byte is
// tried last, and a single-byte padding match is confirmed by disturbing the
// byte in front of it and asking again.
use tracing::{debug, info, warn};

use crate::{remove_padding, AttackConfig, Error, PaddingValidator, Result};

const UNKNOWN_BYTE: u8 = b'?';

/// Recover all but the first block of a CBC ciphertext from a padding oracle.
///
/// The first block is reported as `?` bytes.
pub fn decrypt_cbc_with_padding_oracle<V: PaddingValidator + ?Sized>(
    ciphertext: &[u8],
    oracle: &V,
) -> Result<Vec<u8>> {
    decrypt_cbc_with_padding_oracle_with_config(ciphertext, oracle, &AttackConfig::default())
}

pub fn decrypt_cbc_with_padding_oracle_with_config<V: PaddingValidator + ?Sized>(
    ciphertext: &[u8],
    oracle: &V,
    config: &AttackConfig,
) -> Result<Vec<u8>> {
    let block_size = config.block_size_bits / 8;
    if block_size == 0 || block_size > u8::MAX as usize {
        return Err(Error::InvalidBlockSize(block_size));
    }
    if ciphertext.len() % block_size != 0 {
        return Err(Error::NotBlockAligned {
            len: ciphertext.len(),
            block_size,
        });
    }
    let n_blocks = ciphertext.len() / block_size;
    if n_blocks < 2 {
        return Err(Error::AttackFailed(format!(
            "need at least two ciphertext blocks, got {n_blocks}"
        )));
    }

    // Intermediate state D(C_i), indexed like the ciphertext.
    let mut intermediate = vec![0u8; ciphertext.len()];
    let mut plaintext = vec![0u8; ciphertext.len()];
    for block_num in (0..n_blocks - 1).rev() {
        let block_start = block_num * block_size;
        let block_end = block_start + block_size;
        // The block being forged followed by the block being decrypted.
        let mut forged = ciphertext[..block_end + block_size].to_vec();

        for i in (block_start..block_end).rev() {
            let pad_byte = (block_end - i) as u8;
            for k in (i + 1)..block_end {
                forged[k] = pad_byte ^ intermediate[k + block_size];
            }

            let byte = find_padding_byte(oracle, &mut forged, i, block_start, pad_byte)?;
            intermediate[i + block_size] = pad_byte ^ byte;
            plaintext[i + block_size] = intermediate[i + block_size] ^ ciphertext[i];
        }
        debug!(block = block_num + 1, "decrypted ciphertext block");
    }

    if config.remove_padding {
        remove_padding(&mut plaintext, block_size)?;
    }
    plaintext[..block_size].fill(UNKNOWN_BYTE);
    info!(len = plaintext.len(), "recovered plaintext with padding oracle");
    Ok(plaintext)
}

fn find_padding_byte<V: PaddingValidator + ?Sized>(
    oracle: &V,
    forged: &mut [u8],
    i: usize,
    block_start: usize,
    pad_byte: u8,
) -> Result<u8> {
    let original = forged[i];
    let candidates = (0..=255u8)
        .filter(|&byte| byte != original)
        .chain(std::iter::once(original));

    for candidate in candidates {
        forged[i] = candidate;
        if !oracle.is_valid_padding(forged) {
            continue;
        }
        if pad_byte == 1 && i > block_start && !confirms_single_byte_padding(oracle, forged, i) {
            continue;
        }
        if candidate == original {
            warn!(
                offset = i,
                pad_byte, "only the unmodified ciphertext byte gave valid padding"
            );
        }
        return Ok(candidate);
    }
    Err(Error::AttackFailed(format!(
        "no byte at offset {i} produced padding {pad_byte:#04x}"
    )))
}

/// Valid padding that survives a change to the byte before it must be 0x01.
fn confirms_single_byte_padding<V: PaddingValidator + ?Sized>(
    oracle: &V,
    forged: &mut [u8],
    i: usize,
) -> bool {
    forged[i - 1] ^= 0xff;
    let valid = oracle.is_valid_padding(forged);
    forged[i - 1] ^= 0xff;
    valid
}
