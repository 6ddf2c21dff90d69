// Adapter over the single-block AES primitive.
use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};

use crate::{Error, Result};

/// A keyed transform over exactly one block.
///
/// Callers must pass buffers of exactly `block_size()` bytes.
pub trait BlockCipher {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    fn encrypt_block(&self, block: &mut [u8]);

    fn decrypt_block(&self, block: &mut [u8]);
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

#[derive(Clone)]
pub struct Aes128Block {
    cipher: aes::Aes128,
}

impl Aes128Block {
    pub const KEY_SIZE: usize = 16;
    pub const BLOCK_SIZE: usize = 16;

    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = aes::Aes128::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
            expected: Self::KEY_SIZE,
            got: key.len(),
        })?;
        Ok(Self { cipher })
    }
}

impl BlockCipher for Aes128Block {
    fn block_size(&self) -> usize {
        Self::BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), Self::BLOCK_SIZE);
        self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), Self::BLOCK_SIZE);
        self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

impl std::fmt::Debug for Aes128Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Aes128Block").finish_non_exhaustive()
    }
}
