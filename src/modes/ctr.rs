// CTR mode
//
//         nonce|counter0                nonce|counter1
//              ↓                             ↓
//     key → < E >                   key → < E >
//              ↓                             ↓                 ...
// plaintext →  ⊕               plaintext  →  ⊕
//              ↓                             ↓
//          ciphertext                    ciphertext
//
// Nonce and counter are both 64-bit little-endian. Encryption and decryption
// are the same operation.
use crate::{BlockCipher, Error, Result};

const NONCE_LEN: usize = 8;
const CTR_BLOCK_SIZE: usize = 16;

/// Keystream generator for a fixed `(key, nonce)`.
///
/// The stream is a pure function of the cipher, nonce and counter, so two
/// generators seeded alike produce identical blocks.
pub struct Keystream<'a, C: BlockCipher> {
    cipher: &'a C,
    nonce: u64,
    counter: u64,
}

impl<'a, C: BlockCipher> Keystream<'a, C> {
    pub fn new(cipher: &'a C, nonce: u64) -> Result<Self> {
        Self::with_counter(cipher, nonce, 0)
    }

    /// Start the stream at block `counter` instead of zero.
    pub fn with_counter(cipher: &'a C, nonce: u64, counter: u64) -> Result<Self> {
        if cipher.block_size() != CTR_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize(cipher.block_size()));
        }
        Ok(Self {
            cipher,
            nonce,
            counter,
        })
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn get_block(&mut self) -> [u8; CTR_BLOCK_SIZE] {
        let mut block = [0u8; CTR_BLOCK_SIZE];
        block[..NONCE_LEN].copy_from_slice(&self.nonce.to_le_bytes());
        block[NONCE_LEN..].copy_from_slice(&self.counter.to_le_bytes());
        self.cipher.encrypt_block(&mut block);
        self.counter = self.counter.wrapping_add(1);
        block
    }

    fn apply(&mut self, data: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(data.len());
        for chunk in data.chunks(CTR_BLOCK_SIZE) {
            let keystream_block = self.get_block();
            output.extend(chunk.iter().zip(keystream_block).map(|(d, k)| d ^ k));
        }
        output
    }
}

pub fn encrypt_ctr<C: BlockCipher>(plaintext: &[u8], cipher: &C, nonce: u64) -> Result<Vec<u8>> {
    Ok(Keystream::new(cipher, nonce)?.apply(plaintext))
}

pub fn decrypt_ctr<C: BlockCipher>(ciphertext: &[u8], cipher: &C, nonce: u64) -> Result<Vec<u8>> {
    encrypt_ctr(ciphertext, cipher, nonce)
}

/// Replace the plaintext under `ciphertext[offset..]` with `new_text`, keeping
/// the key and nonce.
///
/// Only the keystream blocks covering the edited range are generated. Edits
/// that run past the end extend the ciphertext; the gap between the end and
/// `offset`, if any, is filled with encrypted zero bytes.
pub fn edit_ctr<C: BlockCipher>(
    ciphertext: &[u8],
    cipher: &C,
    nonce: u64,
    offset: usize,
    new_text: &[u8],
) -> Result<Vec<u8>> {
    let mut output = ciphertext.to_vec();
    if new_text.is_empty() {
        return Ok(output);
    }

    let start = offset.min(ciphertext.len());
    let mut plaintext = vec![0u8; offset - start];
    plaintext.extend_from_slice(new_text);

    let first_block = start / CTR_BLOCK_SIZE;
    let block_offset = start % CTR_BLOCK_SIZE;
    let mut keystream = Keystream::with_counter(cipher, nonce, first_block as u64)?;
    let padded = [vec![0u8; block_offset], plaintext].concat();
    let edited = keystream.apply(&padded);

    let end = start + edited.len() - block_offset;
    if end > output.len() {
        output.resize(end, 0);
    }
    output[start..end].copy_from_slice(&edited[block_offset..]);
    Ok(output)
}
