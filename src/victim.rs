// Victim oracles over a hidden key.
//
// Each wraps a key (and whatever else the attacker is not meant to see) and
// exposes exactly one oracle capability. The attacks are tested against these.
use rand::Rng;

use crate::{
    decrypt_cbc, edit_ctr, encrypt_cbc, encrypt_ctr, encrypt_ecb, random_bytes, Aes128Block,
    Editor, Encryptor, PaddingValidator, Result,
};

/// Mode actually used by [`encryption_oracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    Ecb,
    Cbc,
}

/// Encrypt under a fresh random key, with 5-10 random bytes on each side of
/// the input, choosing ECB or CBC (random IV) with equal probability.
pub fn encryption_oracle(plaintext: &[u8]) -> Result<(BlockMode, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    let prefix = random_vec(&mut rng, 5..=10);
    let suffix = random_vec(&mut rng, 5..=10);
    let message = [prefix.as_slice(), plaintext, suffix.as_slice()].concat();

    let cipher = Aes128Block::new(&random_bytes::<16>())?;
    if rng.gen_bool(0.5) {
        Ok((BlockMode::Ecb, encrypt_ecb(&message, &cipher, true)?))
    } else {
        let iv = random_bytes::<16>();
        Ok((BlockMode::Cbc, encrypt_cbc(&message, &cipher, &iv, true)?))
    }
}

fn random_vec<R: Rng>(rng: &mut R, len: std::ops::RangeInclusive<usize>) -> Vec<u8> {
    let n = rng.gen_range(len);
    (0..n).map(|_| rng.gen()).collect()
}

/// `AES_ECB(attacker_controlled || unknown_bytes)`.
pub struct EcbSuffixOracle {
    cipher: Aes128Block,
    unknown_bytes: Vec<u8>,
}

impl EcbSuffixOracle {
    pub fn new(key: [u8; 16], unknown_bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            cipher: Aes128Block::new(&key)?,
            unknown_bytes,
        })
    }
}

impl Encryptor for EcbSuffixOracle {
    fn encrypt(&self, input: &[u8]) -> Vec<u8> {
        let message = [input, self.unknown_bytes.as_slice()].concat();
        // Padding is always on, so this cannot fail.
        encrypt_ecb(&message, &self.cipher, true).unwrap_or_default()
    }
}

/// `AES_ECB(prefix || attacker_controlled || unknown_bytes)` with a fixed,
/// hidden prefix.
pub struct EcbPrefixSuffixOracle {
    cipher: Aes128Block,
    prefix: Vec<u8>,
    unknown_bytes: Vec<u8>,
}

impl EcbPrefixSuffixOracle {
    pub fn new(key: [u8; 16], prefix: Vec<u8>, unknown_bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            cipher: Aes128Block::new(&key)?,
            prefix,
            unknown_bytes,
        })
    }

    /// Oracle with a random prefix of 1 to 255 bytes.
    pub fn with_random_prefix(key: [u8; 16], unknown_bytes: Vec<u8>) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let prefix = random_vec(&mut rng, 1..=255);
        Self::new(key, prefix, unknown_bytes)
    }
}

impl Encryptor for EcbPrefixSuffixOracle {
    fn encrypt(&self, input: &[u8]) -> Vec<u8> {
        let message = [self.prefix.as_slice(), input, self.unknown_bytes.as_slice()].concat();
        encrypt_ecb(&message, &self.cipher, true).unwrap_or_default()
    }
}

/// Holds a CBC key and IV; tells callers whether a ciphertext decrypts to
/// valid padding and nothing more.
pub struct CbcPaddingOracle {
    cipher: Aes128Block,
    iv: [u8; 16],
}

impl CbcPaddingOracle {
    pub fn new(key: [u8; 16], iv: [u8; 16]) -> Result<Self> {
        Ok(Self {
            cipher: Aes128Block::new(&key)?,
            iv,
        })
    }

    /// Produce a ciphertext for the attacker to work on.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt_cbc(plaintext, &self.cipher, &self.iv, true)
    }
}

impl PaddingValidator for CbcPaddingOracle {
    fn is_valid_padding(&self, ciphertext: &[u8]) -> bool {
        decrypt_cbc(ciphertext, &self.cipher, &self.iv, true).is_ok()
    }
}

/// Holds a CTR key and nonce and allows "random access" edits of any
/// ciphertext under them.
pub struct CtrEditOracle {
    cipher: Aes128Block,
    nonce: u64,
}

impl CtrEditOracle {
    pub fn new(key: [u8; 16], nonce: u64) -> Result<Self> {
        Ok(Self {
            cipher: Aes128Block::new(&key)?,
            nonce,
        })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt_ctr(plaintext, &self.cipher, self.nonce)
    }
}

impl Editor for CtrEditOracle {
    fn edit(&self, ciphertext: &[u8], offset: usize, new_text: &[u8]) -> Vec<u8> {
        // The block size is fixed at 16, so this cannot fail.
        edit_ctr(ciphertext, &self.cipher, self.nonce, offset, new_text)
            .unwrap_or_else(|_| ciphertext.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{decrypt_ctr, detect_mode, random_bytes_with_seed, CipherMode};

    #[test]
    fn encryption_oracle_mode_is_detectable() {
        for _ in 0..20 {
            let (mode, ciphertext) = encryption_oracle(&b"A".repeat(64)).unwrap();

            let expected = match mode {
                BlockMode::Ecb => CipherMode::Ecb,
                BlockMode::Cbc => CipherMode::Unknown,
            };
            assert_eq!(detect_mode(&ciphertext, 128), expected);
        }
    }

    #[test]
    fn padding_oracle_accepts_own_ciphertext_only() {
        let oracle = CbcPaddingOracle::new(random_bytes_with_seed::<16>(1), [0; 16]).unwrap();
        let mut ciphertext = oracle.encrypt(b"YELLOW SUBMARINExx").unwrap();

        assert!(oracle.is_valid_padding(&ciphertext));
        // Turns the final 0x0e padding byte into 0x0f.
        ciphertext[15] ^= 0x01;
        assert!(!oracle.is_valid_padding(&ciphertext));
    }

    #[test]
    fn ctr_edit_oracle_edits_plaintext() {
        let key = random_bytes_with_seed::<16>(2);
        let oracle = CtrEditOracle::new(key, 99).unwrap();
        let ciphertext = oracle.encrypt(b"attack at dawn").unwrap();

        let edited = oracle.edit(&ciphertext, 10, b"dusk");

        let cipher = Aes128Block::new(&key).unwrap();
        assert_eq!(decrypt_ctr(&edited, &cipher, 99).unwrap(), b"attack at dusk");
    }

    #[test]
    fn ecb_prefix_suffix_oracle_has_stable_prefix() {
        let oracle =
            EcbPrefixSuffixOracle::with_random_prefix(random_bytes_with_seed::<16>(3), b"x".to_vec())
                .unwrap();

        assert_eq!(oracle.encrypt(b"hello"), oracle.encrypt(b"hello"));
    }
}
