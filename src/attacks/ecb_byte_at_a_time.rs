// Byte-at-a-time ECB decryption.
//
// The oracle encrypts attacker input next to some unknown plaintext with a
// fixed key. Sending an input one byte short of filling a block leaves the
// first unknown byte as the last byte of that block. We remember the block's
// ciphertext, then send the same input followed by each candidate byte B and
// compare: ECB encrypts equal blocks equally, so exactly one B reproduces it.
//
// Shrinking the input by one byte per recovered byte slides the next unknown
// byte into the same position. Starting with an input as long as the whole
// (padded) unknown plaintext means a single, fixed block index sees every
// unknown byte in turn:
//
//     target:   AAAAAAAAAAAAAAA? | ...             (input = window - 1 bytes)
//     guess:    AAAAAAAAAAAAAAAB
//     next:     AAAAAAAAAAAAAAs? | ...             (input = window - 2 bytes)
//
// If the oracle also prepends a fixed unknown prefix, we first measure the
// prefix and pad it out to a block boundary with filler, after which the same
// procedure applies.
use tracing::{debug, info};

use crate::{
    detect_mode, determine_cipher_block_size, figure_out_prefix_length, get_block,
    measure_hidden_suffix_length, AttackConfig, CipherMode, Encryptor, Error, Result,
};

const FILLER_BYTE: u8 = b'A';

/// Recover `unknown` from an oracle computing `ECB(attacker_controlled || unknown)`.
pub fn decrypt_ecb_with_prependable_input<O: Encryptor + ?Sized>(oracle: &O) -> Result<Vec<u8>> {
    decrypt_ecb_with_prependable_input_with_config(oracle, &AttackConfig::default())
}

pub fn decrypt_ecb_with_prependable_input_with_config<O: Encryptor + ?Sized>(
    oracle: &O,
    config: &AttackConfig,
) -> Result<Vec<u8>> {
    let block_size = characterize_ecb_oracle(oracle, config)?;

    let padded_len = oracle.encrypt(&[]).len();
    let unknown_len = measure_hidden_suffix_length(oracle, &[], 0, config.max_probe_len)?;
    debug!(unknown_len, "measured unknown plaintext");

    let layout = Layout {
        block_size,
        prefix_len: 0,
        window_len: padded_len,
        unknown_len,
    };
    let plaintext = recover_unknown_bytes(oracle, &layout)?;
    info!(len = plaintext.len(), "recovered unknown plaintext");
    Ok(plaintext)
}

/// Recover `unknown` from an oracle computing
/// `ECB(fixed_prefix || attacker_controlled || unknown)`.
pub fn decrypt_ecb_with_injectable_input<O: Encryptor + ?Sized>(oracle: &O) -> Result<Vec<u8>> {
    decrypt_ecb_with_injectable_input_with_config(oracle, &AttackConfig::default())
}

pub fn decrypt_ecb_with_injectable_input_with_config<O: Encryptor + ?Sized>(
    oracle: &O,
    config: &AttackConfig,
) -> Result<Vec<u8>> {
    let block_size = characterize_ecb_oracle(oracle, config)?;

    let prefix_len = figure_out_prefix_length(oracle, block_size * 8, config)?;
    debug!(prefix_len, "unknown fixed prefix length");

    // Pad the prefix out to a block boundary.
    let filler_len = block_size - (prefix_len % block_size);
    let filler = vec![FILLER_BYTE; filler_len];
    let lead_len = prefix_len + filler_len;
    let padded_len = oracle
        .encrypt(&filler)
        .len()
        .checked_sub(lead_len)
        .ok_or_else(|| Error::AttackFailed("ciphertext shorter than its prefix".to_string()))?;
    let unknown_len = measure_hidden_suffix_length(oracle, &filler, lead_len, config.max_probe_len)?;
    debug!(unknown_len, "measured unknown plaintext");

    let layout = Layout {
        block_size,
        prefix_len,
        window_len: filler_len + padded_len,
        unknown_len,
    };
    let plaintext = recover_unknown_bytes(oracle, &layout)?;
    info!(len = plaintext.len(), "recovered unknown plaintext");
    Ok(plaintext)
}

/// Block size in bytes, once the oracle is known to be ECB.
fn characterize_ecb_oracle<O: Encryptor + ?Sized>(
    oracle: &O,
    config: &AttackConfig,
) -> Result<usize> {
    let block_size_bits = determine_cipher_block_size(oracle, config.max_probe_len)?;
    debug!(block_size_bits, "cipher block size");

    let ciphertext = oracle.encrypt(&vec![FILLER_BYTE; config.mode_probe_len]);
    let mode = detect_mode(&ciphertext, block_size_bits);
    debug!(%mode, "cipher mode");
    if mode != CipherMode::Ecb {
        return Err(Error::NotEcb {
            mode: mode.to_string(),
        });
    }
    Ok(block_size_bits / 8)
}

struct Layout {
    block_size: usize,
    /// Unknown bytes the oracle puts before our input.
    prefix_len: usize,
    /// Attacker input plus unknown plaintext covered by the target block and
    /// everything before it, excluding the prefix.
    window_len: usize,
    unknown_len: usize,
}

impl Layout {
    fn target_block(&self) -> usize {
        (self.prefix_len + self.window_len) / self.block_size - 1
    }
}

fn recover_unknown_bytes<O: Encryptor + ?Sized>(oracle: &O, layout: &Layout) -> Result<Vec<u8>> {
    let mut input = vec![FILLER_BYTE; layout.window_len - 1];
    let mut plaintext = Vec::with_capacity(layout.unknown_len);
    for _ in 0..layout.unknown_len {
        crack_next_byte(oracle, layout, &input, &mut plaintext)?;
        input.pop();
    }
    Ok(plaintext)
}

fn crack_next_byte<O: Encryptor + ?Sized>(
    oracle: &O,
    layout: &Layout,
    input: &[u8],
    plaintext: &mut Vec<u8>,
) -> Result<()> {
    let block_index = layout.target_block();
    let reference = oracle.encrypt(input);
    let target = get_block(&reference, block_index, layout.block_size)
        .ok_or_else(|| Error::AttackFailed(format!("ciphertext has no block {block_index}")))?;

    let mut candidate = Vec::with_capacity(input.len() + plaintext.len() + 1);
    candidate.extend_from_slice(input);
    candidate.extend_from_slice(plaintext);
    candidate.push(0);
    let last = candidate.len() - 1;

    for byte in 0..=255u8 {
        candidate[last] = byte;
        let ciphertext = oracle.encrypt(&candidate);
        if get_block(&ciphertext, block_index, layout.block_size) == Some(target) {
            plaintext.push(byte);
            return Ok(());
        }
    }
    Err(Error::AttackFailed(format!(
        "no candidate matched unknown byte {}",
        plaintext.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        encrypt_cbc, encrypt_ecb, random_bytes_with_seed, Aes128Block, EcbPrefixSuffixOracle,
        EcbSuffixOracle,
    };

    use base64::Engine;
    use rstest::rstest;

    const UNKNOWN_STRING: &str = "Um9sbGluJyBpbiBteSA1LjAKV2l0aCBteSByYWctdG9wIGRvd24gc28gbXkg\
aGFpciBjYW4gYmxvdwpUaGUgZ2lybGllcyBvbiBzdGFuZGJ5IHdhdmluZyBq\
dXN0IHRvIHNheSBoaQpEaWQgeW91IHN0b3A/IE5vLCBJIGp1c3QgZHJvdmUg\
YnkK";

    fn unknown_bytes() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(UNKNOWN_STRING)
            .unwrap()
    }

    #[test]
    fn prependable_attack_recovers_admin() {
        let cipher = Aes128Block::new(&random_bytes_with_seed::<16>(101)).unwrap();
        let oracle = |input: &[u8]| {
            encrypt_ecb(&[input, b"admin".as_slice()].concat(), &cipher, true).unwrap()
        };

        let recovered = decrypt_ecb_with_prependable_input(&oracle).unwrap();

        assert_eq!(recovered, b"admin");
    }

    #[test]
    fn prependable_attack_decrypts_message_with_oracle() {
        let secret = unknown_bytes();
        let oracle =
            EcbSuffixOracle::new(random_bytes_with_seed::<16>(102), secret.clone()).unwrap();

        let recovered = decrypt_ecb_with_prependable_input(&oracle).unwrap();

        assert_eq!(
            String::from_utf8_lossy(&recovered),
            String::from_utf8_lossy(&secret)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(15)]
    #[case(16)]
    #[case(17)]
    fn prependable_attack_handles_block_boundaries(#[case] len: usize) {
        let secret: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        let oracle =
            EcbSuffixOracle::new(random_bytes_with_seed::<16>(103), secret.clone()).unwrap();

        assert_eq!(decrypt_ecb_with_prependable_input(&oracle).unwrap(), secret);
    }

    #[test]
    fn injectable_attack_recovers_secret_behind_seven_byte_prefix() {
        let cipher = Aes128Block::new(&random_bytes_with_seed::<16>(104)).unwrap();
        let prefix = b"7 bytes";
        let oracle = |input: &[u8]| {
            let plaintext = [prefix.as_slice(), input, b"secret-data".as_slice()].concat();
            encrypt_ecb(&plaintext, &cipher, true).unwrap()
        };

        let prefix_len = figure_out_prefix_length(&oracle, 128, &AttackConfig::default()).unwrap();
        let recovered = decrypt_ecb_with_injectable_input(&oracle).unwrap();

        assert_eq!(prefix_len, 7);
        assert_eq!(recovered, b"secret-data");
    }

    #[rstest]
    #[case(b"7 bytes", b"BBBBBBBBBBBBBBBBBBBBsecret")]
    #[case(b"0123456789abcdefBBBBBBBBBBBBBBBB!", b"secret")]
    #[case(b"BBBBBBBBBBBBBBBBBBBB", b"CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCsecret")]
    fn injectable_attack_handles_filler_bytes_around_input(
        #[case] prefix: &[u8],
        #[case] unknown: &[u8],
    ) {
        let key = random_bytes_with_seed::<16>(107);
        let oracle = EcbPrefixSuffixOracle::new(key, prefix.to_vec(), unknown.to_vec()).unwrap();

        let prefix_len = figure_out_prefix_length(&oracle, 128, &AttackConfig::default()).unwrap();
        let recovered = decrypt_ecb_with_injectable_input(&oracle).unwrap();

        assert_eq!(prefix_len, prefix.len());
        assert_eq!(recovered, unknown);
    }

    #[rstest]
    #[case(1)]
    #[case(16)]
    #[case(31)]
    #[case(100)]
    fn injectable_attack_recovers_secret_for_any_prefix(#[case] prefix_len: usize) {
        let prefix: Vec<u8> = (0..prefix_len).map(|i| i as u8).collect();
        let oracle =
            EcbPrefixSuffixOracle::new(random_bytes_with_seed::<16>(105), prefix, unknown_bytes())
                .unwrap();

        let recovered = decrypt_ecb_with_injectable_input(&oracle).unwrap();

        assert_eq!(recovered, unknown_bytes());
    }

    #[test]
    fn injectable_attack_recovers_secret_behind_random_prefix() {
        let key = random_bytes_with_seed::<16>(106);
        let oracle = EcbPrefixSuffixOracle::with_random_prefix(key, unknown_bytes()).unwrap();

        let recovered = decrypt_ecb_with_injectable_input(&oracle).unwrap();

        assert_eq!(recovered, unknown_bytes());
    }

    #[test]
    fn attacks_refuse_non_ecb_oracles() {
        let cipher = Aes128Block::new(&random_bytes_with_seed::<16>(107)).unwrap();
        let oracle = |input: &[u8]| {
            encrypt_cbc(&[input, b"admin".as_slice()].concat(), &cipher, &[0; 16], true).unwrap()
        };

        let expected = Err(Error::NotEcb {
            mode: "unknown".to_string(),
        });
        assert_eq!(decrypt_ecb_with_prependable_input(&oracle), expected);
        assert_eq!(decrypt_ecb_with_injectable_input(&oracle), expected);
    }

    #[test]
    fn prependable_attack_fails_on_non_deterministic_oracle() {
        let cipher = Aes128Block::new(&random_bytes_with_seed::<16>(108)).unwrap();
        // The hidden bytes change on every call.
        let oracle = |input: &[u8]| {
            let secret = [rand::random::<u8>(); 5];
            encrypt_ecb(&[input, secret.as_slice()].concat(), &cipher, true).unwrap()
        };

        let result = decrypt_ecb_with_prependable_input(&oracle);

        assert!(matches!(result, Err(Error::AttackFailed(_))));
    }
}
