// Structural analysis of an encryption oracle: block size, ECB detection and
// the length of any hidden material around the attacker's input.
use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::{AttackConfig, Encryptor, Error, Result};

pub const DEFAULT_BLOCK_SIZE_BITS: usize = 128;

const PROBE_BYTE: u8 = b'A';
const PREFIX_PROBE_BYTES: [u8; 2] = [b'B', b'C'];

/// Mode reported by [`detect_mode`]. Only ECB leaves a recognisable trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Ecb,
    Unknown,
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Ecb => write!(f, "ecb"),
            CipherMode::Unknown => write!(f, "unknown"),
        }
    }
}

/// Block `index` of `data`, or `None` if `data` does not hold a full block there.
pub fn get_block(data: &[u8], index: usize, block_size_bytes: usize) -> Option<&[u8]> {
    let start = index.checked_mul(block_size_bytes)?;
    data.get(start..start.checked_add(block_size_bytes)?)
}

/// Find the oracle's block size, in bits, by growing the input one byte at a
/// time until the ciphertext grows.
pub fn determine_cipher_block_size<O: Encryptor + ?Sized>(
    oracle: &O,
    max_probe_len: usize,
) -> Result<usize> {
    let growth = probe_ciphertext_growth(oracle, &[], max_probe_len)?;
    Ok(growth.block_size_bytes() * 8)
}

/// Report `Ecb` if any two block-aligned windows of the ciphertext are equal.
///
/// Only conclusive when the plaintext contains a repeated, block-aligned
/// segment.
pub fn detect_mode(ciphertext: &[u8], block_size_bits: usize) -> CipherMode {
    let block_size_bytes = block_size_bits / 8;
    if block_size_bytes == 0 {
        return CipherMode::Unknown;
    }
    let mut blocks = HashSet::new();
    for block in ciphertext.chunks_exact(block_size_bytes) {
        if !blocks.insert(block) {
            return CipherMode::Ecb;
        }
    }
    CipherMode::Unknown
}

/// Ratio of repeated blocks to blocks.
///
/// Not a probability, but ECB ciphertexts of structured plaintext score far
/// higher than random bytes do.
pub fn score_ecb_likelihood(ciphertext: &[u8], block_size_bits: usize) -> f64 {
    let block_size_bytes = block_size_bits / 8;
    if block_size_bytes == 0 || ciphertext.len() < block_size_bytes {
        return 0.;
    }
    let mut seen = HashSet::new();
    let mut n_blocks = 0;
    let mut n_repetitions = 0;
    for block in ciphertext.chunks_exact(block_size_bytes) {
        n_blocks += 1;
        if !seen.insert(block) {
            n_repetitions += 1;
        }
    }
    n_repetitions as f64 / n_blocks as f64
}

/// Longest run of consecutive identical blocks.
pub fn max_identical_run(ciphertext: &[u8], block_size_bits: usize) -> usize {
    let block_size_bytes = block_size_bits / 8;
    if block_size_bytes == 0 {
        return 0;
    }
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<&[u8]> = None;
    for block in ciphertext.chunks_exact(block_size_bytes) {
        current = if previous == Some(block) { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(block);
    }
    longest
}

/// Length of the unknown fixed prefix in
/// `E(unknown_prefix || attacker_controlled || unknown_suffix)`.
///
/// Grows a run of filler until `config.prefix_run_blocks` ciphertext blocks
/// made purely of filler appear. At that point the filler is block aligned, so
/// the filler bytes spilling into the prefix's last block, together with the
/// block index where the run starts, give the prefix length.
///
/// Every length is sent with two different filler bytes, and only blocks that
/// follow the filler byte count towards the run. Identical blocks that come
/// from the prefix or suffix are never mistaken for filler, even when they
/// happen to contain the filler byte.
pub fn figure_out_prefix_length<O: Encryptor + ?Sized>(
    oracle: &O,
    block_size_bits: usize,
    config: &AttackConfig,
) -> Result<usize> {
    let block_size_bytes = block_size_bits / 8;
    let run_blocks = config.prefix_run_blocks;
    if block_size_bytes == 0 {
        return Err(Error::InvalidBlockSize(block_size_bits));
    }
    if run_blocks < 2 {
        return Err(Error::AttackFailed(format!(
            "prefix discovery needs a run of at least two blocks, got {run_blocks}"
        )));
    }

    // Alignment never needs more than a block of filler on top of the run.
    let max_filler = (run_blocks + 1) * block_size_bytes;
    let (filler_len, run_start) = (0..max_filler)
        .find_map(|n| {
            filler_run_start(oracle, n, block_size_bytes, run_blocks).map(|start| (n, start))
        })
        .ok_or_else(|| {
            Error::AttackFailed(format!(
                "no run of {run_blocks} filler blocks within {max_filler} filler bytes"
            ))
        })?;
    let filler_in_prefix_blocks = filler_len
        .checked_sub(run_blocks * block_size_bytes)
        .ok_or_else(|| Error::AttackFailed("filler run longer than the filler".to_string()))?;

    let prefix_len = (run_start * block_size_bytes)
        .checked_sub(filler_in_prefix_blocks)
        .ok_or_else(|| Error::AttackFailed("filler run starts inside the prefix".to_string()))?;
    debug!(prefix_len, filler_len, run_start, "found unknown prefix length");
    Ok(prefix_len)
}

/// Index of the first `run_blocks` consecutive blocks that hold nothing but
/// filler when `filler_len` filler bytes are sent.
///
/// A block qualifies when it changes with the filler byte and the whole run
/// stays identical under both filler bytes. Since ECB is deterministic, a byte
/// that is not filler would have to equal both filler bytes at once.
fn filler_run_start<O: Encryptor + ?Sized>(
    oracle: &O,
    filler_len: usize,
    block_size_bytes: usize,
    run_blocks: usize,
) -> Option<usize> {
    let [first, second] = PREFIX_PROBE_BYTES.map(|byte| oracle.encrypt(&vec![byte; filler_len]));
    let first_blocks: Vec<&[u8]> = first.chunks_exact(block_size_bytes).collect();
    let second_blocks: Vec<&[u8]> = second.chunks_exact(block_size_bytes).collect();
    let n_blocks = first_blocks.len().min(second_blocks.len());

    (0..=n_blocks.checked_sub(run_blocks)?).find(|&start| {
        (start..start + run_blocks).all(|i| {
            first_blocks[i] != second_blocks[i]
                && first_blocks[i] == first_blocks[start]
                && second_blocks[i] == second_blocks[start]
        })
    })
}

/// Exact length of the unknown material the oracle appends after
/// `aligned_input`.
///
/// Everything before the unknown suffix must already be block aligned when
/// `aligned_input` is sent. Extra filler is then added until the ciphertext
/// grows; that happens exactly when suffix plus extra filler fills a block.
pub fn measure_hidden_suffix_length<O: Encryptor + ?Sized>(
    oracle: &O,
    aligned_input: &[u8],
    lead_len: usize,
    max_probe_len: usize,
) -> Result<usize> {
    let growth = probe_ciphertext_growth(oracle, aligned_input, max_probe_len)?;
    let padded_suffix_len = growth
        .initial_len
        .checked_sub(lead_len)
        .ok_or_else(|| Error::AttackFailed("ciphertext shorter than its prefix".to_string()))?;
    padded_suffix_len
        .checked_sub(growth.extra_len)
        .ok_or_else(|| Error::AttackFailed("suffix length underflow".to_string()))
}

struct CiphertextGrowth {
    initial_len: usize,
    extra_len: usize,
    grown_len: usize,
}

impl CiphertextGrowth {
    fn block_size_bytes(&self) -> usize {
        self.grown_len - self.initial_len
    }
}

fn probe_ciphertext_growth<O: Encryptor + ?Sized>(
    oracle: &O,
    base_input: &[u8],
    max_probe_len: usize,
) -> Result<CiphertextGrowth> {
    let initial_len = oracle.encrypt(base_input).len();
    let mut input = base_input.to_vec();
    for extra_len in 1..=max_probe_len {
        input.push(PROBE_BYTE);
        let grown_len = oracle.encrypt(&input).len();
        if grown_len != initial_len {
            if grown_len < initial_len {
                return Err(Error::AttackFailed(format!(
                    "ciphertext shrank from {initial_len} to {grown_len} bytes"
                )));
            }
            return Ok(CiphertextGrowth {
                initial_len,
                extra_len,
                grown_len,
            });
        }
    }
    Err(Error::ProbeLimitReached(max_probe_len))
}
