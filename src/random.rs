use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill(&mut bytes[..]);
    bytes
}

/// Deterministic bytes, for reproducible keys in tests and benchmarks.
pub fn random_bytes_with_seed<const N: usize>(seed: u64) -> [u8; N] {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes[..]);
    bytes
}

pub fn random_nonce() -> u64 {
    rand::thread_rng().gen()
}
