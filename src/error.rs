use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid pkcs7 padding")]
    Padding,

    #[error("buffers are not of equal length ({left} != {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("oracle is not encrypting in ECB mode (detected '{mode}')")]
    NotEcb { mode: String },

    #[error("attack failed: {0}")]
    AttackFailed(String),

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid block size '{0}'")]
    InvalidBlockSize(usize),

    #[error("length {len} is not a multiple of the block size {block_size}")]
    NotBlockAligned { len: usize, block_size: usize },

    #[error("no change in ciphertext length after probing {0} bytes")]
    ProbeLimitReached(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
