use crate::analysis::DEFAULT_BLOCK_SIZE_BITS;

/// Tunables shared by the oracle attacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackConfig {
    /// Block size assumed by the padding oracle attack, in bits.
    pub block_size_bits: usize,
    /// Longest attacker input sent while waiting for the ciphertext to grow.
    pub max_probe_len: usize,
    /// Length of the run of `A`s sent before checking for ECB.
    pub mode_probe_len: usize,
    /// Consecutive identical blocks that mark the end of an unknown prefix.
    pub prefix_run_blocks: usize,
    /// Strip PKCS#7 padding from recovered CBC plaintext.
    pub remove_padding: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            block_size_bits: DEFAULT_BLOCK_SIZE_BITS,
            max_probe_len: 4096,
            mode_probe_len: 1000,
            prefix_run_blocks: 10,
            remove_padding: true,
        }
    }
}

impl AttackConfig {
    pub fn with_block_size_bits(mut self, block_size_bits: usize) -> Self {
        self.block_size_bits = block_size_bits;
        self
    }

    pub fn with_max_probe_len(mut self, max_probe_len: usize) -> Self {
        self.max_probe_len = max_probe_len;
        self
    }

    pub fn with_mode_probe_len(mut self, mode_probe_len: usize) -> Self {
        self.mode_probe_len = mode_probe_len;
        self
    }

    pub fn with_prefix_run_blocks(mut self, prefix_run_blocks: usize) -> Self {
        self.prefix_run_blocks = prefix_run_blocks;
        self
    }

    pub fn with_remove_padding(mut self, remove_padding: bool) -> Self {
        self.remove_padding = remove_padding;
        self
    }
}
