mod analysis;
mod attacks;
mod block;
mod config;
mod error;
mod modes;
mod oracle;
mod padding;
mod random;
mod single_byte_xor;
mod victim;
mod xor;

pub use analysis::{
    detect_mode, determine_cipher_block_size, figure_out_prefix_length, get_block,
    max_identical_run, measure_hidden_suffix_length, score_ecb_likelihood, CipherMode,
    DEFAULT_BLOCK_SIZE_BITS,
};
pub use attacks::{
    decrypt_cbc_with_padding_oracle, decrypt_cbc_with_padding_oracle_with_config,
    decrypt_ctr_ciphertexts_with_fixed_nonce, decrypt_ctr_ciphertexts_with_fixed_nonce_and_solver,
    decrypt_ecb_with_injectable_input, decrypt_ecb_with_injectable_input_with_config,
    decrypt_ecb_with_prependable_input, decrypt_ecb_with_prependable_input_with_config,
    decrypt_editable_ctr, decrypt_editable_ctr_by_reencryption, recover_fixed_nonce_keystream,
};
pub use block::{Aes128Block, BlockCipher};
pub use config::AttackConfig;
pub use error::{Error, Result};
pub use modes::{
    decrypt_cbc, decrypt_ctr, decrypt_ecb, edit_ctr, encrypt_cbc, encrypt_ctr, encrypt_ecb,
    Keystream,
};
pub use oracle::{Editor, Encryptor, PaddingValidator};
pub use padding::{add_padding, has_valid_padding, remove_padding};
pub use random::{random_bytes, random_bytes_with_seed, random_nonce};
pub use single_byte_xor::{
    brute_force_byte_xor_cipher, score_english_by_frequency, EnglishFrequencySolver,
    SingleByteXorSolver, XorKeyGuess,
};
pub use victim::{
    encryption_oracle, BlockMode, CbcPaddingOracle, CtrEditOracle, EcbPrefixSuffixOracle,
    EcbSuffixOracle,
};
pub use xor::{fixed_xor, repeating_xor};
