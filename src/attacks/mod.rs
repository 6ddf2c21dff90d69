mod cbc_padding_oracle;
mod ctr_edit;
mod ctr_fixed_nonce;
mod ecb_byte_at_a_time;

pub use cbc_padding_oracle::{
    decrypt_cbc_with_padding_oracle, decrypt_cbc_with_padding_oracle_with_config,
};
pub use ctr_edit::{decrypt_editable_ctr, decrypt_editable_ctr_by_reencryption};
pub use ctr_fixed_nonce::{
    decrypt_ctr_ciphertexts_with_fixed_nonce, decrypt_ctr_ciphertexts_with_fixed_nonce_and_solver,
    recover_fixed_nonce_keystream,
};
pub use ecb_byte_at_a_time::{
    decrypt_ecb_with_injectable_input, decrypt_ecb_with_injectable_input_with_config,
    decrypt_ecb_with_prependable_input, decrypt_ecb_with_prependable_input_with_config,
};
