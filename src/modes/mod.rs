mod cbc;
mod ctr;
mod ecb;

pub use cbc::{decrypt_cbc, encrypt_cbc};
pub use ctr::{decrypt_ctr, edit_ctr, encrypt_ctr, Keystream};
pub use ecb::{decrypt_ecb, encrypt_ecb};

use crate::{Error, Result};

fn ensure_block_aligned(len: usize, block_size: usize) -> Result<()> {
    if len % block_size != 0 {
        return Err(Error::NotBlockAligned { len, block_size });
    }
    Ok(())
}
