// PKCS#7 padding
use crate::{Error, Result};

/// Append `n` bytes of value `n`, where `n` brings the data to the next block
/// boundary. Data that is already aligned gets a full block of padding.
pub fn add_padding(bytes: &[u8], block_size: usize) -> Result<Vec<u8>> {
    let block_size_u8 = checked_block_size(block_size)?;
    let n_pad = block_size_u8 - (bytes.len() % block_size) as u8;
    let mut out = Vec::with_capacity(bytes.len() + n_pad as usize);
    out.extend_from_slice(bytes);
    out.resize(bytes.len() + n_pad as usize, n_pad);
    Ok(out)
}

/// Strip PKCS#7 padding in place.
///
/// The buffer is left untouched if the padding is invalid.
pub fn remove_padding(bytes: &mut Vec<u8>, block_size: usize) -> Result<()> {
    let n_pad = padding_len(bytes, block_size)?;
    bytes.truncate(bytes.len() - n_pad);
    Ok(())
}

/// Boolean form of the padding check, for building padding oracles.
pub fn has_valid_padding(bytes: &[u8], block_size: usize) -> bool {
    padding_len(bytes, block_size).is_ok()
}

fn padding_len(bytes: &[u8], block_size: usize) -> Result<usize> {
    checked_block_size(block_size)?;
    let n_pad = *bytes.last().ok_or(Error::Padding)? as usize;
    if n_pad == 0 || n_pad > block_size || n_pad > bytes.len() {
        return Err(Error::Padding);
    }
    let padding = &bytes[(bytes.len() - n_pad)..];
    if padding.iter().all(|&b| b as usize == n_pad) {
        Ok(n_pad)
    } else {
        Err(Error::Padding)
    }
}

fn checked_block_size(block_size: usize) -> Result<u8> {
    match u8::try_from(block_size) {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Error::InvalidBlockSize(block_size)),
    }
}
