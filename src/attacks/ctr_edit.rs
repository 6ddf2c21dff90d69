// Break "random access read/write" CTR.
//
// The edit oracle re-encrypts with the keystream belonging to each position.
// Writing the true plaintext byte back into its own position therefore leaves
// the ciphertext untouched, which lets us test guesses one byte at a time.
use tracing::info;

use crate::{Editor, Error, Result};

/// Recover the plaintext by guessing each byte and checking which guess makes
/// the edit a no-op.
pub fn decrypt_editable_ctr<E: Editor + ?Sized>(ciphertext: &[u8], editor: &E) -> Result<Vec<u8>> {
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for offset in 0..ciphertext.len() {
        recover_byte(ciphertext, editor, offset, &mut plaintext)?;
    }
    info!(len = plaintext.len(), "recovered plaintext with edit oracle");
    Ok(plaintext)
}

fn recover_byte<E: Editor + ?Sized>(
    ciphertext: &[u8],
    editor: &E,
    offset: usize,
    plaintext: &mut Vec<u8>,
) -> Result<()> {
    let byte = (0..=255u8)
        .find(|&byte| editor.edit(ciphertext, offset, &[byte]) == ciphertext)
        .ok_or_else(|| {
            Error::AttackFailed(format!("no edit at offset {offset} left the ciphertext unchanged"))
        })?;
    plaintext.push(byte);
    Ok(())
}

/// Recover the plaintext with a single query.
///
/// CTR encryption and decryption are the same operation, so "editing" the
/// whole ciphertext into itself makes the oracle decrypt it for us.
pub fn decrypt_editable_ctr_by_reencryption<E: Editor + ?Sized>(
    ciphertext: &[u8],
    editor: &E,
) -> Result<Vec<u8>> {
    let plaintext = editor.edit(ciphertext, 0, ciphertext);
    if plaintext.len() != ciphertext.len() {
        return Err(Error::LengthMismatch {
            left: ciphertext.len(),
            right: plaintext.len(),
        });
    }
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{random_bytes_with_seed, CtrEditOracle};

    const PLAINTEXT: &[u8] = b"I'm back and I'm ringin' the bell\nA rockin' on the mike while the fly girls yell";

    fn oracle() -> CtrEditOracle {
        CtrEditOracle::new(random_bytes_with_seed::<16>(101), 0x1234).unwrap()
    }

    #[test]
    fn decrypt_editable_ctr_recovers_plaintext() {
        let oracle = oracle();
        let ciphertext = oracle.encrypt(PLAINTEXT).unwrap();

        let recovered = decrypt_editable_ctr(&ciphertext, &oracle).unwrap();

        assert_eq!(recovered, PLAINTEXT);
    }

    #[test]
    fn decrypt_editable_ctr_by_reencryption_recovers_plaintext() {
        let oracle = oracle();
        let ciphertext = oracle.encrypt(PLAINTEXT).unwrap();

        let recovered = decrypt_editable_ctr_by_reencryption(&ciphertext, &oracle).unwrap();

        assert_eq!(recovered, PLAINTEXT);
    }

    #[test]
    fn decrypt_editable_ctr_handles_empty_ciphertext() {
        assert_eq!(decrypt_editable_ctr(&[], &oracle()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decrypt_editable_ctr_fails_when_no_edit_is_a_no_op() {
        let editor = |ciphertext: &[u8], _: usize, _: &[u8]| {
            ciphertext.iter().map(|b| !b).collect::<Vec<u8>>()
        };

        let result = decrypt_editable_ctr(b"abc", &editor);

        assert_eq!(
            result,
            Err(Error::AttackFailed(
                "no edit at offset 0 left the ciphertext unchanged".to_string()
            ))
        );
    }
}
