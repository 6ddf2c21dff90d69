// Contracts for the victim functions the attacks query.
//
// Attacks only see these traits, never a key or a concrete cipher. Plain
// closures of the matching shape implement them, so a test can wrap any
// encryption routine in a `move |input| ...` and hand it to an attack.

/// Encrypts attacker-supplied bytes together with material the attacker
/// cannot see.
pub trait Encryptor {
    fn encrypt(&self, input: &[u8]) -> Vec<u8>;
}

/// Reports whether a ciphertext decrypts to validly padded plaintext.
pub trait PaddingValidator {
    fn is_valid_padding(&self, ciphertext: &[u8]) -> bool;
}

/// Re-encrypts `ciphertext` after substituting `new_text` into the plaintext
/// at `offset`, reusing the original key and nonce.
pub trait Editor {
    fn edit(&self, ciphertext: &[u8], offset: usize, new_text: &[u8]) -> Vec<u8>;
}

impl<F> Encryptor for F
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn encrypt(&self, input: &[u8]) -> Vec<u8> {
        self(input)
    }
}

impl<F> PaddingValidator for F
where
    F: Fn(&[u8]) -> bool,
{
    fn is_valid_padding(&self, ciphertext: &[u8]) -> bool {
        self(ciphertext)
    }
}

impl<F> Editor for F
where
    F: Fn(&[u8], usize, &[u8]) -> Vec<u8>,
{
    fn edit(&self, ciphertext: &[u8], offset: usize, new_text: &[u8]) -> Vec<u8> {
        self(ciphertext, offset, new_text)
    }
}
