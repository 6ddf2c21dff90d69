// Breaking CTR with a reused nonce.
//
// With the same key and nonce every message is XORed with the same keystream.
// Byte i of every ciphertext is therefore byte i of some plaintext XORed with
// the same keystream byte, which is plain single-byte XOR. Solving each
// column in turn gives the keystream.
//
// Later columns draw on fewer ciphertexts, so their statistics get worse and
// the tail of the longest messages is less reliable.
use tracing::debug;

use crate::{repeating_xor, EnglishFrequencySolver, SingleByteXorSolver};

/// Recover English plaintexts encrypted under one key and one nonce.
pub fn decrypt_ctr_ciphertexts_with_fixed_nonce<T: AsRef<[u8]>>(ciphertexts: &[T]) -> Vec<Vec<u8>> {
    decrypt_ctr_ciphertexts_with_fixed_nonce_and_solver(ciphertexts, &EnglishFrequencySolver)
}

pub fn decrypt_ctr_ciphertexts_with_fixed_nonce_and_solver<T, S>(
    ciphertexts: &[T],
    solver: &S,
) -> Vec<Vec<u8>>
where
    T: AsRef<[u8]>,
    S: SingleByteXorSolver + ?Sized,
{
    let keystream = recover_fixed_nonce_keystream(ciphertexts, solver);
    ciphertexts
        .iter()
        .map(|ciphertext| repeating_xor(ciphertext.as_ref(), &keystream))
        .collect()
}

/// Keystream as long as the longest ciphertext.
pub fn recover_fixed_nonce_keystream<T, S>(ciphertexts: &[T], solver: &S) -> Vec<u8>
where
    T: AsRef<[u8]>,
    S: SingleByteXorSolver + ?Sized,
{
    let max_len = ciphertexts
        .iter()
        .map(|ciphertext| ciphertext.as_ref().len())
        .max()
        .unwrap_or(0);

    let mut keystream = Vec::with_capacity(max_len);
    let mut column = Vec::with_capacity(ciphertexts.len());
    for i in 0..max_len {
        column.clear();
        column.extend(
            ciphertexts
                .iter()
                .filter_map(|ciphertext| ciphertext.as_ref().get(i).copied()),
        );
        keystream.push(solver.solve(&column).key);
    }
    debug!(len = keystream.len(), "recovered keystream");
    keystream
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{encrypt_ctr, random_bytes_with_seed, Aes128Block, XorKeyGuess};

    const EASTER_1916: [&str; 40] = [
        "I have met them at close of day",
        "Coming with vivid faces",
        "From counter or desk among grey",
        "Eighteenth-century houses.",
        "I have passed with a nod of the head",
        "Or polite meaningless words,",
        "Or have lingered awhile and said",
        "Polite meaningless words,",
        "And thought before I had done",
        "Of a mocking tale or a gibe",
        "To please a companion",
        "Around the fire at the club,",
        "Being certain that they and I",
        "But lived where motley is worn:",
        "All changed, changed utterly:",
        "A terrible beauty is born.",
        "That woman's days were spent",
        "In ignorant good will,",
        "Her nights in argument",
        "Until her voice grew shrill.",
        "What voice more sweet than hers",
        "When young and beautiful,",
        "She rode to harriers?",
        "This man had kept a school",
        "And rode our winged horse.",
        "This other his helper and friend",
        "Was coming into his force;",
        "He might have won fame in the end,",
        "So sensitive his nature seemed,",
        "So daring and sweet his thought.",
        "This other man I had dreamed",
        "A drunken, vain-glorious lout.",
        "He had done most bitter wrong",
        "To some who are near my heart,",
        "Yet I number him in the song;",
        "He, too, has resigned his part",
        "In the casual comedy;",
        "He, too, has been changed in his turn,",
        "Transformed utterly:",
        "A terrible beauty is born.",
    ];

    #[test]
    fn decrypt_ctr_ciphertexts_with_fixed_nonce_recovers_plaintexts() {
        let cipher = Aes128Block::new(&random_bytes_with_seed::<16>(101)).unwrap();
        let ciphertexts: Vec<Vec<u8>> = EASTER_1916
            .iter()
            .map(|line| encrypt_ctr(line.as_bytes(), &cipher, 0).unwrap())
            .collect();

        let recovered = decrypt_ctr_ciphertexts_with_fixed_nonce(&ciphertexts);

        // Frequency analysis is statistical: only the columns every
        // ciphertext contributes to are checked, and a few misses are allowed.
        // Case is ignored since a flipped 0x20 bit only changes letter case.
        const N_CHARS_TO_CHECK: usize = 20;
        let mut n_checked = 0;
        let mut n_matched = 0;
        for (ptext, expected) in recovered.iter().zip(EASTER_1916) {
            assert_eq!(ptext.len(), expected.len());
            for (a, b) in ptext.iter().zip(expected.bytes()).take(N_CHARS_TO_CHECK) {
                n_checked += 1;
                if a.eq_ignore_ascii_case(&b) {
                    n_matched += 1;
                }
            }
        }
        assert!(
            n_matched * 10 >= n_checked * 9,
            "only {n_matched} of {n_checked} bytes recovered"
        );
    }

    #[test]
    fn recover_fixed_nonce_keystream_uses_solver_per_column() {
        let ciphertexts = [vec![1u8, 2, 3], vec![4u8]];
        let solver = |column: &[u8]| XorKeyGuess {
            key: column.len() as u8,
            score: 0.0,
            plaintext: Vec::new(),
        };

        let keystream = recover_fixed_nonce_keystream(&ciphertexts, &solver);
        let plaintexts = decrypt_ctr_ciphertexts_with_fixed_nonce_and_solver(&ciphertexts, &solver);

        assert_eq!(keystream, vec![2, 1, 1]);
        assert_eq!(plaintexts, vec![vec![1 ^ 2, 2 ^ 1, 3 ^ 1], vec![4 ^ 2]]);
    }

    #[test]
    fn decrypt_ctr_ciphertexts_with_fixed_nonce_handles_no_input() {
        let ciphertexts: [&[u8]; 0] = [];

        assert!(decrypt_ctr_ciphertexts_with_fixed_nonce(&ciphertexts).is_empty());
    }
}
