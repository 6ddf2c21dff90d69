// Single-byte XOR key recovery by scoring candidate plaintexts as English.
use rayon::prelude::*;

// http://practicalcryptography.com/cryptanalysis/letter-frequencies-various-languages/english-letter-frequencies/
const LETTER_FREQUENCIES: [f64; 26] = [
    0.08551690673195275,   // A
    0.016047959168228293,  // B
    0.03164435380900101,   // C
    0.03871183735737418,   // D
    0.1209652247516903,    // E
    0.021815103969122528,  // F
    0.020863354250923158,  // G
    0.04955707280570641,   // H
    0.0732511860723129,    // I
    0.002197788956104563,  // J
    0.008086975227142329,  // K
    0.04206464329306453,   // L
    0.025263217360184446,  // M
    0.07172184876283856,   // N
    0.07467265410810447,   // O
    0.020661660788966266,  // P
    0.0010402453014323196, // Q
    0.0633271013284023,    // R
    0.06728203117491646,   // S
    0.08938126949659495,   // T
    0.026815809362304373,  // U
    0.01059346274662571,   // V
    0.018253618950416498,  // W
    0.0019135048594134572, // X
    0.017213606152473405,  // Y
    0.001137563214703838,  // Z
];
const PUNCTUATION_CHARS: &[u8] = b" ,.!?'\":;-";

#[derive(Debug, Clone, PartialEq)]
pub struct XorKeyGuess {
    pub key: u8,
    pub score: f64,
    pub plaintext: Vec<u8>,
}

/// Recovers the key byte of a single-byte-XOR ciphertext.
pub trait SingleByteXorSolver {
    fn solve(&self, ciphertext: &[u8]) -> XorKeyGuess;
}

impl<F> SingleByteXorSolver for F
where
    F: Fn(&[u8]) -> XorKeyGuess,
{
    fn solve(&self, ciphertext: &[u8]) -> XorKeyGuess {
        self(ciphertext)
    }
}

/// Solver that assumes the plaintext is English.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishFrequencySolver;

impl SingleByteXorSolver for EnglishFrequencySolver {
    fn solve(&self, ciphertext: &[u8]) -> XorKeyGuess {
        brute_force_byte_xor_cipher(ciphertext)
    }
}

/// Tries every key byte and keeps the most English-looking plaintext.
///
/// Equal scores resolve to the lowest key. Input with no letters under any key
/// yields key 0 and the input unchanged.
pub fn brute_force_byte_xor_cipher(bytes: &[u8]) -> XorKeyGuess {
    (0..=255u8)
        .into_par_iter()
        .map(|key| {
            let plaintext = xor_with_key(bytes, key);
            XorKeyGuess {
                key,
                score: score_english_by_frequency(&plaintext),
                plaintext,
            }
        })
        .filter(|guess| !guess.score.is_nan())
        .reduce_with(|best, guess| if guess.score > best.score { guess } else { best })
        .unwrap_or_else(|| XorKeyGuess {
            key: 0,
            score: 0.0,
            plaintext: bytes.to_vec(),
        })
}

fn xor_with_key(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

/// How English `bytes` looks; higher is better.
///
/// Blends the share of letters and punctuation with the chi-squared distance
/// of the letter counts from English. The distance carries full weight from
/// 40 bytes on. Letters are counted case-insensitively, so spaces and
/// punctuation are what separate a key from the same key with 0x20 flipped.
/// Returns NaN when there are no letters at all.
pub fn score_english_by_frequency(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }

    let stats = TextStats::new(bytes);
    let distance = stats.letter_distance().abs();
    if distance == 0.0 {
        return 1.0;
    }

    let weight = stats.relevance / bytes.len() as f64;
    let confidence = (bytes.len() as f64 / 40.0).min(1.0);
    confidence * (weight / distance) + (1.0 - confidence) * weight
}

struct TextStats {
    letters: [u64; 26],
    /// Letters count one, punctuation half.
    relevance: f64,
}

impl TextStats {
    fn new(bytes: &[u8]) -> Self {
        let mut stats = Self {
            letters: [0; 26],
            relevance: 0.0,
        };
        for &b in bytes {
            match b.to_ascii_lowercase() {
                letter @ b'a'..=b'z' => {
                    stats.letters[(letter - b'a') as usize] += 1;
                    stats.relevance += 1.0;
                }
                _ if PUNCTUATION_CHARS.contains(&b) => stats.relevance += 0.5,
                _ => {}
            }
        }
        stats
    }

    /// Chi-squared distance of the letter counts from English.
    fn letter_distance(&self) -> f64 {
        let total: u64 = self.letters.iter().sum();
        if total == 0 {
            return f64::NAN;
        }
        self.letters
            .iter()
            .zip(LETTER_FREQUENCIES)
            .map(|(&seen, frequency)| {
                let expected = frequency * total as f64;
                (seen as f64 - expected).powi(2) / expected
            })
            .sum()
    }
}
