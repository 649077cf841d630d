use std::collections::HashMap;
use std::sync::OnceLock;

/// Token the encoder emits for a space between words
pub const WORD_SEPARATOR: &str = "/";

const PATTERNS: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

/// Bidirectional character <-> Morse pattern table
pub struct CodeTable {
    forward: HashMap<char, &'static str>,
    inverse: HashMap<&'static str, char>,
}

impl CodeTable {
    /// The international table (letters, digits, common punctuation)
    pub fn standard() -> &'static CodeTable {
        static TABLE: OnceLock<CodeTable> = OnceLock::new();
        TABLE.get_or_init(|| Self::from_pairs(PATTERNS))
    }

    fn from_pairs(pairs: &[(char, &'static str)]) -> Self {
        let forward: HashMap<char, &'static str> = pairs.iter().copied().collect();
        let inverse = pairs.iter().map(|&(ch, pattern)| (pattern, ch)).collect();
        Self { forward, inverse }
    }

    pub fn pattern(&self, ch: char) -> Option<&'static str> {
        self.forward.get(&ch).copied()
    }

    pub fn character(&self, pattern: &str) -> Option<char> {
        self.inverse.get(pattern).copied()
    }
}

/// Convert text to Morse. Letters are separated by single spaces and a space
/// between words becomes `/`. Characters without a pattern are kept as-is.
pub fn encode(text: &str) -> String {
    let table = CodeTable::standard();
    let mut tokens: Vec<String> = Vec::new();

    for ch in text.to_uppercase().chars() {
        if ch == ' ' {
            tokens.push(WORD_SEPARATOR.to_string());
        } else if let Some(pattern) = table.pattern(ch) {
            tokens.push(pattern.to_string());
        } else {
            tokens.push(ch.to_string());
        }
    }

    tokens.join(" ")
}

/// Split Morse into words on `/` or on a double space.
///
/// Every `/` is a word break, so leading, trailing or repeated separators
/// yield empty words and `decode` gives back the spaces `encode` saw. Blank
/// runs between double spaces do not add words.
pub(crate) fn split_words(morse: &str) -> impl Iterator<Item = &str> {
    morse.split(WORD_SEPARATOR).flat_map(|chunk| {
        let blank = chunk.trim().is_empty();
        chunk
            .split("  ")
            .filter(move |word| blank || !word.trim().is_empty())
            .take(if blank { 1 } else { usize::MAX })
    })
}

/// Convert Morse back to text. Patterns without a character are kept as-is.
pub fn decode(morse: &str) -> String {
    let table = CodeTable::standard();

    let words: Vec<String> = split_words(morse)
        .map(|word| {
            word.split(' ')
                .filter(|pattern| !pattern.is_empty())
                .map(|pattern| match table.character(pattern) {
                    Some(ch) => ch.to_string(),
                    None => pattern.to_string(),
                })
                .collect::<String>()
        })
        .collect();

    words.join(" ")
}
