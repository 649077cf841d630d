use super::codec::split_words;
use super::timing::MorseSymbol;

fn symbol_for(ch: char) -> Option<MorseSymbol> {
    match ch {
        '.' | '·' => Some(MorseSymbol::Dot),
        '-' | '_' | '−' => Some(MorseSymbol::Dash),
        _ => None,
    }
}

/// Convert a Morse string to the symbol sequence played back by a session.
///
/// Letters are separated by single spaces, words by `/` or a double space.
/// Characters that are neither dots nor dashes are skipped, and a letter made
/// only of such characters produces nothing.
pub fn tokenize(morse: &str) -> Vec<MorseSymbol> {
    let mut symbols = Vec::new();

    for word in split_words(morse) {
        let letters: Vec<Vec<MorseSymbol>> = word
            .split(' ')
            .map(|letter| letter.chars().filter_map(symbol_for).collect::<Vec<_>>())
            .filter(|letter| !letter.is_empty())
            .collect();

        if letters.is_empty() {
            continue;
        }

        if !symbols.is_empty() {
            symbols.push(MorseSymbol::WordGap);
        }

        for (letter_idx, letter) in letters.iter().enumerate() {
            if letter_idx > 0 {
                symbols.push(MorseSymbol::LetterGap);
            }
            symbols.extend_from_slice(letter);
        }
    }

    symbols
}
