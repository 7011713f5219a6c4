//! Ingredient name normalization and Hangul jamo decomposition

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const MEDIALS_PER_INITIAL: u32 = 21 * 28;
const FINALS_PER_MEDIAL: u32 = 28;

const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

const MEDIALS: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ',
    'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

// Index 0 is "no final consonant"
const FINALS: [Option<char>; 28] = [
    None,
    Some('ㄱ'),
    Some('ㄲ'),
    Some('ㄳ'),
    Some('ㄴ'),
    Some('ㄵ'),
    Some('ㄶ'),
    Some('ㄷ'),
    Some('ㄹ'),
    Some('ㄺ'),
    Some('ㄻ'),
    Some('ㄼ'),
    Some('ㄽ'),
    Some('ㄾ'),
    Some('ㄿ'),
    Some('ㅀ'),
    Some('ㅁ'),
    Some('ㅂ'),
    Some('ㅄ'),
    Some('ㅅ'),
    Some('ㅆ'),
    Some('ㅇ'),
    Some('ㅈ'),
    Some('ㅊ'),
    Some('ㅋ'),
    Some('ㅌ'),
    Some('ㅍ'),
    Some('ㅎ'),
];

/// Split a compound vowel or consonant cluster into its parts
fn split_compound(jamo: char) -> Option<[char; 2]> {
    let parts = match jamo {
        'ㅘ' => ['ㅗ', 'ㅏ'],
        'ㅙ' => ['ㅗ', 'ㅐ'],
        'ㅚ' => ['ㅗ', 'ㅣ'],
        'ㅝ' => ['ㅜ', 'ㅓ'],
        'ㅞ' => ['ㅜ', 'ㅔ'],
        'ㅟ' => ['ㅜ', 'ㅣ'],
        'ㅢ' => ['ㅡ', 'ㅣ'],
        'ㄳ' => ['ㄱ', 'ㅅ'],
        'ㄵ' => ['ㄴ', 'ㅈ'],
        'ㄶ' => ['ㄴ', 'ㅎ'],
        'ㄺ' => ['ㄹ', 'ㄱ'],
        'ㄻ' => ['ㄹ', 'ㅁ'],
        'ㄼ' => ['ㄹ', 'ㅂ'],
        'ㄽ' => ['ㄹ', 'ㅅ'],
        'ㄾ' => ['ㄹ', 'ㅌ'],
        'ㄿ' => ['ㄹ', 'ㅍ'],
        'ㅀ' => ['ㄹ', 'ㅎ'],
        'ㅄ' => ['ㅂ', 'ㅅ'],
        _ => return None,
    };
    Some(parts)
}

fn push_jamo(out: &mut String, jamo: char) {
    match split_compound(jamo) {
        Some([first, second]) => {
            out.push(first);
            out.push(second);
        }
        None => out.push(jamo),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('가'..='힣').contains(&c)
}

/// Strip everything except Hangul syllables, ASCII letters and digits
///
/// Case is preserved. Idempotent; empty input gives an empty string.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|&c| is_name_char(c)).collect()
}

/// Decompose Hangul syllables into compatibility jamo for distance scoring
///
/// Compound vowels and consonant clusters are split into their components
/// so that near-miss spellings stay close. Non-Hangul characters pass
/// through unchanged.
pub fn phonetic_form(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);

    for c in text.chars() {
        let code = c as u32;
        if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
            push_jamo(&mut out, c);
            continue;
        }

        let index = code - SYLLABLE_BASE;
        let initial = (index / MEDIALS_PER_INITIAL) as usize;
        let medial = ((index % MEDIALS_PER_INITIAL) / FINALS_PER_MEDIAL) as usize;
        let final_ = (index % FINALS_PER_MEDIAL) as usize;

        out.push(INITIALS[initial]);
        push_jamo(&mut out, MEDIALS[medial]);
        if let Some(jamo) = FINALS[final_] {
            push_jamo(&mut out, jamo);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_punctuation() {
        assert_eq!(normalize(" 깐 마늘(국산) 1kg! "), "깐마늘국산1kg");
        assert_eq!(normalize("Olive-Oil"), "OliveOil");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ..."), "");
    }

    #[test]
    fn test_normalize_drops_standalone_jamo() {
        assert_eq!(normalize("ㅋㅋ감자"), "감자");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["  대파 한 단 ", "A-1 소스", "ㄱㄴ", "", "양파/당근"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_phonetic_form_basic() {
        assert_eq!(phonetic_form("감자"), "ㄱㅏㅁㅈㅏ");
        assert_eq!(phonetic_form("김치"), "ㄱㅣㅁㅊㅣ");
    }

    #[test]
    fn test_phonetic_form_splits_compound_medials() {
        // 과 = ㄱ + ㅘ(ㅗㅏ)
        assert_eq!(phonetic_form("사과"), "ㅅㅏㄱㅗㅏ");
        assert_eq!(phonetic_form("의"), "ㅇㅡㅣ");
    }

    #[test]
    fn test_phonetic_form_splits_compound_finals() {
        // 닭 = ㄷ + ㅏ + ㄺ(ㄹㄱ)
        assert_eq!(phonetic_form("닭"), "ㄷㅏㄹㄱ");
        assert_eq!(phonetic_form("값"), "ㄱㅏㅂㅅ");
    }

    #[test]
    fn test_phonetic_form_keeps_double_consonants() {
        assert_eq!(phonetic_form("깻잎"), "ㄲㅐㅅㅇㅣㅍ");
    }

    #[test]
    fn test_phonetic_form_passthrough_and_standalone_jamo() {
        assert_eq!(phonetic_form("egg 1"), "egg 1");
        assert_eq!(phonetic_form("ㄺㅘ"), "ㄹㄱㅗㅏ");
        assert_eq!(phonetic_form(""), "");
    }
}
