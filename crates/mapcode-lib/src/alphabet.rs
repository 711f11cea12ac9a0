//! Alphabet catalog and mapcode transliteration.
//!
//! A mapcode is always defined in Roman characters, but may be presented in
//! other scripts. Transliteration maps the Roman mapcode character set onto a
//! per-script table; digits and punctuation (`.`, `-`, spaces) pass through
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported alphabets, in catalog order. The discriminant is the numeric
/// alphabet code exposed by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alphabet {
    Roman = 0,
    Greek = 1,
    Cyrillic = 2,
    Hebrew = 3,
    Devanagari = 4,
    Arabic = 5,
    Katakana = 6,
    Thai = 7,
}

/// Per-script tables for the Roman letters A-Z.
const GREEK: [char; 26] = [
    'Α', 'Β', 'Ξ', 'Δ', 'Ε', 'Φ', 'Γ', 'Η', 'Ι', 'Π', 'Κ', 'Λ', 'Μ', 'Ν', 'Ο', 'Ρ', 'Θ', 'Ψ',
    'Σ', 'Τ', 'Υ', 'Ω', 'Ϊ', 'Χ', 'Ϋ', 'Ζ',
];
const CYRILLIC: [char; 26] = [
    'А', 'Б', 'Ц', 'Д', 'Е', 'Ф', 'Г', 'Х', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Щ', 'Р',
    'С', 'Т', 'У', 'В', 'Ш', 'Ж', 'Ы', 'З',
];
const HEBREW: [char; 26] = [
    'א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט', 'י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ',
    'ק', 'ר', 'ש', 'ת', 'ך', 'ם', 'ן', 'ף',
];
const DEVANAGARI: [char; 26] = [
    'क', 'ख', 'ग', 'घ', 'ङ', 'च', 'छ', 'ज', 'झ', 'ञ', 'ट', 'ठ', 'ड', 'ढ', 'ण', 'त', 'थ', 'द',
    'ध', 'न', 'प', 'फ', 'ब', 'भ', 'म', 'य',
];
const ARABIC: [char; 26] = [
    'ا', 'ب', 'ت', 'ث', 'ج', 'ح', 'خ', 'د', 'ذ', 'ر', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ع',
    'غ', 'ف', 'ق', 'ك', 'ل', 'م', 'ن', 'ه',
];
const KATAKANA: [char; 26] = [
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ',
    'タ', 'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ',
];
const THAI: [char; 26] = [
    'ก', 'ข', 'ค', 'ง', 'จ', 'ฉ', 'ช', 'ซ', 'ญ', 'ด', 'ต', 'ถ', 'ท', 'ธ', 'น', 'บ', 'ป', 'ผ',
    'ฝ', 'พ', 'ฟ', 'ภ', 'ม', 'ย', 'ร', 'ล',
];

const ALL: [Alphabet; 8] = [
    Alphabet::Roman,
    Alphabet::Greek,
    Alphabet::Cyrillic,
    Alphabet::Hebrew,
    Alphabet::Devanagari,
    Alphabet::Arabic,
    Alphabet::Katakana,
    Alphabet::Thai,
];

impl Alphabet {
    /// All supported alphabets, in numeric-code order.
    pub fn all() -> &'static [Alphabet] {
        &ALL
    }

    /// Number of supported alphabets.
    pub fn count() -> usize {
        ALL.len()
    }

    /// Canonical catalog name (upper case).
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Roman => "ROMAN",
            Alphabet::Greek => "GREEK",
            Alphabet::Cyrillic => "CYRILLIC",
            Alphabet::Hebrew => "HEBREW",
            Alphabet::Devanagari => "DEVANAGARI",
            Alphabet::Arabic => "ARABIC",
            Alphabet::Katakana => "KATAKANA",
            Alphabet::Thai => "THAI",
        }
    }

    /// Numeric alphabet code, bounded by [`Alphabet::count`].
    pub fn number(&self) -> usize {
        *self as usize
    }

    /// Resolve an alphabet by name (case-insensitive) or numeric code.
    pub fn resolve(input: &str) -> Result<Alphabet> {
        let trimmed = input.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return ALL
                .get(number)
                .copied()
                .ok_or_else(|| Error::UnknownAlphabet {
                    name: input.to_string(),
                });
        }
        let upper = trimmed.to_ascii_uppercase();
        ALL.iter()
            .find(|a| a.name() == upper)
            .copied()
            .ok_or_else(|| Error::UnknownAlphabet {
                name: input.to_string(),
            })
    }

    /// Transliterate a Roman mapcode (or territory code) into this alphabet.
    ///
    /// Upper-case ASCII letters are mapped through the script table; digits,
    /// the `.` and `-` separators and spaces are kept as-is.
    pub fn transliterate(&self, code: &str) -> String {
        let table: Option<&[char; 26]> = match self {
            Alphabet::Roman => None,
            Alphabet::Greek => Some(&GREEK),
            Alphabet::Cyrillic => Some(&CYRILLIC),
            Alphabet::Hebrew => Some(&HEBREW),
            Alphabet::Devanagari => Some(&DEVANAGARI),
            Alphabet::Arabic => Some(&ARABIC),
            Alphabet::Katakana => Some(&KATAKANA),
            Alphabet::Thai => Some(&THAI),
        };
        let Some(table) = table else {
            return code.to_string();
        };
        code.chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    table[(c as u8 - b'A') as usize]
                } else {
                    c
                }
            })
            .collect()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_by_name_is_case_insensitive() {
        assert_eq!(Alphabet::resolve("greek").unwrap(), Alphabet::Greek);
        assert_eq!(Alphabet::resolve("ROMAN").unwrap(), Alphabet::Roman);
        assert_eq!(Alphabet::resolve(" Cyrillic ").unwrap(), Alphabet::Cyrillic);
    }

    #[test]
    fn resolve_by_number() {
        assert_eq!(Alphabet::resolve("0").unwrap(), Alphabet::Roman);
        assert_eq!(Alphabet::resolve("7").unwrap(), Alphabet::Thai);
        assert!(Alphabet::resolve("8").is_err());
    }

    #[test]
    fn resolve_unknown_fails() {
        assert!(matches!(
            Alphabet::resolve("KLINGON"),
            Err(Error::UnknownAlphabet { .. })
        ));
    }

    #[test]
    fn numbers_are_bounded_by_count() {
        for alphabet in Alphabet::all() {
            assert!(alphabet.number() < Alphabet::count());
        }
    }

    #[test]
    fn roman_transliteration_is_identity() {
        assert_eq!(Alphabet::Roman.transliterate("XQ.PZ-3F"), "XQ.PZ-3F");
    }

    #[test]
    fn greek_transliteration_keeps_digits_and_separators() {
        let out = Alphabet::Greek.transliterate("XQ.P9");
        assert!(out.contains('.'));
        assert!(out.contains('9'));
        assert!(!out.contains('X'));
    }

    #[test]
    fn tables_map_every_letter() {
        for alphabet in Alphabet::all() {
            let out = alphabet.transliterate("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
            assert_eq!(out.chars().count(), 26, "{alphabet}");
        }
    }
}
