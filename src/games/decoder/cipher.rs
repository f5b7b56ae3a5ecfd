//! Substitution ciphers: one code of up to three characters per source
//! character, plus the fixed challenge and practice material.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

pub const PUNCTUATION: [char; 32] = [
    ' ', '.', ',', '!', '?', ';', ':', '\'', '"', '-', '(', ')', '[', ']', '{', '}', '@', '#', '$',
    '%', '^', '&', '*', '+', '=', '<', '>', '/', '\\', '|', '`', '~',
];

const MAX_CODE_LEN: usize = 3;
const MIXED_EXTRAS: [&str; 9] = ["AA", "BB", "CC", "11", "22", "33", "X1", "Y2", "Z3"];

pub const CHALLENGE_MESSAGES: [&str; 8] = [
    "MEET ME AT MIDNIGHT",
    "THE TREASURE IS BURIED UNDER THE OLD OAK TREE",
    "ATTACK AT DAWN",
    "THE PASSWORD IS FRIENDSHIP",
    "BEWARE THE ENEMY SPY",
    "MISSION ACCOMPLISHED",
    "HELP IS ON THE WAY",
    "THE SECRET IS SAFE",
];

pub const PRACTICE_SENTENCES: [&str; 12] = [
    "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG",
    "HELLO WORLD THIS IS A SECRET MESSAGE",
    "MEET ME AT THE OLD OAK TREE AT MIDNIGHT",
    "THE PASSWORD IS FRIENDSHIP AND TRUST",
    "BEWARE THE ENEMY SPY IN OUR RANKS",
    "MISSION ACCOMPLISHED RETURN TO BASE",
    "THE TREASURE IS BURIED UNDER THE ROCK",
    "HELP IS ON THE WAY STAY STRONG",
    "CODE RED ABORT THE MISSION IMMEDIATELY",
    "ALL IS WELL THE COAST IS CLEAR",
    "DANGER AHEAD PROCEED WITH CAUTION",
    "THE KEY IS HIDDEN IN THE LIBRARY",
];

pub const PRACTICE_ROUND_SIZE: usize = 3;

pub fn letters() -> impl DoubleEndedIterator<Item = char>
{
    'A'..='Z'
}

pub fn digits() -> impl DoubleEndedIterator<Item = char>
{
    '0'..='9'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass
{
    Letter,
    Digit,
    Punctuation,
}

pub fn class_of(ch: char) -> Option<CharClass>
{
    if ch.is_ascii_uppercase() {
        Some(CharClass::Letter)
    } else if ch.is_ascii_digit() {
        Some(CharClass::Digit)
    } else if PUNCTUATION.contains(&ch) {
        Some(CharClass::Punctuation)
    } else {
        None
    }
}

fn sanitize(class: CharClass, value: &str) -> String
{
    let cleaned: String = match class {
        CharClass::Letter | CharClass::Digit => value
            .chars()
            .map(|ch| ch.to_ascii_uppercase())
            .filter(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
            .collect(),
        CharClass::Punctuation => value.chars().map(|ch| ch.to_ascii_uppercase()).collect(),
    };
    cleaned.chars().take(MAX_CODE_LEN).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherMap
{
    codes: BTreeMap<char, String>,
}

impl CipherMap
{
    /// Sets the code for `source` after cleaning it for the source's class.
    /// Sources outside the three alphabets are ignored; an empty code clears
    /// the entry.
    pub fn set(&mut self, source: char, value: &str) -> Option<&str>
    {
        let class = class_of(source)?;
        let code = sanitize(class, value);
        if code.is_empty() {
            self.codes.remove(&source);
            return None;
        }
        self.codes.insert(source, code);
        self.codes.get(&source).map(String::as_str)
    }

    pub fn get(&self, source: char) -> Option<&str>
    {
        self.codes.get(&source).map(String::as_str)
    }

    pub fn clear(&mut self)
    {
        self.codes.clear();
    }

    pub fn has_mappings(&self) -> bool
    {
        !self.codes.is_empty()
    }

    pub fn encode(&self, message: &str) -> String
    {
        let mut out = String::with_capacity(message.len());
        for ch in message.chars() {
            let code = if ch == ' ' {
                self.get(' ')
            } else {
                self.get(ch.to_ascii_uppercase()).or_else(|| self.get(ch))
            };
            match code {
                Some(code) => out.push_str(code),
                None => out.push(ch),
            }
        }
        out
    }

    pub fn key_listing(&self) -> Vec<String>
    {
        letters()
            .filter_map(|letter| self.get(letter).map(|code| format!("{letter} -> {code}")))
            .collect()
    }

    pub fn caesar(shift: u8) -> Self
    {
        let mut map = Self::default();
        for (index, letter) in letters().enumerate() {
            let shifted = (b'A' + ((index as u8 + shift) % 26)) as char;
            map.set(letter, &shifted.to_string());
        }
        map
    }

    pub fn atbash() -> Self
    {
        let mut map = Self::default();
        for (index, letter) in letters().enumerate() {
            let mirrored = (b'Z' - index as u8) as char;
            map.set(letter, &mirrored.to_string());
        }
        map
    }

    pub fn reverse_alphabet() -> Self
    {
        let reversed: Vec<char> = letters().rev().collect();
        let mut map = Self::default();
        for (letter, target) in letters().zip(reversed) {
            map.set(letter, &target.to_string());
        }
        map
    }

    pub fn letter_numbers() -> Self
    {
        let mut map = Self::default();
        for (index, letter) in letters().enumerate() {
            map.set(letter, &(index + 1).to_string());
        }
        map
    }

    /// Letters and digits mapped to a shuffled mix of letters, digits and
    /// two-character codes.
    pub fn randomized(rng: &mut impl Rng) -> Self
    {
        let mut options: Vec<String> = letters()
            .chain(digits())
            .map(String::from)
            .chain(MIXED_EXTRAS.iter().map(|code| code.to_string()))
            .collect();
        options.shuffle(rng);

        let mut map = Self::default();
        for (source, code) in letters().chain(digits()).zip(options.iter()) {
            map.set(source, code);
        }
        map
    }
}

pub struct Preset
{
    pub name: &'static str,
    pub description: &'static str,
    pub map: CipherMap,
}

pub fn presets() -> Vec<Preset>
{
    vec![
        Preset {
            name: "Caesar Cipher (Shift 3)",
            description: "Each letter is shifted 3 positions forward in the alphabet",
            map: CipherMap::caesar(3),
        },
        Preset {
            name: "Atbash Cipher",
            description: "A maps to Z, B maps to Y, C maps to X, etc.",
            map: CipherMap::atbash(),
        },
        Preset {
            name: "Reverse Alphabet",
            description: "A becomes Z, B becomes Y, etc.",
            map: CipherMap::reverse_alphabet(),
        },
        Preset {
            name: "Letter to Number",
            description: "A=1, B=2, C=3, etc.",
            map: CipherMap::letter_numbers(),
        },
    ]
}

pub fn answers_match(attempt: &str, expected: &str) -> bool
{
    attempt.trim().to_uppercase() == expected.to_uppercase()
}

pub struct Challenge
{
    pub preset: Preset,
    pub original: &'static str,
    pub encoded: String,
    pub key_revealed: bool,
    pub last_result: Option<bool>,
}

impl Challenge
{
    pub fn random(rng: &mut impl Rng) -> Self
    {
        let mut all = presets();
        let preset = all.swap_remove(rng.gen_range(0..all.len()));
        let original = CHALLENGE_MESSAGES[rng.gen_range(0..CHALLENGE_MESSAGES.len())];
        let encoded = preset.map.encode(original);
        Self {
            preset,
            original,
            encoded,
            key_revealed: false,
            last_result: None,
        }
    }

    pub fn check(&mut self, attempt: &str) -> bool
    {
        let solved = answers_match(attempt, self.original);
        self.last_result = Some(solved);
        solved
    }

    pub fn reveal_key(&mut self)
    {
        self.key_revealed = true;
    }
}

pub struct PracticeSentence
{
    pub original: &'static str,
    pub encoded: String,
    pub solved: bool,
}

pub struct PracticeRound
{
    pub sentences: Vec<PracticeSentence>,
}

impl PracticeRound
{
    pub fn new(map: &CipherMap, rng: &mut impl Rng) -> Self
    {
        let sentences = PRACTICE_SENTENCES
            .choose_multiple(rng, PRACTICE_ROUND_SIZE)
            .map(|&original| PracticeSentence {
                original,
                encoded: map.encode(original),
                solved: false,
            })
            .collect();
        Self { sentences }
    }

    /// Solved sentences stay solved; checking one again reports success.
    pub fn check(&mut self, index: usize, attempt: &str) -> bool
    {
        let Some(sentence) = self.sentences.get_mut(index) else {
            return false;
        };
        if sentence.solved {
            return true;
        }
        sentence.solved = answers_match(attempt, sentence.original);
        sentence.solved
    }

    pub fn all_solved(&self) -> bool
    {
        self.sentences.iter().all(|sentence| sentence.solved)
    }
}
