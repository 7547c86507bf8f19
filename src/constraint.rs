//! Acrostic constraint checking for generated limericks.
//!
//! This module parses raw model output into poem blocks and verifies the
//! end-word initials of the first five lines against a normalized
//! five-letter key. All functions are pure; parsing follows explicit
//! tokenization rules rather than one monolithic pattern so each edge
//! case (punctuation, numbering prefixes, blank lines) is testable on
//! its own.

/// Trailing characters stripped from a line before the terminal word is
/// extracted: sentence punctuation plus closing quotes and brackets.
const TRAILING_PUNCT: &[char] = &[
    '.', '!', '?', ';', ',', ':', '"', '\'', '»', '”', '’', ')', ']',
];

/// Normalize arbitrary user input into an acrostic letter key.
///
/// Full-width Latin letters (U+FF21–U+FF3A, U+FF41–U+FF5A) are folded to
/// half-width by the fixed 0xFEE0 offset, every remaining non-ASCII-letter
/// is dropped, the result is uppercased and truncated to 5 characters.
///
/// Always succeeds; the result has length 0–5. Any length other than 5
/// means "no key" and disables constraint checking.
pub fn normalize_letters(input: &str) -> String {
    input
        .chars()
        .map(fold_fullwidth)
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(5)
        .collect()
}

/// Fold a full-width Latin letter to its half-width equivalent.
fn fold_fullwidth(c: char) -> char {
    match c {
        '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' => ((c as u32 - 0xFEE0) as u8) as char,
        _ => c,
    }
}

/// Extract the last alphabetic word of a line.
///
/// Surrounding whitespace is trimmed and trailing punctuation / closing
/// quotes are stripped, then the trailing run of word characters (ASCII
/// letters with internal hyphens or apostrophes) is taken. The word must
/// begin with a letter; a line with no alphabetic content yields the
/// empty string, which fails any per-letter comparison.
pub fn extract_terminal_word(line: &str) -> String {
    let stripped = line.trim().trim_end_matches(TRAILING_PUNCT);

    // Earliest index of the trailing word-character run, if any.
    let run_start = stripped
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i);

    let Some(start) = run_start else {
        return String::new();
    };
    let run = &stripped[start..];

    // Leading apostrophes/hyphens are not part of the word.
    match run.find(|c: char| c.is_ascii_alphabetic()) {
        Some(i) => run[i..].to_string(),
        None => String::new(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-' || c == '\''
}

/// Split raw generation output into poem blocks.
///
/// Blocks are separated by one or more blank (whitespace-only) lines.
/// Within a block, a leading `<digits>) ` numbering prefix is stripped
/// from each line and lines that are empty afterwards are dropped.
/// Empty or whitespace-only input yields zero poems.
pub fn split_into_poems(raw: &str) -> Vec<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut poems = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut in_block = false;

    for line in trimmed.lines() {
        if line.trim().is_empty() {
            if in_block {
                poems.push(std::mem::take(&mut current));
                in_block = false;
            }
        } else {
            in_block = true;
            let cleaned = strip_numbering(line);
            if !cleaned.is_empty() {
                current.push(cleaned);
            }
        }
    }
    if in_block {
        poems.push(current);
    }
    poems
}

/// Strip a leading `<digits>) ` enumeration marker, if present.
fn strip_numbering(line: &str) -> String {
    let rest = line.trim_start();
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(after) = rest[digits..].strip_prefix(')') {
            return after.trim_start().to_string();
        }
    }
    line.to_string()
}

/// Check one poem's end-word initials against the letter key.
///
/// Vacuously true when the poem has fewer than 5 lines or the key length
/// is not exactly 5 (nothing to check). Otherwise the uppercased first
/// letter of each of the first five terminal words must equal the key
/// character at the same index.
pub fn poem_satisfies_key(lines: &[String], key: &str) -> bool {
    if lines.len() < 5 || key.chars().count() != 5 {
        return true;
    }

    key.chars().zip(lines.iter()).all(|(expected, line)| {
        extract_terminal_word(line)
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase() == expected.to_ascii_uppercase())
            .unwrap_or(false)
    })
}

/// Check every poem in a raw generation against the letter key.
///
/// Zero poems overall fails, even though short poems pass individually.
pub fn all_poems_satisfy_key(raw: &str, key: &str) -> bool {
    let poems = split_into_poems(raw);
    if poems.is_empty() {
        return false;
    }
    poems.iter().all(|poem| poem_satisfies_key(poem, key))
}
