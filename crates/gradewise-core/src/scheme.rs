//! Marking-scheme grammar.
//!
//! Every pattern used to read marking text lives here, so matching behaviour
//! can be tested in isolation from scoring.
//!
//! Pattern precedence:
//!
//! * **Points**: bullet/numbered lines win. Sentence segmentation is used only
//!   when the text contains no marker line at all.
//! * **Multiple-choice answer**: `answer: x` / `correct answer x` is tried
//!   first; `x is correct` / `x correct` only when the first form is absent.
//!   The first match in the text wins.
//! * **Numeric target**: the first number after `answer`, `correct answer`,
//!   or `=`, with an optional `is` in between (`The answer is 12`).
//! * **Response number**: the first signed decimal anywhere in the response.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line opening a bullet or numbered point: `*`, `-`, or `<digits>.`
/// followed by whitespace (or nothing).
static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\*|-|\d+\.)(?:\s+|$)").expect("valid bullet pattern"));

static OPTION_AFTER_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:correct answer|answer)[:\s]+([a-e])").expect("valid option pattern")
});

static OPTION_BEFORE_CORRECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-e])(?:\s+is correct|\s+correct)").expect("valid option pattern")
});

static NUMERIC_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:correct answer|answer|=)(?:\s+is)?[:\s]+([-+]?\d*\.?\d+)")
        .expect("valid numeric target pattern")
});

static SIGNED_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("valid decimal pattern"));

static UNSIGNED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"));

static FORMULA_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)formula[:\s]+([^\n]*)").expect("valid formula pattern"));

static STEPS_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)steps?[:\s]+([^\n]*)").expect("valid steps pattern"));

/// Sentences of this many characters or fewer are noise.
const MIN_SENTENCE_CHARS: usize = 10;

/// Split marking text into point texts, in order.
pub fn segment_points(text: &str) -> Vec<String> {
    let bullets = bullet_points(text);
    if !bullets.is_empty() {
        return bullets;
    }
    sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bullet or numbered points. A point runs from its marker to the next
/// marker line (or the end of the text) and may span several lines.
/// Text before the first marker is ignored.
pub fn bullet_points(text: &str) -> Vec<String> {
    let mut points = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if let Some(marker) = BULLET_MARKER.find(line) {
            if let Some(point) = current.take() {
                points.push(point);
            }
            current = Some(line[marker.end()..].to_string());
        } else if let Some(point) = current.as_mut() {
            point.push('\n');
            point.push_str(line);
        }
    }
    if let Some(point) = current {
        points.push(point);
    }

    points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split after `.`, `!` or `?` wherever whitespace follows. Sentences are
/// returned untrimmed.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            out.push(&text[start..i]);
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    out.push(&text[start..]);
    out
}

/// The correct option letter (`a`–`e`, lowercase) of a multiple-choice scheme.
pub fn correct_option(text: &str) -> Option<char> {
    OPTION_AFTER_ANSWER
        .captures(text)
        .or_else(|| OPTION_BEFORE_CORRECT.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase())
}

/// The target value of a calculation scheme.
pub fn numeric_target(text: &str) -> Option<f64> {
    NUMERIC_TARGET
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_decimal(m.as_str()))
}

/// Code point of `0` in each block of decimal digits matched by `\d`.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0,
    0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0,
    0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140,
    0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii() {
        return Some(c);
    }
    let code = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .and_then(|&zero| char::from_digit(code - zero, 10))
}

/// Parse a matched decimal, accepting digits from any script.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let ascii: String = raw.chars().map(ascii_digit).collect::<Option<_>>()?;
    ascii.parse().ok()
}

/// The first signed decimal in a response, unparsed.
pub fn first_number(text: &str) -> Option<&str> {
    SIGNED_DECIMAL.find(text).map(|m| m.as_str())
}

/// All unsigned numbers quoted in a question.
pub fn numbers(text: &str) -> Vec<&str> {
    UNSIGNED_NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}

/// Text after a `formula:` marker, up to the end of its line.
pub fn formula(text: &str) -> Option<&str> {
    marker_text(&FORMULA_MARKER, text)
}

/// Text after a `step:`/`steps:` marker, up to the end of its line.
pub fn steps(text: &str) -> Option<&str> {
    marker_text(&STEPS_MARKER, text)
}

fn marker_text<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
