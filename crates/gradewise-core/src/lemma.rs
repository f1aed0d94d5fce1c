//! Rule-based English lemmatizer.
//!
//! Reduces a lowercase word to a base form without a dictionary: an
//! irregular-form table first, then plural noun rules, then `-ing`/`-ed` verb
//! rules. The rules are part-of-speech agnostic and deliberately
//! conservative. Both marking-scheme keywords and student responses pass
//! through the same rules, so a consistent reduction matters more than a
//! linguistically perfect one.

use std::collections::HashMap;

/// Irregular forms and words the suffix rules would damage.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    // Plurals
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("bacteria", "bacterium"),
    ("nuclei", "nucleus"),
    ("fungi", "fungus"),
    ("stimuli", "stimulus"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("wolves", "wolf"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    // Words that only look plural
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lens", "lens"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("economics", "economics"),
    ("electronics", "electronics"),
    ("genetics", "genetics"),
    ("statistics", "statistics"),
    // Verbs
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("took", "take"),
    ("taken", "take"),
    ("made", "make"),
    ("gave", "give"),
    ("given", "give"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("became", "become"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("caught", "catch"),
    ("taught", "teach"),
    ("found", "find"),
    ("held", "hold"),
    ("kept", "keep"),
    ("lost", "lose"),
    ("meant", "mean"),
    ("paid", "pay"),
    ("said", "say"),
    ("sent", "send"),
    ("spent", "spend"),
    ("told", "tell"),
    ("wrote", "write"),
    ("written", "write"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("began", "begin"),
    ("begun", "begin"),
    ("added", "add"),
    ("adding", "add"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
];

/// Endings that must never lose a trailing `s`.
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Doubled consonants that are kept when a verb suffix is removed
/// (`called` → `call`, `passed` → `pass`).
const KEEP_DOUBLED: &[char] = &['l', 's', 'z', 'f'];

/// Stem endings that take back a silent `e` (`related` → `relate`).
const E_RESTORING_ENDINGS: &[&str] = &["at", "bl", "iz", "us", "c", "v"];

/// Dictionary-free lemmatizer backed by bundled tables.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self {
            irregular: IRREGULAR_FORMS.iter().copied().collect(),
        }
    }
}

impl Lemmatizer {
    /// Number of entries in the irregular-form table.
    pub fn irregular_count(&self) -> usize {
        self.irregular.len()
    }

    /// Reduce a lowercase word to its base form.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if word.chars().count() <= 3 || !word.chars().all(|c| c.is_alphabetic()) {
            return word.to_string();
        }

        if let Some(base) = strip_verb_suffix(word) {
            return base;
        }
        strip_plural(word).unwrap_or_else(|| word.to_string())
    }
}

fn strip_plural(word: &str) -> Option<String> {
    if PROTECTED_ENDINGS.iter().any(|e| word.ends_with(e)) {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return Some(format!("{stem}y"));
        }
        return None;
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    word.strip_suffix('s').map(str::to_string)
}

fn strip_verb_suffix(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ing") {
        return accept_stem(stem);
    }
    if word.ends_with("eed") {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.chars().count() >= 2 {
            return Some(format!("{stem}y"));
        }
        return None;
    }
    if let Some(stem) = word.strip_suffix("ed") {
        return accept_stem(stem);
    }
    None
}

/// Accept a verb stem if it is long enough and contains a vowel, then
/// repair its ending.
fn accept_stem(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 3 || !chars.iter().any(|c| is_vowel(*c)) {
        return None;
    }

    let last = chars[chars.len() - 1];
    let prev = chars[chars.len() - 2];
    if last == prev && !is_vowel(last) && !KEEP_DOUBLED.contains(&last) {
        return Some(chars[..chars.len() - 1].iter().collect());
    }
    if E_RESTORING_ENDINGS.iter().any(|e| stem.ends_with(e)) || is_short_cvc(&chars) {
        return Some(format!("{stem}e"));
    }
    Some(stem.to_string())
}

/// A three-letter consonant-vowel-consonant stem such as `mak` or `cod`.
fn is_short_cvc(chars: &[char]) -> bool {
    chars.len() == 3
        && !is_vowel(chars[0])
        && is_vowel(chars[1])
        && !is_vowel(chars[2])
        && !matches!(chars[2], 'w' | 'x' | 'y')
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}
