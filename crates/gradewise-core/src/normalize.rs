//! Text normalization: tokenize, lowercase, drop stopwords, lemmatize.
//!
//! The normalizer is the only shared resource in the engine. It is built
//! once, up front, and is read-only afterwards, so a single instance can be
//! shared across threads behind an `Arc`.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::GradewiseConfig;
use crate::error::AssessmentError;
use crate::lemma::Lemmatizer;

/// Standard English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Tokens shorter than this are never keywords.
const MIN_KEYWORD_CHARS: usize = 3;

/// Turns free text into comparable tokens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    /// Build a normalizer from the bundled stopword list and lemma tables.
    pub fn bundled() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            lemmatizer: Lemmatizer::default(),
        }
    }

    /// Build a normalizer with a custom stopword list.
    ///
    /// An empty list is treated as a missing resource rather than silently
    /// disabling stopword filtering.
    pub fn with_stopwords<I, S>(words: I) -> Result<Self, AssessmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .collect();
        if stopwords.is_empty() {
            return Err(AssessmentError::resource("stopwords", "stopword list is empty"));
        }
        Ok(Self {
            stopwords,
            lemmatizer: Lemmatizer::default(),
        })
    }

    /// Load a stopword list (one word per line, `#` comments) from disk.
    pub fn from_stopwords_file(path: &Path) -> Result<Self, AssessmentError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssessmentError::resource(format!("stopwords ({})", path.display()), e.to_string())
        })?;
        Self::with_stopwords(content.lines())
    }

    /// Build the normalizer a deployment is configured for.
    pub fn from_config(config: &GradewiseConfig) -> Result<Self, AssessmentError> {
        let normalizer = match &config.stopwords_path {
            Some(path) => Self::from_stopwords_file(path)?,
            None => Self::bundled(),
        };
        tracing::debug!(
            stopwords = normalizer.stopwords.len(),
            irregular_forms = normalizer.lemmatizer.irregular_count(),
            "normalizer loaded"
        );
        Ok(normalizer)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Normalized tokens of `text`, in reading order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text, 0)
    }

    /// Normalized tokens of `text` as a set for membership tests.
    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.tokens(text).into_iter().collect()
    }

    /// Keyword set of a marking-scheme point: normalized tokens whose
    /// surface form is longer than two characters.
    pub fn keywords(&self, text: &str) -> BTreeSet<String> {
        self.normalize(text, MIN_KEYWORD_CHARS).into_iter().collect()
    }

    fn normalize(&self, text: &str, min_chars: usize) -> Vec<String> {
        text.unicode_words()
            .flat_map(|word| word.split(is_apostrophe))
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .filter(|token| token.chars().all(char::is_alphanumeric))
            .filter(|token| token.chars().count() >= min_chars)
            .map(|token| self.lemmatizer.lemmatize(&token))
            .collect()
    }
}

/// Possessives and contractions split here: `Earth's` -> `earth` + `s`.
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}
