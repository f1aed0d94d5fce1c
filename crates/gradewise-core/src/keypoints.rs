//! Key-point extraction from marking-scheme prose.

use std::collections::{BTreeSet, HashSet};

use crate::normalize::Normalizer;
use crate::scheme;

/// One gradable idea from a marking scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPoint {
    /// The point as written in the marking scheme.
    pub text: String,
    /// Normalized keywords; any one of them in a response covers the point.
    pub keywords: BTreeSet<String>,
}

impl KeyPoint {
    pub fn is_covered_by(&self, response_tokens: &HashSet<String>) -> bool {
        self.keywords.iter().any(|k| response_tokens.contains(k))
    }

    /// First whitespace-separated word of the point text.
    pub fn lead_word(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or_default()
    }
}

/// Extract key points in marking-scheme order. A point text that appears
/// twice is kept once, at its first position.
pub fn extract_key_points(normalizer: &Normalizer, marking_text: &str) -> Vec<KeyPoint> {
    let mut seen = HashSet::new();
    let points: Vec<KeyPoint> = scheme::segment_points(marking_text)
        .into_iter()
        .filter(|text| seen.insert(text.clone()))
        .map(|text| KeyPoint {
            keywords: normalizer.keywords(&text),
            text,
        })
        .collect();
    tracing::debug!(count = points.len(), "extracted key points");
    points
}

/// Key points split by whether a response covers them.
#[derive(Debug, Clone, Default)]
pub struct Coverage<'a> {
    pub found: Vec<&'a KeyPoint>,
    pub missed: Vec<&'a KeyPoint>,
}

impl<'a> Coverage<'a> {
    pub fn measure(points: &'a [KeyPoint], response_tokens: &HashSet<String>) -> Self {
        let (found, missed): (Vec<&KeyPoint>, Vec<&KeyPoint>) = points
            .iter()
            .partition(|point| point.is_covered_by(response_tokens));
        Self { found, missed }
    }

    pub fn total(&self) -> usize {
        self.found.len() + self.missed.len()
    }
}
