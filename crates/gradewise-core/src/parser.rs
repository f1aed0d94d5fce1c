//! TOML question-bank and submission parser.
//!
//! Loads question banks from TOML files and directories, loads submission
//! batches, and validates banks for content-quality issues.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::keypoints::extract_key_points;
use crate::model::{
    BankEntry, MarkingScheme, Question, QuestionBank, QuestionType, SubMarkingScheme, SubQuestion,
    Submission,
};
use crate::normalize::Normalizer;
use crate::scheme;

/// Intermediate TOML structure for question-bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type", default)]
    question_type: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    marks: u32,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    marking: String,
    #[serde(default)]
    sub_questions: Vec<TomlSubQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlSubQuestion {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    marks: u32,
    #[serde(rename = "type", default)]
    question_type: Option<String>,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    marking: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSubmissionFile {
    #[serde(default)]
    submissions: Vec<TomlSubmission>,
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    id: String,
    #[serde(default)]
    student: String,
    question: String,
    #[serde(default)]
    sub_question: Option<String>,
    response: String,
}

fn parse_type(name: Option<&str>) -> Option<QuestionType> {
    name.map(|n| n.parse().unwrap_or_default())
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank`.
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let entries = parsed
        .questions
        .into_iter()
        .map(|q| {
            let mut sub_questions = Vec::with_capacity(q.sub_questions.len());
            let mut sub_marking_schemes = Vec::new();
            for sq in q.sub_questions {
                if let Some(text) = sq.marking {
                    sub_marking_schemes.push(SubMarkingScheme {
                        id: sq.id.clone(),
                        text,
                    });
                }
                sub_questions.push(SubQuestion {
                    id: sq.id,
                    text: sq.text,
                    marks: sq.marks,
                    question_type: parse_type(sq.question_type.as_deref()),
                    hints: sq.hints,
                    solution: sq.solution,
                });
            }

            BankEntry {
                marking_scheme: MarkingScheme {
                    question_id: q.id.clone(),
                    text: q.marking,
                    sub_marking_schemes,
                },
                question: Question {
                    id: q.id,
                    question_type: parse_type(q.question_type.as_deref()).unwrap_or_default(),
                    text: q.text,
                    marks: q.marks,
                    sub_questions,
                    hints: q.hints,
                    solution: q.solution,
                },
            }
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        entries,
    })
}

/// Recursively load all `.toml` question-bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    banks.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(banks)
}

/// Parse a TOML submissions file.
pub fn parse_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions file: {}", path.display()))?;

    parse_submissions_str(&content, path)
}

pub fn parse_submissions_str(content: &str, source_path: &Path) -> Result<Vec<Submission>> {
    let parsed: TomlSubmissionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(parsed
        .submissions
        .into_iter()
        .map(|s| Submission {
            id: s.id,
            student: s.student,
            question_id: s.question,
            sub_question_id: s.sub_question.filter(|id| !id.is_empty()),
            response: s.response,
        })
        .collect())
}

/// A content-quality warning from bank validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub question_id: Option<String>,
    pub sub_question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            sub_question_id: None,
            message: message.into(),
        }
    }

    fn sub_question(id: &str, sub_id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            sub_question_id: Some(sub_id.to_string()),
            message: message.into(),
        }
    }

    /// `q1` or `q1(a)`, or empty for bank-level warnings.
    pub fn location(&self) -> String {
        match (&self.question_id, &self.sub_question_id) {
            (Some(q), Some(sq)) => format!("{q}({sq})"),
            (Some(q), None) => q.clone(),
            _ => String::new(),
        }
    }
}

/// Check marking text for the answer or key points its type needs.
fn check_marking(
    normalizer: &Normalizer,
    question_type: QuestionType,
    marking_text: &str,
) -> Option<&'static str> {
    if marking_text.trim().is_empty() {
        return Some("marking text is empty");
    }
    match question_type {
        QuestionType::MultipleChoice if scheme::correct_option(marking_text).is_none() => {
            Some("no correct option found in marking text")
        }
        QuestionType::Calculation if scheme::numeric_target(marking_text).is_none() => {
            Some("no numeric answer found in marking text")
        }
        QuestionType::ShortAnswer | QuestionType::Essay | QuestionType::Other => {
            let points = extract_key_points(normalizer, marking_text);
            if points.is_empty() {
                Some("no key points found in marking text")
            } else if points.iter().any(|point| point.keywords.is_empty()) {
                Some("key point has no keywords and can never be covered")
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Validate a question bank for common content-quality issues.
pub fn validate_question_bank(bank: &QuestionBank, normalizer: &Normalizer) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.entries.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            sub_question_id: None,
            message: "question bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for entry in &bank.entries {
        let question = &entry.question;
        if !seen_ids.insert(question.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }

        if question.sub_questions.is_empty() {
            if let Some(message) =
                check_marking(normalizer, question.question_type, &entry.marking_scheme.text)
            {
                warnings.push(ValidationWarning::question(&question.id, message));
            }
            continue;
        }

        let mut seen_sub_ids = HashSet::new();
        for sub in &question.sub_questions {
            if !seen_sub_ids.insert(sub.id.as_str()) {
                warnings.push(ValidationWarning::sub_question(
                    &question.id,
                    &sub.id,
                    format!("duplicate sub-question ID: {}", sub.id),
                ));
            }
            let mut chars = sub.id.chars();
            if !matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic()) {
                warnings.push(ValidationWarning::sub_question(
                    &question.id,
                    &sub.id,
                    "sub-question ID should be a single letter",
                ));
            }

            let question_type = sub.question_type.unwrap_or(question.question_type);
            match entry.marking_scheme.sub_scheme(&sub.id) {
                None => warnings.push(ValidationWarning::sub_question(
                    &question.id,
                    &sub.id,
                    "sub-question has no marking scheme",
                )),
                Some(sub_scheme) => {
                    if let Some(message) = check_marking(normalizer, question_type, &sub_scheme.text)
                    {
                        warnings.push(ValidationWarning::sub_question(
                            &question.id,
                            &sub.id,
                            message,
                        ));
                    }
                }
            }
        }
    }

    warnings
}
