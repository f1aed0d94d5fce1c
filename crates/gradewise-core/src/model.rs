//! Core data model types for gradewise.
//!
//! Questions, marking schemes, and evaluation results are immutable value
//! objects handed to the engine; nothing here is cached between calls.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The kind of question, which selects the scoring and hint policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Calculation,
    ShortAnswer,
    Essay,
    Graph,
    #[default]
    #[serde(other)]
    Other,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::MultipleChoice,
        QuestionType::Calculation,
        QuestionType::ShortAnswer,
        QuestionType::Essay,
        QuestionType::Graph,
        QuestionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Calculation => "calculation",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Essay => "essay",
            QuestionType::Graph => "graph",
            QuestionType::Other => "other",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized type names fall back to [`QuestionType::Other`].
impl FromStr for QuestionType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "multiple_choice" | "mc" => QuestionType::MultipleChoice,
            "calculation" => QuestionType::Calculation,
            "short_answer" => QuestionType::ShortAnswer,
            "essay" => QuestionType::Essay,
            "graph" => QuestionType::Graph,
            _ => QuestionType::Other,
        })
    }
}

/// How much of the policy feedback reaches the student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    /// Only the numeric score.
    None,
    /// Score line followed by the policy feedback.
    Basic,
    /// Policy feedback unchanged.
    #[default]
    Detailed,
}

impl fmt::Display for FeedbackLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackLevel::None => write!(f, "none"),
            FeedbackLevel::Basic => write!(f, "basic"),
            FeedbackLevel::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for FeedbackLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(FeedbackLevel::None),
            "basic" => Ok(FeedbackLevel::Basic),
            "detailed" => Ok(FeedbackLevel::Detailed),
            other => Err(format!("unknown feedback level: {other}")),
        }
    }
}

/// A question, optionally split into lettered sub-questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// Question type; unknown or missing types score as [`QuestionType::Other`].
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    /// Prompt text shown to the student.
    #[serde(default)]
    pub text: String,
    /// Maximum score. Advisory only when sub-questions exist.
    #[serde(default)]
    pub marks: u32,
    /// Ordered sub-questions, each with its own type and marks.
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
    /// Precomputed hints, returned verbatim when non-empty.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Worked solution, if the source material provides one.
    #[serde(default)]
    pub solution: Option<String>,
}

impl Question {
    pub fn sub_question(&self, id: &str) -> Option<&SubQuestion> {
        self.sub_questions.iter().find(|sq| sq.id == id)
    }
}

/// A lettered part of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuestion {
    /// Single-letter label (e.g. "a").
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: u32,
    /// Overrides the parent question's type when present.
    #[serde(rename = "type", default)]
    pub question_type: Option<QuestionType>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub solution: Option<String>,
}

/// The marking scheme attached to exactly one question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkingScheme {
    pub question_id: String,
    /// Free-text marking prose.
    #[serde(default)]
    pub text: String,
    /// Per-sub-question marking text keyed by sub-question id.
    #[serde(default)]
    pub sub_marking_schemes: Vec<SubMarkingScheme>,
}

impl MarkingScheme {
    pub fn sub_scheme(&self, id: &str) -> Option<&SubMarkingScheme> {
        self.sub_marking_schemes.iter().find(|s| s.id == id)
    }
}

/// Marking text for a single sub-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubMarkingScheme {
    pub id: String,
    pub text: String,
}

/// A question together with its marking scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankEntry {
    pub question: Question,
    pub marking_scheme: MarkingScheme,
}

/// A collection of questions, each carrying exactly one marking scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Entries in authoring order.
    #[serde(default)]
    pub entries: Vec<BankEntry>,
}

impl QuestionBank {
    pub fn entry(&self, question_id: &str) -> Option<&BankEntry> {
        self.entries.iter().find(|e| e.question.id == question_id)
    }
}

/// One student response awaiting a grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub student: String,
    pub question_id: String,
    #[serde(default)]
    pub sub_question_id: Option<String>,
    pub response: String,
}

/// The outcome of evaluating one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Awarded score, `0 <= score <= max_marks`.
    pub score: u32,
    pub max_marks: u32,
    /// Feedback shaped by the configured [`FeedbackLevel`].
    pub feedback: String,
}

impl Evaluation {
    pub fn new(score: u32, max_marks: u32, feedback: impl Into<String>) -> Self {
        Self {
            score,
            max_marks,
            feedback: feedback.into(),
        }
    }

    pub fn is_full_marks(&self) -> bool {
        self.score == self.max_marks
    }
}

/// A numeric answer rendered the way marking schemes print them: integral
/// values keep one decimal place (`12.0`), others use the shortest form.
/// Magnitudes of `1e16` and above, or below `1e-4`, switch to exponent
/// notation with a signed two-digit exponent (`1e+16`, `2.5e-05`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericValue(pub f64);

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        let magnitude = value.abs();
        if !value.is_finite() {
            write!(f, "{value}")
        } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
            let formatted = format!("{value:e}");
            let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exponent.abs())
        } else if value.fract() == 0.0 {
            write!(f, "{value:.1}")
        } else {
            write!(f, "{value}")
        }
    }
}
