//! Assessment error types.
//!
//! Every variant except [`AssessmentError::ResourceUnavailable`] is a
//! recoverable outcome: the engine turns it into a score of zero with the
//! variant's `Display` text as the user-facing feedback.

use thiserror::Error;

use crate::model::NumericValue;

/// Errors that can occur while evaluating a response or generating hints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// The requested sub-question does not exist on the question.
    #[error("Error: Sub-question not found.")]
    SubQuestionNotFound(String),

    /// The marking scheme has no entry for the requested sub-question.
    #[error("Error: Marking scheme not found for this sub-question.")]
    SubMarkingSchemeNotFound(String),

    /// The question bank has no question with this id.
    #[error("Error: Question not found.")]
    QuestionNotFound(String),

    /// No correct-answer pattern matched the marking text.
    #[error("Error: Could not determine the correct answer.")]
    AnswerNotFound,

    /// The marking text yielded no key points.
    #[error("Error: Could not determine the marking criteria.")]
    NoKeyPoints,

    /// A calculation response contained no number.
    #[error("No numerical answer found. The correct answer is {expected}.")]
    NoNumericAnswer { expected: NumericValue },

    /// A calculation response contained a number that failed to parse.
    #[error("Invalid numerical format. The correct answer is {expected}.")]
    InvalidNumber { expected: NumericValue },

    /// A hint level outside the generated hint set was requested.
    #[error("Invalid hint level {requested} (maximum is {max_level})")]
    InvalidHintLevel { requested: usize, max_level: usize },

    /// Normalization data (stopwords, lemma tables) could not be loaded.
    #[error("normalization resource unavailable: {resource}: {reason}")]
    ResourceUnavailable { resource: String, reason: String },
}

/// Broad classification of an [`AssessmentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ExtractionFailure,
    MalformedResponse,
    InvalidRequest,
    ResourceUnavailable,
}

impl AssessmentError {
    /// Create a resource error.
    pub fn resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessmentError::SubQuestionNotFound(_)
            | AssessmentError::SubMarkingSchemeNotFound(_)
            | AssessmentError::QuestionNotFound(_) => ErrorKind::NotFound,
            AssessmentError::AnswerNotFound | AssessmentError::NoKeyPoints => {
                ErrorKind::ExtractionFailure
            }
            AssessmentError::NoNumericAnswer { .. } | AssessmentError::InvalidNumber { .. } => {
                ErrorKind::MalformedResponse
            }
            AssessmentError::InvalidHintLevel { .. } => ErrorKind::InvalidRequest,
            AssessmentError::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
        }
    }

    /// Returns `true` if this error becomes a zero score instead of a failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::ResourceUnavailable)
    }
}
