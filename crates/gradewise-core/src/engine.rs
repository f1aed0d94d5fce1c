//! Assessment entry points.
//!
//! [`Assessor`] resolves a question (or one of its sub-questions) against its
//! marking scheme, dispatches to the scoring or hint policy for the effective
//! question type, and grades whole batches of submissions concurrently.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::GradewiseConfig;
use crate::error::AssessmentError;
use crate::hints;
use crate::model::{
    Evaluation, FeedbackLevel, MarkingScheme, Question, QuestionBank, QuestionType, Submission,
};
use crate::normalize::Normalizer;
use crate::report::{BankSummary, GradedSubmission, GradingReport, GradingSummary};
use crate::scoring::{shape_feedback, Scorer};

/// The question or sub-question a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target<'a> {
    pub question_type: QuestionType,
    pub text: &'a str,
    pub marking_text: &'a str,
    pub max_marks: u32,
    /// Precomputed hints; empty when none were authored.
    pub hints: &'a [String],
}

/// Grades responses and generates hints. Cheap to clone; clones share the
/// loaded normalizer.
#[derive(Debug, Clone)]
pub struct Assessor {
    normalizer: Arc<Normalizer>,
    config: GradewiseConfig,
}

impl Assessor {
    /// Load normalization resources and build an assessor.
    pub fn new(config: GradewiseConfig) -> Result<Self, AssessmentError> {
        let normalizer = Normalizer::from_config(&config)?;
        Ok(Self::with_normalizer(config, Arc::new(normalizer)))
    }

    pub fn with_normalizer(config: GradewiseConfig, normalizer: Arc<Normalizer>) -> Self {
        Self { normalizer, config }
    }

    pub fn config(&self) -> &GradewiseConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> Scorer<'_> {
        Scorer::new(&self.normalizer)
    }

    /// Resolve the effective type, text, marking text, and marks for a request.
    ///
    /// An empty `sub_question_id` addresses the whole question. A sub-question
    /// without its own type inherits the parent's.
    pub fn resolve<'a>(
        question: &'a Question,
        marking_scheme: &'a MarkingScheme,
        sub_question_id: Option<&str>,
    ) -> Result<Target<'a>, AssessmentError> {
        match sub_question_id.filter(|id| !id.is_empty()) {
            None => Ok(Target {
                question_type: question.question_type,
                text: &question.text,
                marking_text: &marking_scheme.text,
                max_marks: question.marks,
                hints: &question.hints,
            }),
            Some(id) => {
                let sub = question
                    .sub_question(id)
                    .ok_or_else(|| AssessmentError::SubQuestionNotFound(id.to_string()))?;
                let scheme = marking_scheme
                    .sub_scheme(id)
                    .ok_or_else(|| AssessmentError::SubMarkingSchemeNotFound(id.to_string()))?;
                Ok(Target {
                    question_type: sub.question_type.unwrap_or(question.question_type),
                    text: &sub.text,
                    marking_text: &scheme.text,
                    max_marks: sub.marks,
                    hints: &sub.hints,
                })
            }
        }
    }

    /// Evaluate a response with the configured feedback level.
    pub fn evaluate(
        &self,
        question: &Question,
        marking_scheme: &MarkingScheme,
        response: &str,
        sub_question_id: Option<&str>,
    ) -> Evaluation {
        self.evaluate_with_level(
            question,
            marking_scheme,
            response,
            sub_question_id,
            self.config.default_feedback_level,
        )
    }

    /// Evaluate a response, shaping feedback for `level`.
    ///
    /// Lookup failures are reported unshaped with a score of zero.
    pub fn evaluate_with_level(
        &self,
        question: &Question,
        marking_scheme: &MarkingScheme,
        response: &str,
        sub_question_id: Option<&str>,
        level: FeedbackLevel,
    ) -> Evaluation {
        tracing::info!(
            question = %question.id,
            sub_question = sub_question_id.unwrap_or(""),
            "evaluating response"
        );

        let target = match Self::resolve(question, marking_scheme, sub_question_id) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(question = %question.id, "{e}");
                return Evaluation::new(0, 0, e.to_string());
            }
        };

        let graded = self.scorer().evaluate(
            target.question_type,
            response,
            target.marking_text,
            target.max_marks,
        );
        let feedback = shape_feedback(level, graded.score, target.max_marks, graded.feedback);
        Evaluation::new(graded.score, target.max_marks, feedback)
    }

    /// Generate progressive hints, general to specific.
    ///
    /// Authored hints are returned as-is. Otherwise the result always holds
    /// exactly `hint_levels` entries; lookup failures repeat the error text.
    pub fn generate_hints(
        &self,
        question: &Question,
        marking_scheme: &MarkingScheme,
        sub_question_id: Option<&str>,
    ) -> Vec<String> {
        tracing::info!(
            question = %question.id,
            sub_question = sub_question_id.unwrap_or(""),
            "generating hints"
        );
        let levels = self.config.hint_levels;

        // Authored sub-question hints win even when the sub-marking-scheme is missing.
        if let Some(id) = sub_question_id.filter(|id| !id.is_empty()) {
            if let Some(sub) = question.sub_question(id) {
                if !sub.hints.is_empty() {
                    return sub.hints.clone();
                }
            }
        }

        match Self::resolve(question, marking_scheme, sub_question_id) {
            Ok(target) if !target.hints.is_empty() => target.hints.to_vec(),
            Ok(target) => hints::generate_hints(
                target.question_type,
                target.text,
                target.marking_text,
                levels,
            ),
            Err(e) => {
                tracing::warn!(question = %question.id, "{e}");
                hints::repeated(&e.to_string(), levels)
            }
        }
    }

    /// A single hint by zero-based level.
    pub fn hint_at(
        &self,
        question: &Question,
        marking_scheme: &MarkingScheme,
        sub_question_id: Option<&str>,
        level: usize,
    ) -> Result<String, AssessmentError> {
        let mut hints = self.generate_hints(question, marking_scheme, sub_question_id);
        if level >= hints.len() {
            return Err(AssessmentError::InvalidHintLevel {
                requested: level,
                max_level: hints.len().saturating_sub(1),
            });
        }
        Ok(hints.swap_remove(level))
    }

    /// Grade every submission against the bank, at most `parallelism` at a time.
    ///
    /// Results are listed in submission order.
    pub async fn grade_batch(
        &self,
        bank: &QuestionBank,
        submissions: &[Submission],
    ) -> Result<GradingReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let bank = Arc::new(bank.clone());

        tracing::info!(
            bank = %bank.id,
            submissions = submissions.len(),
            parallelism = self.config.parallelism,
            "grading batch"
        );

        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let assessor = self.clone();
            let bank = Arc::clone(&bank);
            let semaphore = Arc::clone(&semaphore);
            let submission = submission.clone();

            futures.push(async move {
                let submission_id = submission.id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    let graded = tokio::task::spawn_blocking(move || {
                        assessor.grade_submission(&bank, &submission)
                    })
                    .await?;
                    anyhow::Ok(graded)
                };
                (index, submission_id, inner.await)
            });
        }

        let mut slots: Vec<Option<GradedSubmission>> = vec![None; submissions.len()];
        let mut failed = 0usize;

        while let Some((index, submission_id, result)) = futures.next().await {
            match result {
                Ok(graded) => slots[index] = Some(graded),
                Err(e) => {
                    tracing::error!("grading failed for submission {submission_id}: {e:#}");
                    failed += 1;
                }
            }
        }

        let results: Vec<GradedSubmission> = slots.into_iter().flatten().collect();
        let elapsed = start.elapsed();
        tracing::info!(
            graded = results.len(),
            failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "batch complete"
        );

        Ok(GradingReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            bank: BankSummary::of(&bank),
            summary: GradingSummary::compute(&results),
            results,
            duration_ms: elapsed.as_millis() as u64,
        })
    }

    /// Grade one submission synchronously.
    pub fn grade_submission(&self, bank: &QuestionBank, submission: &Submission) -> GradedSubmission {
        let sub_question_id = submission.sub_question_id.as_deref().filter(|id| !id.is_empty());
        let mut graded = GradedSubmission {
            submission_id: submission.id.clone(),
            student: submission.student.clone(),
            question_id: submission.question_id.clone(),
            sub_question_id: sub_question_id.map(str::to_string),
            question_type: None,
            score: 0,
            max_marks: 0,
            feedback: String::new(),
        };

        let Some(entry) = bank.entry(&submission.question_id) else {
            let e = AssessmentError::QuestionNotFound(submission.question_id.clone());
            tracing::warn!(question = %submission.question_id, "{e}");
            graded.feedback = e.to_string();
            return graded;
        };

        let question = &entry.question;
        if let Ok(target) = Self::resolve(question, &entry.marking_scheme, sub_question_id) {
            graded.question_type = Some(target.question_type);
        }
        let evaluation = self.evaluate(
            question,
            &entry.marking_scheme,
            &submission.response,
            sub_question_id,
        );
        graded.score = evaluation.score;
        graded.max_marks = evaluation.max_marks;
        graded.feedback = evaluation.feedback;
        graded
    }
}
