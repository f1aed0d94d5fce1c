//! Grading report types with JSON persistence and summary statistics.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{QuestionBank, QuestionType};

/// A complete batch grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the question bank.
    pub bank: BankSummary,
    /// One result per submission, in submission order.
    pub results: Vec<GradedSubmission>,
    /// Aggregate statistics.
    pub summary: GradingSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question bank (without the questions themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl BankSummary {
    pub fn of(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.entries.len(),
        }
    }
}

/// The grade awarded to one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission_id: String,
    pub student: String,
    pub question_id: String,
    #[serde(default)]
    pub sub_question_id: Option<String>,
    /// Effective question type; absent when the question could not be found.
    #[serde(default)]
    pub question_type: Option<QuestionType>,
    pub score: u32,
    pub max_marks: u32,
    pub feedback: String,
}

/// Aggregate statistics over a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingSummary {
    pub submissions: usize,
    pub total_score: u64,
    pub total_available: u64,
    /// Total score as a percentage of marks available (0 when nothing was available).
    pub percentage: f64,
    /// Submissions that earned every available mark.
    pub full_marks: usize,
    pub by_type: BTreeMap<QuestionType, TypeSummary>,
}

/// Per-question-type totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSummary {
    pub submissions: usize,
    pub total_score: u64,
    pub total_available: u64,
}

impl GradingSummary {
    pub fn compute(results: &[GradedSubmission]) -> Self {
        let mut summary = GradingSummary {
            submissions: results.len(),
            ..Default::default()
        };

        for r in results {
            summary.total_score += u64::from(r.score);
            summary.total_available += u64::from(r.max_marks);
            if r.max_marks > 0 && r.score == r.max_marks {
                summary.full_marks += 1;
            }
            if let Some(question_type) = r.question_type {
                let entry = summary.by_type.entry(question_type).or_default();
                entry.submissions += 1;
                entry.total_score += u64::from(r.score);
                entry.total_available += u64::from(r.max_marks);
            }
        }

        summary.percentage = if summary.total_available == 0 {
            0.0
        } else {
            summary.total_score as f64 / summary.total_available as f64 * 100.0
        };
        summary
    }
}

impl GradingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Results for a single student, in submission order.
    pub fn for_student<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a GradedSubmission> {
        self.results.iter().filter(move |r| r.student == student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(id: &str, question_type: Option<QuestionType>, score: u32, max: u32) -> GradedSubmission {
        GradedSubmission {
            submission_id: id.into(),
            student: "alice".into(),
            question_id: "q1".into(),
            sub_question_id: None,
            question_type,
            score,
            max_marks: max,
            feedback: String::new(),
        }
    }

    #[test]
    fn summary_totals_and_breakdown() {
        let results = vec![
            graded("s1", Some(QuestionType::Calculation), 2, 2),
            graded("s2", Some(QuestionType::ShortAnswer), 1, 4),
            graded("s3", Some(QuestionType::ShortAnswer), 3, 4),
            graded("s4", None, 0, 0),
        ];
        let summary = GradingSummary::compute(&results);
        assert_eq!(summary.submissions, 4);
        assert_eq!(summary.total_score, 6);
        assert_eq!(summary.total_available, 10);
        assert!((summary.percentage - 60.0).abs() < 1e-9);
        assert_eq!(summary.full_marks, 1);
        assert_eq!(summary.by_type[&QuestionType::ShortAnswer].submissions, 2);
        assert_eq!(summary.by_type[&QuestionType::ShortAnswer].total_score, 4);
        assert!(!summary.by_type.contains_key(&QuestionType::Other));
    }

    #[test]
    fn empty_summary_has_zero_percentage() {
        let summary = GradingSummary::compute(&[]);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn save_and_load_json() {
        let results = vec![graded("s1", Some(QuestionType::Essay), 5, 10)];
        let report = GradingReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary {
                id: "bank".into(),
                name: "Bank".into(),
                question_count: 1,
            },
            summary: GradingSummary::compute(&results),
            results,
            duration_ms: 3,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");
        report.save_json(&path).unwrap();

        let loaded = GradingReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results[0].question_type, Some(QuestionType::Essay));
        assert_eq!(loaded.summary.by_type[&QuestionType::Essay].total_score, 5);
        assert_eq!(loaded.for_student("alice").count(), 1);
    }
}
