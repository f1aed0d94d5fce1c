//! Per-question-type scoring policies.
//!
//! Each policy turns a response and its marking text into a score and
//! feedback. Recoverable failures (no answer pattern, no key points, no number
//! in the response) surface as [`AssessmentError`] from [`Scorer::score`] and
//! as a zero score with the error text from [`Scorer::evaluate`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, ErrorKind};
use crate::keypoints::{extract_key_points, Coverage, KeyPoint};
use crate::model::{FeedbackLevel, NumericValue, QuestionType};
use crate::normalize::Normalizer;
use crate::scheme;

/// Responses within this distance of the target score full marks.
pub const NUMERIC_TOLERANCE: f64 = 0.001;

/// Essays shorter than this many words keep half their coverage score.
pub const SHORT_ESSAY_WORDS: usize = 50;

/// Essays shorter than this many words keep 80% of their coverage score.
pub const ADEQUATE_ESSAY_WORDS: usize = 100;

const CORRECT: &str = "Correct answer.";
const GRAPH_UNSUPPORTED: &str = "Graph evaluation is not supported in this version.";

/// Score and feedback produced by a policy, before feedback shaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graded {
    pub score: u32,
    pub feedback: String,
}

impl Graded {
    pub fn new(score: u32, feedback: impl Into<String>) -> Self {
        Self {
            score,
            feedback: feedback.into(),
        }
    }
}

/// Dispatches a response to the policy for its question type.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    normalizer: &'a Normalizer,
}

impl<'a> Scorer<'a> {
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self { normalizer }
    }

    /// Score a response, reporting recoverable failures as errors.
    pub fn score(
        &self,
        question_type: QuestionType,
        response: &str,
        marking_text: &str,
        max_marks: u32,
    ) -> Result<Graded, AssessmentError> {
        match question_type {
            QuestionType::MultipleChoice => score_multiple_choice(response, marking_text, max_marks),
            QuestionType::Calculation => score_calculation(response, marking_text, max_marks),
            QuestionType::ShortAnswer | QuestionType::Other => {
                self.score_short_answer(response, marking_text, max_marks)
            }
            QuestionType::Essay => self.score_essay(response, marking_text, max_marks),
            QuestionType::Graph => Ok(Graded::new(0, GRAPH_UNSUPPORTED)),
        }
    }

    /// Score a response; recoverable failures become a zero score whose
    /// feedback is the error message.
    pub fn evaluate(
        &self,
        question_type: QuestionType,
        response: &str,
        marking_text: &str,
        max_marks: u32,
    ) -> Graded {
        match self.score(question_type, response, marking_text, max_marks) {
            Ok(graded) => graded,
            Err(e) => {
                if e.kind() == ErrorKind::ExtractionFailure {
                    tracing::warn!(
                        question_type = %question_type,
                        marking_text,
                        "content-quality issue: {e}"
                    );
                }
                Graded::new(0, e.to_string())
            }
        }
    }

    fn key_points(&self, marking_text: &str) -> Result<Vec<KeyPoint>, AssessmentError> {
        let points = extract_key_points(self.normalizer, marking_text);
        if points.is_empty() {
            return Err(AssessmentError::NoKeyPoints);
        }
        Ok(points)
    }

    fn score_short_answer(
        &self,
        response: &str,
        marking_text: &str,
        max_marks: u32,
    ) -> Result<Graded, AssessmentError> {
        let points = self.key_points(marking_text)?;
        let tokens = self.normalizer.token_set(response.trim());
        let coverage = Coverage::measure(&points, &tokens);

        let score = (u64::from(max_marks) * coverage.found.len() as u64
            / coverage.total() as u64) as u32;

        let mut feedback = String::new();
        if score == max_marks {
            feedback.push_str("Excellent answer! You've covered all the key points.");
        } else if score > 0 {
            let _ = write!(
                feedback,
                "You've covered {} out of {} key points.\n\n",
                coverage.found.len(),
                coverage.total()
            );
            feedback.push_str("Points covered:\n");
            push_points(&mut feedback, &coverage.found);
            feedback.push_str("\nPoints missed:\n");
            push_points(&mut feedback, &coverage.missed);
        } else {
            feedback.push_str("Your answer didn't cover any of the key points required.\n\n");
            feedback.push_str("Key points to include:\n");
            push_points(&mut feedback, &points.iter().collect::<Vec<_>>());
        }
        Ok(Graded::new(score, feedback))
    }

    fn score_essay(
        &self,
        response: &str,
        marking_text: &str,
        max_marks: u32,
    ) -> Result<Graded, AssessmentError> {
        let points = self.key_points(marking_text)?;
        let response = response.trim();
        let tokens = self.normalizer.token_set(response);
        let coverage = Coverage::measure(&points, &tokens);

        let max = f64::from(max_marks);
        let base_score = max * coverage.found.len() as f64 / coverage.total() as f64;
        let word_count = response.split_whitespace().count();
        let score = (base_score * length_factor(word_count)).floor() as u32;

        let mut feedback = String::new();
        if score == max_marks {
            feedback.push_str(
                "Excellent essay! You've covered all the key points with adequate depth.",
            );
        } else if f64::from(score) > max * 0.7 {
            feedback.push_str("Good essay. You've covered most of the key points.\n\n");
            if !coverage.missed.is_empty() {
                feedback.push_str("Consider including these points to improve:\n");
                push_points(&mut feedback, &coverage.missed);
            }
        } else if f64::from(score) > max * 0.4 {
            feedback.push_str("Satisfactory essay, but there's room for improvement.\n\n");
            feedback.push_str("Points covered well:\n");
            push_points(&mut feedback, &coverage.found);
            feedback.push_str("\nPoints to include or expand on:\n");
            push_points(&mut feedback, &coverage.missed);
        } else {
            feedback.push_str("Your essay needs significant improvement.\n\n");
            if !coverage.found.is_empty() {
                feedback.push_str("Points covered:\n");
                push_points(&mut feedback, &coverage.found);
            }
            feedback.push_str("\nKey points to include:\n");
            push_points(&mut feedback, &coverage.missed);
            if word_count < ADEQUATE_ESSAY_WORDS {
                feedback
                    .push_str("\nYour response is too short. Aim for a more detailed explanation.");
            }
        }
        Ok(Graded::new(score, feedback))
    }
}

fn score_multiple_choice(
    response: &str,
    marking_text: &str,
    max_marks: u32,
) -> Result<Graded, AssessmentError> {
    let correct = scheme::correct_option(marking_text).ok_or(AssessmentError::AnswerNotFound)?;
    let response = response.trim().to_lowercase();

    if response == correct.to_string() {
        Ok(Graded::new(max_marks, CORRECT))
    } else {
        Ok(Graded::new(
            0,
            format!(
                "Incorrect. The correct answer is {}.",
                correct.to_ascii_uppercase()
            ),
        ))
    }
}

fn score_calculation(
    response: &str,
    marking_text: &str,
    max_marks: u32,
) -> Result<Graded, AssessmentError> {
    let target = scheme::numeric_target(marking_text).ok_or(AssessmentError::AnswerNotFound)?;
    let expected = NumericValue(target);

    let raw = scheme::first_number(response.trim())
        .ok_or(AssessmentError::NoNumericAnswer { expected })?;
    let value =
        scheme::parse_decimal(raw).ok_or(AssessmentError::InvalidNumber { expected })?;

    if (value - target).abs() < NUMERIC_TOLERANCE {
        Ok(Graded::new(max_marks, CORRECT))
    } else {
        Ok(Graded::new(
            0,
            format!("Incorrect. The correct answer is {expected}."),
        ))
    }
}

/// Essay length multiplier by whitespace-separated word count.
pub fn length_factor(word_count: usize) -> f64 {
    if word_count < SHORT_ESSAY_WORDS {
        0.5
    } else if word_count < ADEQUATE_ESSAY_WORDS {
        0.8
    } else {
        1.0
    }
}

/// Shape policy feedback for the configured verbosity.
pub fn shape_feedback(level: FeedbackLevel, score: u32, max_marks: u32, feedback: String) -> String {
    match level {
        FeedbackLevel::None => format!("Score: {score}/{max_marks}"),
        FeedbackLevel::Basic => format!("Score: {score}/{max_marks}\n{feedback}"),
        FeedbackLevel::Detailed => feedback,
    }
}

fn push_points(out: &mut String, points: &[&KeyPoint]) {
    for point in points {
        let _ = writeln!(out, "- {}", point.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANTS: &str = "- Mention photosynthesis\n- Mention chlorophyll";

    fn scorer_eval(
        question_type: QuestionType,
        response: &str,
        marking_text: &str,
        max_marks: u32,
    ) -> Graded {
        let normalizer = Normalizer::bundled();
        Scorer::new(&normalizer).evaluate(question_type, response, marking_text, max_marks)
    }

    fn words(n: usize) -> String {
        vec!["filler"; n].join(" ")
    }

    #[test]
    fn multiple_choice_accepts_any_case_and_padding() {
        for response in ["C", " c ", "c"] {
            let graded = scorer_eval(QuestionType::MultipleChoice, response, "answer: c", 2);
            assert_eq!(graded, Graded::new(2, "Correct answer."));
        }
    }

    #[test]
    fn multiple_choice_wrong_letter_names_correct_one() {
        for response in ["a", "b", "d", "e"] {
            let graded = scorer_eval(QuestionType::MultipleChoice, response, "answer: c", 2);
            assert_eq!(graded.score, 0);
            assert_eq!(graded.feedback, "Incorrect. The correct answer is C.");
        }
    }

    #[test]
    fn multiple_choice_without_answer_pattern() {
        let graded = scorer_eval(QuestionType::MultipleChoice, "a", "See diagram", 1);
        assert_eq!(
            graded,
            Graded::new(0, "Error: Could not determine the correct answer.")
        );
    }

    #[test]
    fn calculation_tolerance() {
        let full = scorer_eval(QuestionType::Calculation, "42.5001", "answer: 42.5", 3);
        assert_eq!(full, Graded::new(3, "Correct answer."));

        let wrong = scorer_eval(QuestionType::Calculation, "42.51", "answer: 42.5", 3);
        assert_eq!(
            wrong,
            Graded::new(0, "Incorrect. The correct answer is 42.5.")
        );
    }

    #[test]
    fn calculation_answer_is_form() {
        let graded = scorer_eval(
            QuestionType::Calculation,
            "Final answer: 12.0",
            "The answer is 12",
            4,
        );
        assert_eq!(graded, Graded::new(4, "Correct answer."));
    }

    #[test]
    fn calculation_without_number_in_response() {
        let graded = scorer_eval(QuestionType::Calculation, "no idea", "answer: 12", 2);
        assert_eq!(
            graded,
            Graded::new(0, "No numerical answer found. The correct answer is 12.0.")
        );
    }

    #[test]
    fn calculation_accepts_non_ascii_digits() {
        let graded = scorer_eval(QuestionType::Calculation, "٣", "answer: 3", 2);
        assert_eq!(graded, Graded::new(2, CORRECT));
        let wrong = scorer_eval(QuestionType::Calculation, "٤", "answer: 3", 2);
        assert_eq!(wrong, Graded::new(0, "Incorrect. The correct answer is 3.0."));
    }

    #[test]
    fn calculation_without_target() {
        let normalizer = Normalizer::bundled();
        let err = Scorer::new(&normalizer)
            .score(QuestionType::Calculation, "5", "Show your working", 2)
            .unwrap_err();
        assert_eq!(err, AssessmentError::AnswerNotFound);
    }

    #[test]
    fn short_answer_partial_credit() {
        let graded = scorer_eval(QuestionType::ShortAnswer, "plants use chlorophyll", PLANTS, 2);
        assert_eq!(graded.score, 1);
        assert_eq!(
            graded.feedback,
            "You've covered 1 out of 2 key points.\n\n\
             Points covered:\n- Mention chlorophyll\n\n\
             Points missed:\n- Mention photosynthesis\n"
        );
    }

    #[test]
    fn short_answer_full_and_zero() {
        let full = scorer_eval(
            QuestionType::ShortAnswer,
            "Photosynthesis happens in chlorophyll",
            PLANTS,
            2,
        );
        assert_eq!(full.score, 2);
        assert_eq!(
            full.feedback,
            "Excellent answer! You've covered all the key points."
        );

        let zero = scorer_eval(QuestionType::ShortAnswer, "I don't know", PLANTS, 2);
        assert_eq!(zero.score, 0);
        assert!(zero.feedback.starts_with("Your answer didn't cover any"));
        assert!(zero.feedback.contains("- Mention photosynthesis\n- Mention chlorophyll\n"));
    }

    #[test]
    fn short_answer_floors_partial_credit() {
        let marking = "- kinetic energy\n- potential energy\n- friction";
        // "energy" covers the first two points
        let graded = scorer_eval(QuestionType::ShortAnswer, "energy", marking, 4);
        assert_eq!(graded.score, 2);
    }

    #[test]
    fn short_answer_credits_possessives() {
        let graded = scorer_eval(QuestionType::ShortAnswer, "chlorophyll's green pigment", PLANTS, 2);
        assert_eq!(graded.score, 1);
        let curly = scorer_eval(QuestionType::ShortAnswer, "chlorophyll\u{2019}s pigment", PLANTS, 2);
        assert_eq!(curly.score, 1);
    }

    #[test]
    fn short_answer_without_points() {
        let graded = scorer_eval(QuestionType::ShortAnswer, "anything", "Yes.", 2);
        assert_eq!(
            graded,
            Graded::new(0, "Error: Could not determine the marking criteria.")
        );
    }

    #[test]
    fn other_type_uses_short_answer_policy() {
        let graded = scorer_eval(QuestionType::Other, "plants use chlorophyll", PLANTS, 2);
        assert_eq!(graded.score, 1);
    }

    #[test]
    fn graph_is_unsupported() {
        let graded = scorer_eval(QuestionType::Graph, "a straight line", "gradient = 2", 3);
        assert_eq!(graded, Graded::new(0, GRAPH_UNSUPPORTED));
    }

    #[test]
    fn essay_length_bands() {
        let marking = "- photosynthesis\n- chlorophyll";
        let covered = "photosynthesis chlorophyll";
        let essay = |filler: usize| format!("{covered} {}", words(filler));

        // 2 + 47 = 49 words: 10 * 0.5
        assert_eq!(scorer_eval(QuestionType::Essay, &essay(47), marking, 10).score, 5);
        // 50 words: 10 * 0.8
        assert_eq!(scorer_eval(QuestionType::Essay, &essay(48), marking, 10).score, 8);
        // 99 words still 0.8
        assert_eq!(scorer_eval(QuestionType::Essay, &essay(97), marking, 10).score, 8);
        // 100 words: full
        let full = scorer_eval(QuestionType::Essay, &essay(98), marking, 10);
        assert_eq!(full.score, 10);
        assert!(full.feedback.starts_with("Excellent essay!"));
    }

    #[test]
    fn essay_feedback_bands() {
        let marking = "- photosynthesis\n- chlorophyll\n- sunlight\n- glucose\n- oxygen";
        let long_tail = words(100);

        // 4/5 points, long: 8 of 10 > 70%
        let good = scorer_eval(
            QuestionType::Essay,
            &format!("photosynthesis chlorophyll sunlight glucose {long_tail}"),
            marking,
            10,
        );
        assert_eq!(good.score, 8);
        assert!(good.feedback.starts_with("Good essay."));
        assert!(good.feedback.contains("Consider including these points to improve:\n- oxygen\n"));

        // 3/5 points, long: 6 of 10 > 40%
        let fair = scorer_eval(
            QuestionType::Essay,
            &format!("photosynthesis chlorophyll sunlight {long_tail}"),
            marking,
            10,
        );
        assert_eq!(fair.score, 6);
        assert!(fair.feedback.starts_with("Satisfactory essay"));
        assert!(fair.feedback.contains("Points to include or expand on:\n- glucose\n- oxygen\n"));

        // 1/5 points, short: 10 * 0.2 * 0.5 = 1
        let weak = scorer_eval(QuestionType::Essay, "photosynthesis", marking, 10);
        assert_eq!(weak.score, 1);
        assert!(weak.feedback.starts_with("Your essay needs significant improvement."));
        assert!(weak.feedback.contains("Points covered:\n- photosynthesis\n"));
        assert!(weak.feedback.ends_with("Aim for a more detailed explanation."));
    }

    #[test]
    fn feedback_shaping() {
        assert_eq!(
            shape_feedback(FeedbackLevel::None, 1, 2, "ignored".into()),
            "Score: 1/2"
        );
        assert_eq!(
            shape_feedback(FeedbackLevel::Basic, 1, 2, "Good.".into()),
            "Score: 1/2\nGood."
        );
        assert_eq!(
            shape_feedback(FeedbackLevel::Detailed, 1, 2, "Good.".into()),
            "Good."
        );
    }

    #[test]
    fn length_factor_thresholds() {
        assert_eq!(length_factor(49), 0.5);
        assert_eq!(length_factor(50), 0.8);
        assert_eq!(length_factor(99), 0.8);
        assert_eq!(length_factor(100), 1.0);
    }
}
