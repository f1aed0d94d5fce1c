//! The `gradewise evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradewise_core::model::Submission;
use gradewise_core::parser;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    bank_path: PathBuf,
    question_id: String,
    sub_question_id: Option<String>,
    response: Option<String>,
    response_file: Option<PathBuf>,
    feedback_level: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    super::check_format(&format)?;

    let response = match (response, response_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read response file: {}", path.display()))?,
        (None, None) => anyhow::bail!("either --response or --response-file is required"),
    };

    let bank = parser::parse_question_bank(&bank_path)?;
    let assessor = super::build_assessor(config_path.as_deref(), feedback_level.as_deref(), |_| {})?;

    let submission = Submission {
        id: "cli".into(),
        student: String::new(),
        question_id,
        sub_question_id,
        response,
    };
    let graded = assessor.grade_submission(&bank, &submission);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&graded)?);
    } else {
        println!("Score: {}/{}", graded.score, graded.max_marks);
        println!();
        println!("{}", graded.feedback.trim_end());
    }

    Ok(())
}
