pub mod evaluate;
pub mod grade;
pub mod hints;
pub mod init;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use gradewise_core::config::{load_config_from, GradewiseConfig};
use gradewise_core::engine::Assessor;
use gradewise_core::model::{BankEntry, FeedbackLevel, QuestionBank};

/// Load config, apply CLI overrides, and build the assessor.
pub(crate) fn build_assessor(
    config_path: Option<&Path>,
    feedback_level: Option<&str>,
    adjust: impl FnOnce(&mut GradewiseConfig),
) -> Result<Assessor> {
    let mut config = load_config_from(config_path)?;
    if let Some(level) = feedback_level {
        config.default_feedback_level = level
            .parse::<FeedbackLevel>()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }
    adjust(&mut config);
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");

    Assessor::new(config).context("failed to initialize assessor")
}

pub(crate) fn find_entry<'a>(bank: &'a QuestionBank, question_id: &str) -> Result<&'a BankEntry> {
    bank.entry(question_id).with_context(|| {
        format!(
            "question '{question_id}' not found in bank '{}'. Available: {:?}",
            bank.id,
            bank.entries
                .iter()
                .map(|e| e.question.id.as_str())
                .collect::<Vec<_>>()
        )
    })
}

pub(crate) fn check_format(format: &str) -> Result<()> {
    anyhow::ensure!(
        matches!(format, "text" | "json"),
        "unknown format '{format}' (expected text or json)"
    );
    Ok(())
}
