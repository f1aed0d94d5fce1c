//! The `gradewise hints` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use gradewise_core::parser;

#[derive(Serialize)]
struct HintOutput<'a> {
    question_id: &'a str,
    sub_question_id: Option<&'a str>,
    hints: Vec<String>,
}

pub fn execute(
    bank_path: PathBuf,
    question_id: String,
    sub_question_id: Option<String>,
    level: Option<usize>,
    levels: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    super::check_format(&format)?;

    let bank = parser::parse_question_bank(&bank_path)?;
    let entry = super::find_entry(&bank, &question_id)?;
    let assessor = super::build_assessor(config_path.as_deref(), None, |config| {
        if let Some(levels) = levels {
            config.hint_levels = levels;
        }
    })?;

    let sub = sub_question_id.as_deref();
    let hints = match level {
        Some(level) => vec![assessor.hint_at(&entry.question, &entry.marking_scheme, sub, level)?],
        None => assessor.generate_hints(&entry.question, &entry.marking_scheme, sub),
    };

    if format == "json" {
        let output = HintOutput {
            question_id: &question_id,
            sub_question_id: sub,
            hints,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let first = level.unwrap_or(0);
        for (i, hint) in hints.iter().enumerate() {
            println!("Hint {}: {hint}", first + i + 1);
        }
    }

    Ok(())
}
