//! The `gradewise validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradewise_core::config::load_config_from;
use gradewise_core::normalize::Normalizer;
use gradewise_core::parser;

pub fn execute(bank_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        vec![parser::parse_question_bank(&bank_path)?]
    };

    // Key points must come out the same as they will when grading.
    let config = load_config_from(config_path.as_deref())?;
    let normalizer =
        Normalizer::from_config(&config).context("failed to load normalizer resources")?;
    let mut total_warnings = 0;

    for bank in &banks {
        println!("Question bank: {} ({} questions)", bank.name, bank.entries.len());

        let warnings = parser::validate_question_bank(bank, &normalizer);
        for w in &warnings {
            let location = w.location();
            if location.is_empty() {
                println!("   WARNING: {}", w.message);
            } else {
                println!("  [{location}] WARNING: {}", w.message);
            }
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
