//! The `gradewise grade` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::parser;
use gradewise_core::report::GradingReport;

pub async fn execute(
    bank_path: PathBuf,
    submissions_path: PathBuf,
    parallelism: Option<usize>,
    feedback_level: Option<String>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let bank = parser::parse_question_bank(&bank_path)?;
    let submissions = parser::parse_submissions(&submissions_path)?;
    let assessor = super::build_assessor(
        config_path.as_deref(),
        feedback_level.as_deref(),
        |config| {
            if let Some(parallelism) = parallelism {
                config.parallelism = parallelism;
            }
        },
    )?;

    eprintln!(
        "gradewise v{} - Grading {} submissions against '{}' ({} questions)",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        bank.name,
        bank.entries.len()
    );

    let report = assessor.grade_batch(&bank, &submissions).await?;

    print_results(&report);
    print_summary(&report);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_results(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Submission", "Student", "Question", "Type", "Score"]);

    for r in &report.results {
        let question = match &r.sub_question_id {
            Some(sub) => format!("{}({sub})", r.question_id),
            None => r.question_id.clone(),
        };
        let question_type = r
            .question_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&r.submission_id),
            Cell::new(&r.student),
            Cell::new(question),
            Cell::new(question_type),
            Cell::new(format!("{}/{}", r.score, r.max_marks)),
        ]);
    }

    println!("{table}");
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Type", "Submissions", "Score", "Available"]);

    for (question_type, stats) in &report.summary.by_type {
        table.add_row(vec![
            Cell::new(question_type),
            Cell::new(stats.submissions),
            Cell::new(stats.total_score),
            Cell::new(stats.total_available),
        ]);
    }

    println!("\n{table}");
    println!(
        "Total: {}/{} ({:.1}%), {} with full marks",
        report.summary.total_score,
        report.summary.total_available,
        report.summary.percentage,
        report.summary.full_marks
    );
}
