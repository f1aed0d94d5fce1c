//! The `gradewise init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    if Path::new("gradewise.toml").exists() {
        println!("gradewise.toml already exists, skipping.");
    } else {
        std::fs::write("gradewise.toml", SAMPLE_CONFIG).context("failed to write gradewise.toml")?;
        println!("Created gradewise.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let bank_path = Path::new("question-banks/example.toml");
    if bank_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)
            .with_context(|| format!("failed to write {}", bank_path.display()))?;
        println!("Created question-banks/example.toml");
    }

    let submissions_path = Path::new("question-banks/example-submissions.toml");
    if submissions_path.exists() {
        println!("question-banks/example-submissions.toml already exists, skipping.");
    } else {
        std::fs::write(submissions_path, EXAMPLE_SUBMISSIONS)
            .with_context(|| format!("failed to write {}", submissions_path.display()))?;
        println!("Created question-banks/example-submissions.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: gradewise validate --bank question-banks/example.toml");
    println!("  2. Run: gradewise hints --bank question-banks/example.toml --question q1");
    println!(
        "  3. Run: gradewise grade --bank question-banks/example.toml \
         --submissions question-banks/example-submissions.toml"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradewise configuration

# none | basic | detailed
default_feedback_level = "detailed"
hint_levels = 3
parallelism = 4

# Replace the bundled English stopword list (one word per line, # comments)
# stopwords_path = "${HOME}/.config/gradewise/stopwords.txt"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A small bank to get started"

[[questions]]
id = "q1"
type = "multiple_choice"
text = "Which gas do plants absorb during photosynthesis? (a) oxygen (b) carbon dioxide (c) nitrogen"
marks = 1
marking = "Answer: b"

[[questions]]
id = "q2"
type = "calculation"
text = "A car travels 100 m in 20 s. Calculate its average speed."
marks = 2
marking = """
Formula: speed = distance / time
The answer is 5
"""

[[questions]]
id = "q3"
type = "short_answer"
text = "Explain how plants make their food."
marks = 2
marking = """
- Mention photosynthesis
- Mention chlorophyll
"""
"#;

const EXAMPLE_SUBMISSIONS: &str = r#"[[submissions]]
id = "s1"
student = "alex"
question = "q1"
response = "B"

[[submissions]]
id = "s2"
student = "alex"
question = "q2"
response = "Speed = 5 m/s"

[[submissions]]
id = "s3"
student = "alex"
question = "q3"
response = "Plants use chlorophyll to trap light."
"#;
