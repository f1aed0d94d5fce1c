//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK: &str = "../../question-banks/sample.toml";
const SUBMISSIONS: &str = "../../question-banks/sample-submissions.toml";

fn gradewise() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradewise").unwrap();
    cmd.env_remove("GRADEWISE_FEEDBACK_LEVEL")
        .env_remove("GRADEWISE_HINT_LEVELS");
    cmd
}

#[test]
fn validate_sample_bank() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg(BANK)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 questions"))
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn validate_directory() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg("../../question-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("National 5 Science Sampler"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        "[bank]\nid = \"b\"\nname = \"Broken\"\n\n[[questions]]\nid = \"q1\"\ntype = \"multiple_choice\"\nmarking = \"See diagram\"\n",
    )
    .unwrap();

    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING: no correct option found"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_uses_configured_stopwords() {
    let dir = TempDir::new().unwrap();
    let stopwords = dir.path().join("stopwords.txt");
    std::fs::write(&stopwords, "gravity\n").unwrap();
    let config = dir.path().join("gradewise.toml");
    std::fs::write(
        &config,
        format!("stopwords_path = \"{}\"\n", stopwords.display()),
    )
    .unwrap();

    gradewise()
        .args(["validate", "--bank", BANK])
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid."));

    gradewise()
        .args(["validate", "--bank", BANK, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[phys-2(b)] WARNING: key point has no keywords and can never be covered",
        ));
}

#[test]
fn validate_nonexistent_file() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_partial_credit() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-2"])
        .args(["--response", "plants use chlorophyll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/2"))
        .stdout(predicate::str::contains("Points covered:\n- Mention chlorophyll"))
        .stdout(predicate::str::contains("Points missed:\n- Mention photosynthesis"));
}

#[test]
fn evaluate_sub_question_json() {
    let output = gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "phys-2", "--sub", "a"])
        .args(["--response", "10", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"], 2);
    assert_eq!(json["max_marks"], 2);
    assert_eq!(json["question_type"], "calculation");
    assert_eq!(json["feedback"], "Correct answer.");
}

#[test]
fn evaluate_missing_sub_question() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "phys-2", "--sub", "z"])
        .args(["--response", "anything"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/0"))
        .stdout(predicate::str::contains("Error: Sub-question not found."));
}

#[test]
fn evaluate_with_basic_feedback() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-1"])
        .args(["--response", "a", "--feedback-level", "basic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/1\nIncorrect. The correct answer is C."));
}

#[test]
fn evaluate_response_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answer.txt");
    std::fs::write(&path, "The speed is 3 m/s\n").unwrap();

    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "phys-1"])
        .arg("--response-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3/3"));
}

#[test]
fn evaluate_requires_response() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--response"));
}

#[test]
fn evaluate_rejects_unknown_feedback_level() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-1"])
        .args(["--response", "c", "--feedback-level", "verbose"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown feedback level"));
}

#[test]
fn hints_generated_for_question() {
    gradewise()
        .args(["hints", "--bank", BANK, "--question", "bio-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hint 1: Think about the key concepts"))
        .stdout(predicate::str::contains("Hint 2: This question is asking for an explanation"))
        .stdout(predicate::str::contains(
            "Hint 3: Your answer should include a point about Mention...",
        ));
}

#[test]
fn hints_authored_are_verbatim() {
    gradewise()
        .args(["hints", "--bank", BANK, "--question", "phys-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hint 2: Use speed = distance / time."))
        .stdout(predicate::str::contains("Hint 3").not());
}

#[test]
fn hints_padded_to_levels_json() {
    let output = gradewise()
        .args(["hints", "--bank", BANK, "--question", "phys-3", "--levels", "5"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let hints = json["hints"].as_array().unwrap();
    assert_eq!(hints.len(), 5);
    assert!(hints[2]
        .as_str()
        .unwrap()
        .starts_with("Consider calculating the area under the graph"));
    assert_eq!(hints[3], hints[4]);
}

#[test]
fn hint_level_out_of_range() {
    gradewise()
        .args(["hints", "--bank", BANK, "--question", "bio-3", "--level", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid hint level 7 (maximum is 2)"));
}

#[test]
fn hints_unknown_question() {
    gradewise()
        .args(["hints", "--bank", BANK, "--question", "chem-9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'chem-9' not found"));
}

#[test]
fn grade_batch_writes_report() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("results");

    gradewise()
        .args(["grade", "--bank", BANK, "--submissions", SUBMISSIONS])
        .args(["--parallelism", "2"])
        .arg("--output")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 8/9"))
        .stderr(predicate::str::contains("Results saved to"));

    let reports: Vec<_> = std::fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(reports.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&reports[0]).unwrap()).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 7);
    assert_eq!(results[0]["submission_id"], "s1");
    assert_eq!(results[5]["feedback"], "Error: Sub-question not found.");
    assert_eq!(results[6]["feedback"], "Error: Question not found.");
}

#[test]
fn config_file_sets_feedback_level() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "default_feedback_level = \"none\"\n").unwrap();

    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-1", "--response", "c"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/1\n\nScore: 1/1"));
}

#[test]
fn missing_config_file_fails() {
    gradewise()
        .args(["evaluate", "--bank", BANK, "--question", "bio-1", "--response", "c"])
        .args(["--config", "no-such-config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradewise.toml"))
        .stdout(predicate::str::contains("Created question-banks/example.toml"));

    assert!(dir.path().join("gradewise.toml").exists());
    assert!(dir.path().join("question-banks/example.toml").exists());

    gradewise()
        .current_dir(dir.path())
        .args(["validate", "--bank", "question-banks/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    gradewise().current_dir(dir.path()).arg("init").assert().success();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    gradewise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule-based answer grading"));
}

#[test]
fn version_output() {
    gradewise()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradewise"));
}
