//! gradewise CLI: grade answers and serve progressive hints from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gradewise",
    version,
    about = "Rule-based answer grading with progressive hints"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single response
    Evaluate {
        /// Question bank TOML file
        #[arg(long)]
        bank: PathBuf,

        /// Question ID
        #[arg(long)]
        question: String,

        /// Sub-question letter
        #[arg(long)]
        sub: Option<String>,

        /// Response text
        #[arg(long, conflicts_with = "response_file")]
        response: Option<String>,

        /// Read the response from a file
        #[arg(long)]
        response_file: Option<PathBuf>,

        /// Feedback level: none, basic, detailed
        #[arg(long)]
        feedback_level: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show progressive hints for a question
    Hints {
        /// Question bank TOML file
        #[arg(long)]
        bank: PathBuf,

        /// Question ID
        #[arg(long)]
        question: String,

        /// Sub-question letter
        #[arg(long)]
        sub: Option<String>,

        /// Show only this hint (0-based)
        #[arg(long)]
        level: Option<usize>,

        /// Number of hints to generate (overrides config)
        #[arg(long)]
        levels: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a batch of submissions
    Grade {
        /// Question bank TOML file
        #[arg(long)]
        bank: PathBuf,

        /// Submissions TOML file
        #[arg(long)]
        submissions: PathBuf,

        /// Max concurrent evaluations (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Feedback level: none, basic, detailed
        #[arg(long)]
        feedback_level: Option<String>,

        /// Output directory for the JSON report
        #[arg(long, default_value = "./gradewise-results")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradewise=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            bank,
            question,
            sub,
            response,
            response_file,
            feedback_level,
            format,
            config,
        } => commands::evaluate::execute(
            bank,
            question,
            sub,
            response,
            response_file,
            feedback_level,
            format,
            config,
        ),
        Commands::Hints {
            bank,
            question,
            sub,
            level,
            levels,
            format,
            config,
        } => commands::hints::execute(bank, question, sub, level, levels, format, config),
        Commands::Grade {
            bank,
            submissions,
            parallelism,
            feedback_level,
            output,
            config,
        } => {
            commands::grade::execute(bank, submissions, parallelism, feedback_level, output, config)
                .await
        }
        Commands::Validate { bank, config } => commands::validate::execute(bank, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
