//! Assessment configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::FeedbackLevel;

/// Top-level gradewise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// Feedback verbosity applied after every scoring policy.
    #[serde(default)]
    pub default_feedback_level: FeedbackLevel,
    /// Number of progressive hints per question.
    #[serde(default = "default_hint_levels")]
    pub hint_levels: usize,
    /// Optional external stopword list replacing the bundled one.
    #[serde(default)]
    pub stopwords_path: Option<PathBuf>,
    /// Max concurrent evaluations during batch grading.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_hint_levels() -> usize {
    3
}
fn default_parallelism() -> usize {
    4
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            default_feedback_level: FeedbackLevel::default(),
            hint_levels: default_hint_levels(),
            stopwords_path: None,
            parallelism: default_parallelism(),
        }
    }
}

impl GradewiseConfig {
    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.hint_levels >= 1, "hint_levels must be at least 1");
        anyhow::ensure!(self.parallelism >= 1, "parallelism must be at least 1");
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_FEEDBACK_LEVEL`, `GRADEWISE_HINT_LEVELS`.
pub fn load_config() -> Result<GradewiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradewise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradewiseConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Parse a TOML config string and expand `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<GradewiseConfig> {
    let mut config: GradewiseConfig = toml::from_str(content)?;
    config.stopwords_path = config
        .stopwords_path
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));
    Ok(config)
}

fn apply_env_overrides(config: &mut GradewiseConfig) -> Result<()> {
    if let Ok(level) = std::env::var("GRADEWISE_FEEDBACK_LEVEL") {
        config.default_feedback_level = level
            .parse()
            .map_err(|e: String| anyhow::anyhow!("GRADEWISE_FEEDBACK_LEVEL: {e}"))?;
    }
    if let Ok(levels) = std::env::var("GRADEWISE_HINT_LEVELS") {
        config.hint_levels = levels
            .trim()
            .parse()
            .with_context(|| format!("GRADEWISE_HINT_LEVELS is not a number: {levels}"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradewise"))
}
