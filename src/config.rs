use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::matcher::MatchParams;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_sequence_weight")]
    pub sequence_weight: f64,
    #[serde(default = "default_token_weight")]
    pub token_weight: f64,
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,
    #[serde(default = "default_acronym_bonus")]
    pub acronym_bonus: f64,
    #[serde(default = "default_acronym_min_overlap")]
    pub acronym_min_overlap: f64,
}

fn default_sequence_weight() -> f64 {
    0.35
}
fn default_token_weight() -> f64 {
    0.65
}
fn default_accept_threshold() -> f64 {
    0.40
}
fn default_acronym_bonus() -> f64 {
    0.2
}
fn default_acronym_min_overlap() -> f64 {
    0.25
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            sequence_weight: default_sequence_weight(),
            token_weight: default_token_weight(),
            accept_threshold: default_accept_threshold(),
            acronym_bonus: default_acronym_bonus(),
            acronym_min_overlap: default_acronym_min_overlap(),
        }
    }
}

impl MatchingConfig {
    pub fn to_params(&self) -> MatchParams {
        MatchParams {
            sequence_weight: self.sequence_weight,
            token_weight: self.token_weight,
            accept_threshold: self.accept_threshold,
            acronym_bonus: self.acronym_bonus,
            acronym_min_overlap: self.acronym_min_overlap,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}

/// An extra question/answer pair appended to the built-in knowledge base.
#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate matching
    for (name, value) in [
        ("matching.sequence_weight", config.matching.sequence_weight),
        ("matching.token_weight", config.matching.token_weight),
        ("matching.acronym_bonus", config.matching.acronym_bonus),
        (
            "matching.acronym_min_overlap",
            config.matching.acronym_min_overlap,
        ),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} must be in [0.0, 1.0]", name);
        }
    }

    if config.matching.accept_threshold < 0.0 {
        anyhow::bail!("matching.accept_threshold must be >= 0.0");
    }

    // Validate fallback
    match config.fallback.provider.as_str() {
        "openai" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown fallback provider: '{}'. Must be openai or disabled.",
            other
        ),
    }

    // Validate knowledge entries
    for entry in &config.knowledge {
        if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
            anyhow::bail!("[[knowledge]] entries must have a non-empty question and answer");
        }
    }

    Ok(config)
}

/// Load the config file, or fall back to all defaults when it does not exist.
///
/// A present-but-invalid file is still an error; only absence is forgiven,
/// so the binary works out of the box with no setup.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.matching.sequence_weight, 0.35);
        assert_eq!(config.matching.token_weight, 0.65);
        assert_eq!(config.matching.accept_threshold, 0.40);
        assert_eq!(config.fallback.provider, "openai");
        assert!(config.knowledge.is_empty());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let file = write_config("[matching]\naccept_threshold = 0.5\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.matching.accept_threshold, 0.5);
        assert_eq!(config.matching.acronym_bonus, 0.2);
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let file = write_config("[matching]\nsequence_weight = 1.5\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let file = write_config("[fallback]\nprovider = \"carrier-pigeon\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_empty_knowledge_entry() {
        let file = write_config("[[knowledge]]\nquestion = \" \"\nanswer = \"a\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_knowledge_entries_parse() {
        let file = write_config(
            "[[knowledge]]\nquestion = \"What is the SLA?\"\nanswer = \"Two business days.\"\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.knowledge.len(), 1);
        assert_eq!(config.knowledge[0].answer, "Two business days.");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default(Path::new("/nonexistent/faq.toml")).unwrap();
        assert_eq!(config.matching.accept_threshold, 0.40);
    }

    #[test]
    fn test_default_params_match_tuned_constants() {
        let params = Config::default().matching.to_params();
        assert_eq!(params.sequence_weight, 0.35);
        assert_eq!(params.token_weight, 0.65);
        assert_eq!(params.accept_threshold, 0.40);
        assert_eq!(params.acronym_bonus, 0.2);
        assert_eq!(params.acronym_min_overlap, 0.25);
    }
}
