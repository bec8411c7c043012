//! Configuration for apistub

use crate::StubError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# apistub configuration

[checker]
# Pylint message-id family retained from the checker output
# (characters 2-3 of the id, e.g. C4717 -> "47")
family = "47"

[render]
# Signatures with more arguments than this are rendered one parameter per line
multiline_threshold = 2

[discovery]
# Files to include, relative to the package root
glob = "**/*.py"

[ignore]
# Directories and files skipped during discovery
patterns = [
    "tests",
    "samples",
    "__pycache__",
    ".venv",
    "venv",
    "build",
    ".git",
]
"#;

/// apistub configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default = "default_family")]
    pub family: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_multiline_threshold")]
    pub multiline_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_glob")]
    pub glob: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default = "default_ignore_patterns")]
    pub patterns: Vec<String>,
}

// Default value functions
fn default_family() -> String {
    "47".to_string()
}
fn default_multiline_threshold() -> usize {
    2
}
fn default_glob() -> String {
    "**/*.py".to_string()
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "tests".to_string(),
        "samples".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
        "build".to_string(),
    ]
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            family: default_family(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            multiline_threshold: default_multiline_threshold(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            glob: default_glob(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            patterns: default_ignore_patterns(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(StubError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| StubError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        let family = &self.checker.family;
        if family.len() != 2 || !family.chars().all(|c| c.is_ascii_digit()) {
            return Err(StubError::ConfigParse(format!(
                "checker.family must be two digits, got '{}'",
                family
            )));
        }
        Ok(())
    }
}
