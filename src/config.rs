// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde_json::Value;

use crate::aligner::AlignerTool;
use crate::errors::SeqconsError;

pub const CONFIG_FILE_NAME: &str = ".seqconsconfig";

// Where to find the external aligners. Unset means "look in PATH".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ToolsConfig {
    pub muscle_bin_dir: Option<PathBuf>,
    pub mafft_bin_dir: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn from_value(value: &Value) -> Self {
        ToolsConfig {
            muscle_bin_dir: path_field(value, "muscle_bin_dir"),
            mafft_bin_dir: path_field(value, "mafft_bin_dir"),
        }
    }

    pub fn bin_dir(&self, tool: AlignerTool) -> Option<PathBuf> {
        match tool {
            AlignerTool::Muscle => self.muscle_bin_dir.clone(),
            AlignerTool::Mafft => self.mafft_bin_dir.clone(),
            AlignerTool::Skip => None,
        }
    }
}

// Defaults for the consensus options; the command line overrides them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConsensusDefaults {
    pub threshold: Option<f64>,
    pub ambiguity: Option<char>,
}

impl ConsensusDefaults {
    pub fn from_value(value: &Value) -> Self {
        let threshold = value.get("threshold").and_then(Value::as_f64);
        let ambiguity = value
            .get("ambiguity")
            .and_then(Value::as_str)
            .and_then(|s| s.chars().next());
        ConsensusDefaults {
            threshold,
            ambiguity,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeqconsConfig {
    pub tools: ToolsConfig,
    pub consensus: ConsensusDefaults,
}

impl SeqconsConfig {
    pub fn from_value(value: &Value) -> Result<Self, SeqconsError> {
        if !value.is_object() {
            return Err(SeqconsError::Format(String::from(
                "Config must be a JSON object",
            )));
        }
        Ok(SeqconsConfig {
            tools: ToolsConfig::from_value(value),
            consensus: ConsensusDefaults::from_value(value),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, SeqconsError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        SeqconsConfig::from_value(&value)
    }

    // Reads the first config file found, if any.
    pub fn load() -> Result<Self, SeqconsError> {
        match find_config() {
            Some(path) => {
                info!("Reading config from {}", path.display());
                SeqconsConfig::from_file(&path).map_err(|e| {
                    SeqconsError::Format(format!("Error reading {}: {}", path.display(), e))
                })
            }
            None => Ok(SeqconsConfig::default()),
        }
    }
}

fn path_field(value: &Value, key: &str) -> Option<PathBuf> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(PathBuf::from(s)),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!("Ignoring config key {}: expected a string, got {}", key, other);
            None
        }
    }
}

fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_config_from_value() {
        let value = json!({
            "muscle_bin_dir": "/opt/muscle",
            "mafft_bin_dir": "/opt/mafft",
            "threshold": 42,
            "ambiguity": "X",
            "palette": ["#010203"]
        });
        let config = SeqconsConfig::from_value(&value).unwrap();
        assert_eq!(config.tools.muscle_bin_dir, Some(PathBuf::from("/opt/muscle")));
        assert_eq!(
            config.tools.bin_dir(AlignerTool::Mafft),
            Some(PathBuf::from("/opt/mafft"))
        );
        assert_eq!(config.tools.bin_dir(AlignerTool::Skip), None);
        assert_eq!(config.consensus.threshold, Some(42.0));
        assert_eq!(config.consensus.ambiguity, Some('X'));
    }

    #[test]
    fn test_config_missing_keys() {
        let config = SeqconsConfig::from_value(&json!({})).unwrap();
        assert_eq!(config, SeqconsConfig::default());
    }

    #[test]
    fn test_config_wrong_types_ignored() {
        let value = json!({ "mafft_bin_dir": 3, "threshold": "high" });
        let config = SeqconsConfig::from_value(&value).unwrap();
        assert_eq!(config.tools.mafft_bin_dir, None);
        assert_eq!(config.consensus.threshold, None);
    }

    #[test]
    fn test_config_not_an_object() {
        let res = SeqconsConfig::from_value(&json!([1, 2]));
        assert!(matches!(res, Err(SeqconsError::Format(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "muscle_bin_dir": "/usr/local/bin", "threshold": 60.5 }}"#).unwrap();
        let config = SeqconsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tools.muscle_bin_dir, Some(PathBuf::from("/usr/local/bin")));
        assert_eq!(config.consensus.threshold, Some(60.5));
    }

    #[test]
    fn test_config_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let res = SeqconsConfig::from_file(file.path());
        assert!(matches!(res, Err(SeqconsError::Format(_))));
    }
}
