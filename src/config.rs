use crate::corpus::TextLayer;
use crate::navigation::{DEFAULT_START_PAGE, MIN_PAGE};
use crate::resolver::TiePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub start_page: u32,
    pub min_page: u32,
    pub tie_policy: TiePolicy,
    pub language: String,
    pub text_layer: TextLayer,
    pub corpus_path: PathBuf,
    pub translations_dir: PathBuf,
    pub state_file: PathBuf,
    pub log_dir: PathBuf,
    pub max_log_files: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            start_page: DEFAULT_START_PAGE,
            min_page: MIN_PAGE,
            tie_policy: TiePolicy::LastMatch,
            language: "en".to_string(),
            text_layer: TextLayer::Translation,
            corpus_path: PathBuf::from("assets/qurantft.json"),
            translations_dir: PathBuf::from("assets/translations"),
            state_file: PathBuf::from("state/qurantft-pn"),
            log_dir: PathBuf::from("logs"),
            max_log_files: 10,
        }
    }
}

impl ReaderConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
