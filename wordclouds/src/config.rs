use crate::error::{Error, Result};
use crate::palette::{Party, PartyRegistry};
use crate::topic_modeling::LDAConfig;
use crate::wordcloud::WordCloudConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How successive files of one party combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// Each file replaces the tokens of the previous one
    #[default]
    Overwrite,
    Accumulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LemmaSource {
    None,
    /// `lemma_table` when set, the built-in German table otherwise
    #[default]
    Lookup,
    Stem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub parties: Vec<Party>,
    pub extra_stop_words: Vec<String>,
    pub lemmatizer: LemmaSource,
    pub lemma_table: Option<PathBuf>,
    pub token_mode: TokenMode,
    pub model: LDAConfig,
    pub cloud: WordCloudConfig,
    /// Terms per topic printed to the console
    pub console_terms: usize,
    /// Terms per topic drawn in each cloud
    pub cloud_terms: usize,
    pub render: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            parties: PartyRegistry::default().parties().to_vec(),
            extra_stop_words: Vec::new(),
            lemmatizer: LemmaSource::Lookup,
            lemma_table: None,
            token_mode: TokenMode::Overwrite,
            model: LDAConfig::default(),
            cloud: WordCloudConfig::default(),
            console_terms: 20,
            cloud_terms: 10,
            render: true,
        }
    }
}

impl Config {
    /// Read a JSON config. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.registry()?;
        Ok(config)
    }

    pub fn registry(&self) -> Result<PartyRegistry> {
        PartyRegistry::new(self.parties.clone())
    }
}
