//! Mapping tokens to their base form.

use crate::error::{Error, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const GERMAN_LEMMAS: &str = include_str!("lemmas_de.tsv");

pub trait Lemmatizer {
    /// Base form of `token`. May contain spaces when a form expands to
    /// several words.
    fn lemma(&self, token: &str) -> String;
}

/// Leaves tokens untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Lemmatizer for Identity {
    fn lemma(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Form-to-lemma lookup table, the same shape as the German lookup tables
/// shipped with common NLP toolkits.
#[derive(Debug, Default, Clone)]
pub struct LookupLemmatizer {
    table: HashMap<String, String>,
}

impl LookupLemmatizer {
    pub fn new(table: HashMap<String, String>) -> Self {
        let table = table
            .into_iter()
            .map(|(form, lemma)| (form.to_lowercase(), lemma))
            .collect();
        Self { table }
    }

    /// German lookup table compiled into the binary
    pub fn german() -> Self {
        match Self::parse(GERMAN_LEMMAS, Path::new("lemmas_de.tsv")) {
            Ok(lemmatizer) => lemmatizer,
            Err(e) => {
                tracing::error!(error = %e, "embedded lemma table is malformed");
                Self::default()
            }
        }
    }

    /// Read a `form<TAB>lemma` file
    pub fn from_tsv(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let lemmatizer = Self::parse(&contents, path)?;
        tracing::info!(entries = lemmatizer.len(), path = %path.display(), "loaded lemma table");
        Ok(lemmatizer)
    }

    /// Parse `form<TAB>lemma` lines. Blank lines and `#` comments are ignored.
    fn parse(contents: &str, path: &Path) -> Result<Self> {
        let mut table = HashMap::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((form, lemma)) = line.split_once('\t') else {
                return Err(Error::LemmaTable {
                    path: path.to_path_buf(),
                    line: i + 1,
                    reason: "expected form<TAB>lemma".to_string(),
                });
            };
            let (form, lemma) = (form.trim(), lemma.trim());
            if form.is_empty() || lemma.is_empty() {
                return Err(Error::LemmaTable {
                    path: path.to_path_buf(),
                    line: i + 1,
                    reason: "empty form or lemma".to_string(),
                });
            }
            table.insert(form.to_lowercase(), lemma.to_string());
        }
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Lemmatizer for LookupLemmatizer {
    fn lemma(&self, token: &str) -> String {
        self.table
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }
}

/// Snowball German stemmer, for runs without a lemma table
pub struct StemmingLemmatizer {
    stemmer: Stemmer,
}

impl StemmingLemmatizer {
    pub fn german() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::German),
        }
    }
}

impl Lemmatizer for StemmingLemmatizer {
    fn lemma(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}
