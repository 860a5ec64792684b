use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning party texts into word clouds
#[derive(Error, Debug)]
pub enum Error {
    #[error("no palette configured for party '{0}'")]
    UnknownParty(String),

    #[error("corpus is empty, nothing to model")]
    EmptyCorpus,

    #[error("number of topics must be positive")]
    InvalidTopicCount,

    #[error("invalid hyperparameter: {0}")]
    InvalidParameter(String),

    #[error("invalid lightness range {min}..{max}")]
    InvalidLightness { min: u8, max: u8 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lemma table {path}, line {line}: {reason}")]
    LemmaTable {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
