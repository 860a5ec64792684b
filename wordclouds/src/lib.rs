//! Topic word clouds for party social-media posts.
//!
//! Posts are tokenized, lemmatized and stripped of stop words, a topic model is
//! fitted per party, and each topic is rendered as a word cloud in the party's
//! colors.

pub mod config;
pub mod corpus;
pub mod error;
pub mod lemmatizer;
pub mod palette;
pub mod pipeline;
pub mod preprocess;
pub mod stopwords;
pub mod tokenizer;
pub mod topic_modeling;
pub mod wordcloud;

pub use config::{Config, TokenMode};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunSummary};
