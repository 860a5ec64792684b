//! Per-party batch run: discover files, prepare tokens, fit, print, render.

use crate::config::{Config, LemmaSource, TokenMode};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::lemmatizer::{Identity, Lemmatizer, LookupLemmatizer, StemmingLemmatizer};
use crate::palette::{Party, PartyRegistry};
use crate::preprocess::TextPreparer;
use crate::stopwords::StopwordFilter;
use crate::topic_modeling::{ModeledTopic, SimpleLDA, TopicModel};
use crate::wordcloud::WordCloud;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct PartyReport {
    pub party: String,
    pub files: Vec<PathBuf>,
    pub token_count: usize,
    pub vocabulary_size: usize,
    pub topics: Vec<ModeledTopic>,
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub parties: Vec<PartyReport>,
    /// Parties without a single readable input file
    pub skipped: Vec<String>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Tokens of one party after all of its files have been read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartyTokens {
    /// Files that were actually read, in processing order
    pub files: Vec<PathBuf>,
    pub tokens: Vec<String>,
}

impl PartyTokens {
    /// Output name prefix taken from the last file read, e.g. `CDU_facebook`
    pub fn stem(&self) -> Option<String> {
        self.files
            .last()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
    }
}

/// `<input_dir>/<party>_*.txt`, sorted
pub fn discover_files(input_dir: &Path, party: &str) -> Result<Vec<PathBuf>> {
    let dir = glob::Pattern::escape(&input_dir.to_string_lossy());
    let pattern = Path::new(&dir).join(format!("{}_*.txt", glob::Pattern::escape(party)));
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => tracing::debug!(error = %e, "skipping unreadable directory entry"),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Regular file that can be opened for reading
pub fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

fn build_lemmatizer(config: &Config) -> Result<Box<dyn Lemmatizer>> {
    let lemmatizer: Box<dyn Lemmatizer> = match (config.lemmatizer, &config.lemma_table) {
        (LemmaSource::Lookup, Some(path)) => Box::new(LookupLemmatizer::from_tsv(path)?),
        (LemmaSource::Lookup, None) => Box::new(LookupLemmatizer::german()),
        (LemmaSource::Stem, _) => Box::new(StemmingLemmatizer::german()),
        (LemmaSource::None, _) => Box::new(Identity),
    };
    Ok(lemmatizer)
}

pub struct Pipeline {
    config: Config,
    registry: PartyRegistry,
    lemmatizer: Box<dyn Lemmatizer>,
    stopwords: StopwordFilter,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let registry = config.registry()?;
        let lemmatizer = build_lemmatizer(&config)?;
        let mut stopwords = StopwordFilter::german();
        stopwords.add_stopwords(&config.extra_stop_words);
        // Fail on bad model settings before any file is read
        SimpleLDA::new(config.model.clone())?;

        Ok(Pipeline {
            config,
            registry,
            lemmatizer,
            stopwords,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self) -> Result<RunSummary> {
        let mut rng = match self.config.model.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if self.config.render {
            fs::create_dir_all(&self.config.output_dir)?;
        }

        let mut summary = RunSummary {
            generated_at: Utc::now(),
            parties: Vec::new(),
            skipped: Vec::new(),
        };

        for party in self.registry.parties() {
            match self.process_party(party, &mut rng)? {
                Some(report) => summary.parties.push(report),
                None => summary.skipped.push(party.name.clone()),
            }
        }

        tracing::info!(
            modeled = summary.parties.len(),
            skipped = summary.skipped.len(),
            "run finished"
        );
        Ok(summary)
    }

    /// Read every file of `party` and return the tokens that reach the corpus
    pub fn collect_tokens(&self, party: &str) -> Result<PartyTokens> {
        let preparer = TextPreparer::new(self.lemmatizer.as_ref(), &self.stopwords);
        let mut collected = PartyTokens::default();

        for path in discover_files(&self.config.input_dir, party)? {
            if !is_readable(&path) {
                tracing::debug!(path = %path.display(), "skipping unreadable file");
                continue;
            }
            let contents = fs::read_to_string(&path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
            let tokens = preparer.prepare_file_contents(&contents);
            tracing::info!(party, path = %path.display(), tokens = tokens.len(), "prepared file");

            match self.config.token_mode {
                TokenMode::Overwrite => {
                    if let Some(previous) = collected.files.last() {
                        tracing::warn!(
                            party,
                            discarded = %previous.display(),
                            "tokens of the previous file are replaced, use accumulate mode to keep them"
                        );
                    }
                    collected.tokens = tokens;
                }
                TokenMode::Accumulate => collected.tokens.extend(tokens),
            }
            collected.files.push(path);
        }
        Ok(collected)
    }

    /// Returns `None` when the party has no readable input
    pub fn process_party(&self, party: &Party, rng: &mut StdRng) -> Result<Option<PartyReport>> {
        let collected = self.collect_tokens(&party.name)?;
        let Some(stem) = collected.stem() else {
            tracing::warn!(party = %party.name, dir = %self.config.input_dir.display(), "no input files");
            return Ok(None);
        };

        let corpus = Corpus::from_tokens(&collected.tokens);
        tracing::info!(
            party = %party.name,
            documents = corpus.len(),
            vocabulary = corpus.dictionary.len(),
            "corpus built"
        );

        let model = SimpleLDA::new(self.config.model.clone())?.fit(&corpus)?;
        print_topics(&party.name, &model, self.config.console_terms);

        let images = if self.config.render {
            self.render(party, &model, &stem, rng)?
        } else {
            Vec::new()
        };

        Ok(Some(PartyReport {
            party: party.name.clone(),
            files: collected.files,
            token_count: collected.tokens.len(),
            vocabulary_size: corpus.dictionary.len(),
            topics: model.topics(self.config.cloud_terms),
            images,
        }))
    }

    /// One PNG per topic, `<output_dir>/<stem><topic>.png`
    pub fn render(&self, party: &Party, model: &TopicModel, stem: &str, rng: &mut StdRng) -> Result<Vec<PathBuf>> {
        let mut images = Vec::with_capacity(model.num_topics());
        for topic_id in 0..model.num_topics() {
            let mut cloud = WordCloud::new(self.config.cloud.clone());
            cloud
                .fit_words(&model.show_topic(topic_id, self.config.cloud_terms), rng)
                .recolor(&party.palette, rng);

            let title = format!("{} Wortwolke #{}", party.name, topic_id + 1);
            let path = self.config.output_dir.join(format!("{}{}.png", stem, topic_id));
            cloud.save(Some(&title), &path)?;
            tracing::info!(party = %party.name, path = %path.display(), words = cloud.words().len(), "saved word cloud");
            images.push(path);
        }
        Ok(images)
    }
}

pub fn print_topics(party: &str, model: &TopicModel, num_words: usize) {
    println!("--> {}", party);
    for (topic_id, terms) in model.print_topics(num_words) {
        println!("({}, '{}')", topic_id, terms);
    }
    println!();
}
