use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use wordclouds::config::{Config, LemmaSource, TokenMode};
use wordclouds::Pipeline;

#[derive(Parser, Debug)]
#[command(version, about = "Topic word clouds from party social-media posts", long_about = None)]
struct Args {
    #[clap(short, long, help = "Directory holding <PARTY>_*.txt files")]
    input_dir: Option<PathBuf>,
    #[clap(short, long, help = "Directory the PNG files are written to")]
    output_dir: Option<PathBuf>,
    #[clap(short, long, help = "JSON config file; flags given here take precedence")]
    config: Option<PathBuf>,
    #[clap(short, long = "party", help = "Only process these parties (repeatable)")]
    parties: Vec<String>,
    #[clap(long)]
    topics: Option<usize>,
    #[clap(long)]
    passes: Option<usize>,
    #[clap(long, help = "Seed for topic sampling and word-cloud layout")]
    seed: Option<u64>,
    #[clap(long, help = "Tab separated form/lemma table", conflicts_with = "stem")]
    lemmas: Option<PathBuf>,
    #[clap(long, help = "Reduce tokens with the German Snowball stemmer")]
    stem: bool,
    #[clap(long, help = "Keep the tokens of every file instead of only the last one per party")]
    accumulate: bool,
    #[clap(long, help = "Print topics without rendering images")]
    no_render: bool,
    #[clap(long, help = "Write a JSON run summary to this path")]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordclouds=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    println!("Input: {}", config.input_dir.display());

    let pipeline = Pipeline::new(config).context("invalid configuration")?;
    let summary = pipeline.run()?;

    if let Some(path) = &args.summary {
        summary
            .write_json(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        println!("Summary: {}", path.display());
    }
    for party in &summary.skipped {
        println!("No input for {}", party);
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if !args.parties.is_empty() {
        config.parties = config.registry()?.select(&args.parties)?.parties().to_vec();
    }
    if let Some(topics) = args.topics {
        config.model.num_topics = topics;
    }
    if let Some(passes) = args.passes {
        config.model.passes = passes;
    }
    if args.seed.is_some() {
        config.model.seed = args.seed;
    }
    if let Some(path) = &args.lemmas {
        config.lemmatizer = LemmaSource::Lookup;
        config.lemma_table = Some(path.clone());
    }
    if args.stem {
        config.lemmatizer = LemmaSource::Stem;
    }
    if args.accumulate {
        config.token_mode = TokenMode::Accumulate;
    }
    if args.no_render {
        config.render = false;
    }
    Ok(config)
}
